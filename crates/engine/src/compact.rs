//! `compact()` and `close()`.
//!
//! Grounded on the source's `Hino.Compact`/`Hino.Close` in `rindb.go`: the
//! actual merge routine lives in the `compaction` crate (spec.md §4.10);
//! this module closes every resident table before delegating to it (so the
//! merge never contends with the engine's own open file handles), then
//! reopens the post-compaction catalog and rebuilds every Bloom filter —
//! the merge changes every affected table's on-disk identity.

use crate::{recovery, Engine};
use sstable::SStable;

impl Engine {
    /// Runs one compaction pass (spec.md §4.10's threshold-driven merge),
    /// then reopens every level's tables and Bloom filters from the
    /// resulting catalog.
    pub fn compact(&mut self) -> anyhow::Result<()> {
        close_all(&mut self.tables);
        self.filters.clear();

        compaction::compact(&mut self.catalog, &self.config)?;

        let (tables, filters) = recovery::open_all_tables(&mut self.catalog, self.config.bloom_fpr)?;
        self.tables = tables;
        self.filters = filters;

        util::riptide_info!(
            "compaction complete: {} levels, tables per level {:?}",
            self.tables.len(),
            self.tables.iter().map(Vec::len).collect::<Vec<_>>()
        );
        Ok(())
    }

    /// Flushes any resident memtable data, then closes every open file
    /// handle: the WAL and every resident SSTable, matching spec.md §6's
    /// `Engine.Close()`.
    pub fn close(&mut self) -> anyhow::Result<()> {
        if !self.mem.is_empty() {
            self.flush()?;
        }
        self.wal.close()?;
        close_all(&mut self.tables);
        Ok(())
    }
}

fn close_all(tables: &mut [Vec<SStable>]) {
    for level in tables.iter_mut() {
        for table in level.iter_mut() {
            if let Err(e) = table.close() {
                util::riptide_warn!("error closing sstable {}: {}", table.path().display(), e);
            }
        }
    }
}
