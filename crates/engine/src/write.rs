//! Write path: `put()`, `remove()`, and the internal `flush()`.
//!
//! Grounded on the source's `Rin.Put`/`Rin.Remove` in `rindb.go`: append to
//! the WAL (fsynced) before the memtable is touched, so a crash between the
//! two leaves the WAL, not the memtable, as the single source of truth.
//! `flush()` adds the behavior the source's `Flush` leaves to an external
//! caller (spec.md §9's "Global process state" note does not cover this —
//! the source never decides *when* to flush): once the memtable's
//! approximate on-disk size crosses [`EngineConfig::flush_threshold_bytes`],
//! it is persisted to a new level-0 SSTable and the WAL is cleaned.

use crate::{recovery, Engine, MAX_KEY_SIZE, MAX_VALUE_SIZE};
use record::{Record, Value};

impl Engine {
    /// Inserts or overwrites `key` with `value`. Durable once this returns:
    /// the record is fsynced to the WAL before the memtable is updated,
    /// matching spec.md §5's linearizability/durability guarantees.
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> anyhow::Result<()> {
        anyhow::ensure!(
            key.len() <= MAX_KEY_SIZE,
            "key too large: {} bytes (max {})",
            key.len(),
            MAX_KEY_SIZE
        );
        anyhow::ensure!(
            value.len() <= MAX_VALUE_SIZE,
            "value too large: {} bytes (max {})",
            value.len(),
            MAX_VALUE_SIZE
        );

        self.wal.append(&Record::data(key.clone(), value.clone()))?;
        self.mem.put(key, Value::Data(value));

        if self.mem.approx_size() >= self.config.flush_threshold_bytes {
            self.flush()?;
        }
        Ok(())
    }

    /// Deletes `key` by writing a tombstone, matching the source's
    /// `Rin.Remove` (`RecordImpl{Key: key, Value: nil}`), but with an
    /// explicit [`record::Value::Tombstone`] rather than a nil value slice
    /// (spec.md §9's Open Question 1).
    pub fn remove(&mut self, key: Vec<u8>) -> anyhow::Result<()> {
        anyhow::ensure!(
            key.len() <= MAX_KEY_SIZE,
            "key too large: {} bytes (max {})",
            key.len(),
            MAX_KEY_SIZE
        );

        self.wal.append(&Record::tombstone(key.clone()))?;
        self.mem.put(key, Value::Tombstone);

        if self.mem.approx_size() >= self.config.flush_threshold_bytes {
            self.flush()?;
        }
        Ok(())
    }

    /// Flushes the memtable immediately regardless of the configured
    /// threshold, matching the source's manual `FLUSH` trigger. A no-op if
    /// the memtable is empty.
    pub fn force_flush(&mut self) -> anyhow::Result<()> {
        self.flush()
    }

    /// Flushes a non-empty memtable to a fresh level-0 SSTable, builds its
    /// Bloom filter, cleans the WAL, and makes the table visible to future
    /// reads at the front of level 0 — the newest-first position the read
    /// path expects (spec.md §9's Open Question 5).
    pub(crate) fn flush(&mut self) -> anyhow::Result<()> {
        if self.mem.is_empty() {
            return Ok(());
        }

        let path = self.catalog.new_table_path(0);
        let table = sstable::flush(&mut self.mem, &path)?;
        let filter = recovery::build_filter(&table, self.config.bloom_fpr);

        self.catalog.level_mut(0).push_back(path.clone());
        if self.tables.is_empty() {
            self.tables.push(Vec::new());
        }
        self.tables[0].insert(0, table);
        self.filters.insert(path, filter);

        self.wal.clean()?;

        util::riptide_info!(
            "flushed memtable to level 0 ({} tables resident)",
            self.tables[0].len()
        );
        Ok(())
    }
}
