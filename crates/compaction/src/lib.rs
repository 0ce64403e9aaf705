//! Threshold-driven leveled compaction: merges a level's oldest tables
//! upward into the next level once that level holds too many of them.
//!
//! Grounded on the source's `Hino.Compact`/`mergeSSTables` in `rindb.go`.
//! One pass walks every known level in order, chunking each level's
//! oldest-first table list into groups of `threshold(L)` and merging each
//! full chunk into a fresh level-`L+1` table; a trailing partial chunk is
//! left in place, matching the source's leftover-pushback behavior.

use config::EngineConfig;
use levels::LevelCatalog;
use linkedlist::LinkedList;
use memtable::Memtable;
use sstable::SStable;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors a compaction pass can report.
#[derive(Debug, Error)]
pub enum CompactionError {
    #[error("sstable error: {0}")]
    SSTable(#[from] sstable::SSTableError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs one compaction pass over every level `catalog` currently knows
/// about, per spec.md §4.10: `threshold(L) = L + compaction_base`. A
/// level under threshold is left untouched.
pub fn compact(catalog: &mut LevelCatalog, config: &EngineConfig) -> Result<(), CompactionError> {
    let mut level_idx = 0;
    while level_idx < catalog.level_count() {
        let threshold = config.level_threshold(level_idx);
        let paths = catalog.level_paths_oldest_first(level_idx);

        let mut chunk: Vec<PathBuf> = Vec::with_capacity(threshold);
        let mut merged_any = false;
        for path in paths {
            chunk.push(path);
            if chunk.len() == threshold {
                util::riptide_info!(
                    "compacting {} tables from level {} into level {}",
                    chunk.len(),
                    level_idx,
                    level_idx + 1
                );
                merge_chunk(catalog, level_idx + 1, &chunk)?;
                merged_any = true;
                chunk.clear();
            }
        }

        if merged_any {
            let list = catalog.level_mut(level_idx);
            *list = LinkedList::new();
            for path in chunk {
                list.push_back(path);
            }
        }

        level_idx += 1;
    }
    Ok(())
}

/// Merges `paths` (oldest first) into one fresh table at `target_level`,
/// then deletes the inputs. Matches the source's `mergeSSTables`: every
/// input is replayed through a temporary memtable in order, so a key
/// repeated across inputs collapses to the value from the last (newest)
/// input processed.
fn merge_chunk(
    catalog: &mut LevelCatalog,
    target_level: usize,
    paths: &[PathBuf],
) -> Result<(), CompactionError> {
    let mut mem = Memtable::new();
    for path in paths {
        let mut table = SStable::open(path)?;
        for record in table.iter()? {
            let record = record?;
            mem.put(record.key, record.value);
        }
        table.close()?;
    }

    let target_path = catalog.new_table_path(target_level);
    sstable::flush(&mut mem, &target_path)?;
    catalog.level_mut(target_level).push_back(target_path);

    for path in paths {
        remove_merged_input(path);
    }
    Ok(())
}

/// Removes a merged-away input file. Matches the source's behavior of
/// logging and continuing rather than failing the whole compaction if a
/// stale input can't be unlinked.
fn remove_merged_input(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        util::riptide_warn!("error removing merged file {}: {}", path.display(), e);
    }
}
