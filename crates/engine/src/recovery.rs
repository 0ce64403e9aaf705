//! Cold-start recovery: discovering existing SSTables and cleaning up
//! interrupted flushes left over from a previous crash.
//!
//! Grounded on the source's `InitHino`/`LoadLevels` in `rindb.go`,
//! generalized to also open each discovered table's sparse index and
//! rebuild an in-memory Bloom filter for it from its own key set — filters
//! are never persisted (spec.md §4.8), so they must be regenerated every
//! time a table is opened (at startup, after a flush, or after
//! compaction).

use bloom::BloomFilter;
use levels::LevelCatalog;
use sstable::SStable;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Removes leftover `*.sst.tmp` files from a flush or compaction that
/// crashed mid-write. Matches spec.md §4.10's recovery guidance: the
/// directory scan that builds the level catalog already ignores anything
/// not ending in `.sst`, so these are merely disk-space cleanup, not a
/// correctness requirement.
pub fn cleanup_tmp_files(dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "tmp") {
            if let Err(e) = std::fs::remove_file(&path) {
                util::riptide_warn!("could not remove leftover tmp file {}: {}", path.display(), e);
            } else {
                util::riptide_info!("removed leftover tmp file {}", path.display());
            }
        }
    }
}

/// Opens every SSTable `catalog` knows about, newest-first within each
/// level (the order [`crate::read`] walks), and builds an in-memory Bloom
/// filter for each from its own keys.
pub fn open_all_tables(
    catalog: &mut LevelCatalog,
    bloom_fpr: f64,
) -> anyhow::Result<(Vec<Vec<SStable>>, HashMap<PathBuf, BloomFilter>)> {
    let mut tables = Vec::with_capacity(catalog.level_count());
    let mut filters = HashMap::new();

    for level_idx in 0..catalog.level_count() {
        let paths = catalog.level_paths_newest_first(level_idx);
        let mut level_tables = Vec::with_capacity(paths.len());
        for path in paths {
            let table = SStable::open(&path)?;
            filters.insert(path, build_filter(&table, bloom_fpr));
            level_tables.push(table);
        }
        tables.push(level_tables);
    }

    Ok((tables, filters))
}

/// Builds a Bloom filter sized for `table`'s own entry count, inserting
/// every key already resident in its sparse index (no extra disk reads).
pub fn build_filter(table: &SStable, bloom_fpr: f64) -> BloomFilter {
    let mut filter = BloomFilter::with_capacity(table.len().max(1) as u64, bloom_fpr);
    for key in table.keys() {
        filter.insert(key);
    }
    filter
}
