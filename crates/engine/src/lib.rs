//! # Engine — RiptideKV storage engine
//!
//! The central orchestrator tying together the [`memtable`], [`wal`],
//! [`sstable`], [`levels`], and [`compaction`] crates into the embedded
//! LSM-tree store spec.md describes.
//!
//! ## Architecture
//!
//! ```text
//! Client
//!   |
//!   v
//! ┌───────────────────────────────────────────────┐
//! │                   ENGINE                      │
//! │                                               │
//! │ write.rs → WAL append → Memtable insert       │
//! │              |                                │
//! │              |  (approx_size >= threshold?)   │
//! │              v                                │
//! │           flush() → new level-0 SSTable       │
//! │                                               │
//! │ read.rs  → Memtable → L0.. Ln (newest first)  │
//! │            (first match wins)                 │
//! │                                               │
//! │ compact.rs → compaction::compact() per level  │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Module responsibilities
//!
//! | Module      | Purpose                                              |
//! |-------------|-------------------------------------------------------|
//! | `lib.rs`    | `Engine` struct, constructor, `Debug`, `Drop`         |
//! | `recovery`  | WAL replay, SSTable/level discovery, tmp-file cleanup |
//! | `write`     | `put()`, `remove()`, internal `flush()`               |
//! | `read`      | `get()`                                               |
//! | `compact`   | `compact()`, `close()`                                |
//!
//! Range scans are explicitly out of scope (spec.md §1 Non-goals) —
//! unlike the teacher crate this facade has no `scan()` method.
//!
//! ## Crash safety
//!
//! Every write is appended to the WAL, fsynced, before the memtable is
//! updated. The WAL is only cleaned after a successful flush. SSTables
//! are written atomically (temp file + fsync + rename + parent fsync).

mod compact;
mod read;
mod recovery;
mod write;

use bloom::BloomFilter;
use levels::LevelCatalog;
use memtable::Memtable;
use sstable::SStable;
use std::collections::HashMap;
use std::path::PathBuf;
use wal::Wal;

pub use config::EngineConfig;

/// Maximum allowed key size in bytes (64 KiB), matching the teacher
/// crate's constant of the same name.
pub const MAX_KEY_SIZE: usize = 64 * 1024;
/// Maximum allowed value size in bytes (10 MiB), matching the teacher
/// crate's constant of the same name.
pub const MAX_VALUE_SIZE: usize = 10 * 1024 * 1024;

/// The central storage engine: a memtable backed by a WAL, flushed into
/// a leveled set of immutable SSTables.
///
/// # Write path
///
/// 1. Append the record to the WAL (fsynced before returning).
/// 2. Apply the mutation to the in-memory memtable.
/// 3. If the memtable's `approx_size` crosses the configured flush
///    threshold, flush it to a new level-0 SSTable and clean the WAL.
///
/// # Read path
///
/// 1. Check the memtable (freshest data, including tombstones).
/// 2. Check every level from 0 upward, each level's tables newest-first,
///    consulting a table's Bloom filter first when one is resident.
/// 3. First hit — tombstone or data — wins.
///
/// # Recovery
///
/// [`Engine::open`] replays the WAL into a fresh memtable and discovers
/// every existing SSTable via the level catalog before the engine is
/// usable.
pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) mem: Memtable,
    pub(crate) wal: Wal,
    pub(crate) catalog: LevelCatalog,
    /// Opened tables per level, each inner `Vec` ordered newest-first —
    /// the order the read path walks.
    pub(crate) tables: Vec<Vec<SStable>>,
    /// One Bloom filter per currently-open table, keyed by its file path.
    /// Built in memory when a table is opened (at startup, after a
    /// flush, or after compaction) — never persisted, per spec.md §4.8
    /// ("optional at present").
    pub(crate) filters: HashMap<PathBuf, BloomFilter>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("dir", &self.config.dir)
            .field("memtable_entries", &self.mem.len())
            .field("memtable_approx_size", &self.mem.approx_size())
            .field("flush_threshold_bytes", &self.config.flush_threshold_bytes)
            .field("level_count", &self.tables.len())
            .field(
                "tables_per_level",
                &self.tables.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Engine {
    /// Opens (or creates) the engine at `config.dir`, performing full
    /// recovery: WAL replay into the memtable and level-catalog discovery
    /// of existing SSTables, matching spec.md §6's `Open(dir) → Engine`.
    pub fn open(config: EngineConfig) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.dir)?;
        recovery::cleanup_tmp_files(&config.dir);

        let wal_path = config.wal_path();
        let mut wal = Wal::new(filehandle::FileHandle::open_new(&wal_path)?);
        let mem = wal.load()?;

        let mut catalog = LevelCatalog::discover(&config.dir)?;
        let (tables, filters) = recovery::open_all_tables(&mut catalog, config.bloom_fpr)?;

        util::riptide_info!(
            "opened engine at {}: {} memtable entries recovered, {} levels discovered",
            config.dir.display(),
            mem.len(),
            tables.len()
        );

        Ok(Self { config, mem, wal, catalog, tables, filters })
    }

    /// Current number of distinct keys in the memtable.
    pub fn memtable_len(&self) -> usize {
        self.mem.len()
    }

    /// Number of levels the catalog currently knows about.
    pub fn level_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of tables currently open at `level`, or `0` if the level
    /// does not exist.
    pub fn table_count(&self, level: usize) -> usize {
        self.tables.get(level).map_or(0, Vec::len)
    }
}

/// Best-effort flush on drop: anything still resident in the memtable is
/// flushed to an SSTable so it is not lost. Errors are silently dropped
/// since `Drop` cannot propagate them — the data is still safe in the
/// WAL and will be recovered by the next `Engine::open`.
impl Drop for Engine {
    fn drop(&mut self) {
        if !self.mem.is_empty() {
            let _ = self.flush();
        }
    }
}

#[cfg(test)]
#[path = "tests/write_tests.rs"]
mod write_tests;

#[cfg(test)]
#[path = "tests/read_tests.rs"]
mod read_tests;

#[cfg(test)]
#[path = "tests/recovery_tests.rs"]
mod recovery_tests;

#[cfg(test)]
#[path = "tests/compaction_tests.rs"]
mod compaction_tests;
