//! Engine configuration.
//!
//! The source keeps `dbDirectory` and `walName` as package-level `var`s in
//! `rindb.go`. Per the Design Notes ("Promote them to engine configuration
//! in the rewrite"), this crate collects those plus the handful of
//! threshold knobs the source hard-codes inline (the `bufferFileCount = 2`
//! compaction threshold constant, the memtable flush trigger the source
//! leaves to its caller) into one `EngineConfig` value.

use std::path::PathBuf;

/// Tunables for an `Engine` instance.
///
/// Constructed with [`EngineConfig::new`] (matching the source's defaults)
/// and customized with the `with_*` builder methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directory holding the WAL and all SSTables. Source default: `"testdata"`.
    pub dir: PathBuf,
    /// WAL file name within `dir`. Source default: `"WAL"`.
    pub wal_name: String,
    /// Memtable size (bytes of key + value payload) that triggers a flush
    /// to a level-0 SSTable. Not specified by the source (which exposes
    /// `Flush` as a free function called by whatever owns the memtable);
    /// the rewrite picks a concrete default so the facade can flush on its
    /// own.
    pub flush_threshold_bytes: usize,
    /// Per-level compaction threshold base. `threshold(L) = L + compaction_base`
    /// per spec.md §4.10, matching the source's `bufferFileCount = 2`.
    pub compaction_base: usize,
    /// Target false-positive rate for a new SSTable's Bloom filter.
    pub bloom_fpr: f64,
    /// Reserved for a future bulk-load fast path that batches WAL records
    /// before a single fsync. `Engine::put`/`remove` always fsync every
    /// append regardless of this flag — spec.md §5's durability invariant
    /// ("once Put returns, the write is durable") is not optional. Default
    /// `true`.
    pub wal_fsync: bool,
}

impl EngineConfig {
    /// Defaults matching the source's `dbDirectory = "testdata"`,
    /// `walName = "WAL"`, and `bufferFileCount = 2`.
    pub fn new() -> Self {
        Self {
            dir: PathBuf::from("testdata"),
            wal_name: String::from("WAL"),
            flush_threshold_bytes: 4 * 1024 * 1024,
            compaction_base: 2,
            bloom_fpr: 0.01,
            wal_fsync: true,
        }
    }

    /// Sets the database directory.
    pub fn with_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.dir = dir.into();
        self
    }

    /// Sets the WAL file name.
    pub fn with_wal_name<S: Into<String>>(mut self, name: S) -> Self {
        self.wal_name = name.into();
        self
    }

    /// Sets the memtable flush threshold, in bytes of key+value payload.
    pub fn with_flush_threshold_bytes(mut self, bytes: usize) -> Self {
        self.flush_threshold_bytes = bytes;
        self
    }

    /// Sets the per-level compaction threshold base.
    pub fn with_compaction_base(mut self, base: usize) -> Self {
        self.compaction_base = base;
        self
    }

    /// Sets the target Bloom filter false-positive rate for new SSTables.
    pub fn with_bloom_fpr(mut self, fpr: f64) -> Self {
        self.bloom_fpr = fpr;
        self
    }

    /// Sets whether WAL appends fsync immediately.
    pub fn with_wal_fsync(mut self, fsync: bool) -> Self {
        self.wal_fsync = fsync;
        self
    }

    /// Full path to the WAL file.
    pub fn wal_path(&self) -> PathBuf {
        self.dir.join(&self.wal_name)
    }

    /// Per-level compaction threshold: `level_index + compaction_base`.
    pub fn level_threshold(&self, level_index: usize) -> usize {
        level_index + self.compaction_base
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
