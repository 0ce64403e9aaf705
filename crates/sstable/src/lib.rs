//! Immutable, on-disk sorted tables: the unit SSTables are flushed into
//! from a memtable and merged out of during compaction.
//!
//! Grounded on the source's `sstable.go`. Physical layout, per spec.md
//! §3/§6: a data area of ascending records, a sparse index area (one
//! entry per record, value field an 8-byte LE offset), and an 8-byte LE
//! trailer giving the sparse index's starting offset. No embedded Bloom
//! filter and no version magic — a Bloom filter, when used, lives only in
//! memory alongside a table (spec.md §4.8/§9).

mod format;
mod reader;
mod writer;

pub use format::{KeyOffset, SSTableError, SparseIndex, TRAILER_BYTES};
pub use reader::{SStable, SStableIter};
pub use writer::flush;

#[cfg(test)]
#[path = "tests/writer_tests.rs"]
mod writer_tests;

#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod reader_tests;
