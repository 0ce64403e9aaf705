//! The in-memory write buffer: a skip list specialized to byte-string
//! keys and [`record::Value`]s.
//!
//! Grounded on the source's `memtable.go`, which wraps a
//! `SkipList[Bytes, Bytes]` behind `Put`/`Get`/`Clear`. The rewrite stores
//! [`record::Value`] rather than raw bytes so a deletion is an explicit
//! tombstone (spec.md §3's Open Question 1) instead of a nil slice.

use record::Value;
use skiplist::SkipList;

/// An ordered, in-memory map from byte-string keys to [`Value`]s.
pub struct Memtable {
    data: SkipList<Vec<u8>, Value>,
    approx_size: usize,
}

impl Default for Memtable {
    fn default() -> Self {
        Self::new()
    }
}

impl Memtable {
    /// Builds an empty memtable, matching the source's `InitMemtable`.
    pub fn new() -> Self {
        Self { data: SkipList::new(), approx_size: 0 }
    }

    /// Inserts or overwrites `key` with `value`. A repeated key does not
    /// grow [`Memtable::len`] (spec.md §8 property 2).
    ///
    /// Tracks [`Memtable::approx_size`] as the running total of on-disk
    /// record size, so the engine can decide when to flush without a
    /// separate accounting pass.
    pub fn put(&mut self, key: Vec<u8>, value: Value) {
        let new_size = record::on_disk_size(key.len(), value.as_bytes().map_or(0, |v| v.len()));
        if let Some(old) = self.data.get(&key) {
            let old_size = record::on_disk_size(key.len(), old.as_bytes().map_or(0, |v| v.len()));
            self.approx_size = self.approx_size.saturating_sub(old_size) + new_size;
        } else {
            self.approx_size += new_size;
        }
        self.data.put(key, value);
    }

    /// Running total of on-disk record size (key + value bytes, including
    /// the 16-byte header per record) across every key currently held.
    /// Not specified by the source, which leaves flush timing to its
    /// caller; the rewrite's engine flushes when this crosses its
    /// configured flush threshold.
    pub fn approx_size(&self) -> usize {
        self.approx_size
    }

    /// Looks up `key`. `None` means the key has never been written to this
    /// memtable; a tombstone is returned as `Some(&Value::Tombstone)`, not
    /// `None` — callers distinguish "absent" from "deleted".
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.data.get(&key.to_vec())
    }

    /// Current number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` iff the memtable holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Resets the memtable to empty, matching the source's `Clear` — used
    /// after a successful flush.
    pub fn clear(&mut self) {
        self.data.clear();
        self.approx_size = 0;
    }

    /// Ascending-key iteration over every `(key, value)` pair, used by
    /// flush to emit sorted records.
    pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, &Value)> {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests;
