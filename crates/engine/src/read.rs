//! Read path: `get()`.
//!
//! Grounded on the source's stubbed `Hino.searchKey` in `rindb.go`, which
//! spec.md §9's Open Question 7 flags as unimplemented. This fully
//! implements the multi-level point lookup spec.md §4.11 describes:
//! memtable first, then every level from 0 upward, each level's tables
//! newest-first (§9's Open Question 5), consulting a table's Bloom filter
//! before its sparse index whenever one is resident. The first hit —
//! tombstone or data — wins.

use crate::Engine;
use record::Value;

impl Engine {
    /// Looks up `key`. Returns `None` for an absent key or a tombstone hit
    /// (spec.md §6: "value is empty/absent on tombstone").
    pub fn get(&mut self, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        if let Some(value) = self.mem.get(key) {
            return Ok(value.as_bytes().map(<[u8]>::to_vec));
        }

        for level in &mut self.tables {
            for table in level.iter_mut() {
                if let Some(filter) = self.filters.get(table.path()) {
                    if !filter.lookup(key) {
                        continue;
                    }
                }

                match table.get_value(key) {
                    Ok(value) => return Ok(as_option(value)),
                    Err(sstable::SSTableError::KeyNotFound) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }

        Ok(None)
    }
}

fn as_option(value: Value) -> Option<Vec<u8>> {
    match value {
        Value::Data(bytes) => Some(bytes),
        Value::Tombstone => None,
    }
}
