//! Opens an existing SSTable file and serves point lookups and ordered
//! iteration over it.
//!
//! Grounded on the source's `NewSSTable`/`loadSparseIndex`/`GetValue`/
//! `sstableIterator` in `sstable.go`.

use crate::format::{KeyOffset, SSTableError, SparseIndex, TRAILER_BYTES};
use filehandle::FileHandle;
use record::{read_record, Value};
use std::io::{Seek, SeekFrom};
use std::path::Path;

/// An immutable, on-disk sorted table together with its in-memory sparse
/// index.
pub struct SStable {
    pub(crate) file: FileHandle,
    pub(crate) sparse_index: SparseIndex,
}

impl SStable {
    /// Opens `path`, validating the trailer and loading the sparse index
    /// into memory. Errors with [`SSTableError::MalformedSSTable`] if the
    /// file is shorter than a trailer.
    pub fn open(path: &Path) -> Result<Self, SSTableError> {
        let file_len = std::fs::metadata(path)?.len();
        if file_len < TRAILER_BYTES {
            util::riptide_warn!("sstable {} is shorter than a trailer", path.display());
            return Err(SSTableError::MalformedSSTable);
        }

        let mut file = FileHandle::open_new(path)?;
        let sparse_index = load_sparse_index(&mut file)?;
        Ok(Self { file, sparse_index })
    }

    /// The path this table's file handle refers to.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of entries in the sparse index (and thus in the data area).
    pub fn len(&self) -> usize {
        self.sparse_index.len()
    }

    /// `true` iff the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.sparse_index.is_empty()
    }

    /// Every key in this table, in ascending order, read from the
    /// in-memory sparse index without touching the file. Used to build a
    /// Bloom filter for a table without re-reading its data area.
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.sparse_index.0.iter().map(|entry| entry.key.as_slice())
    }

    /// Looks up `key` via the sparse index, then seeks and reads its data
    /// record. Returns the stored [`Value`] — `Value::Tombstone` for a
    /// propagated deletion, `Value::Data` otherwise.
    pub fn get_value(&mut self, key: &[u8]) -> Result<Value, SSTableError> {
        let offset = self.sparse_index.get_offset(key)?;
        self.file.seek(SeekFrom::Start(offset))?;
        let record = read_record(&mut self.file)?.ok_or(SSTableError::MalformedSSTable)?;
        Ok(record.value)
    }

    /// Closes the underlying file handle.
    pub fn close(&mut self) -> Result<(), SSTableError> {
        self.file.close()?;
        Ok(())
    }

    /// An ascending-key iterator over every data record, matching the
    /// source's `sstableIterator`.
    pub fn iter(&mut self) -> Result<SStableIter<'_>, SSTableError> {
        self.file.seek(SeekFrom::Start(0))?;
        Ok(SStableIter { file: &mut self.file, current: 0, max: self.sparse_index.len() })
    }
}

fn load_sparse_index(file: &mut FileHandle) -> Result<SparseIndex, SSTableError> {
    let trailer_pos = file.seek(SeekFrom::End(-(TRAILER_BYTES as i64)))?;

    let mut trailer_bytes = [0u8; TRAILER_BYTES as usize];
    std::io::Read::read_exact(file, &mut trailer_bytes)?;
    let sparse_index_offset = u64::from_le_bytes(trailer_bytes);

    let mut pos = file.seek(SeekFrom::Start(sparse_index_offset))?;
    let mut entries = Vec::new();
    while pos < trailer_pos {
        let record = read_record(file)?.ok_or(SSTableError::MalformedSSTable)?;
        let offset = record.as_offset().ok_or(SSTableError::MalformedSSTable)?;
        entries.push(KeyOffset { key: record.key, offset });
        pos = file.cursor_pos()?;
    }
    Ok(SparseIndex(entries))
}

/// Ascending-key iterator over an open [`SStable`]'s data area.
pub struct SStableIter<'a> {
    file: &'a mut FileHandle,
    current: usize,
    max: usize,
}

impl<'a> Iterator for SStableIter<'a> {
    type Item = Result<record::Record, SSTableError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.max {
            return None;
        }
        self.current += 1;
        match read_record(self.file) {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}
