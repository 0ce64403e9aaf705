//! Write-ahead log: durability for every mutation before it becomes
//! visible in the memtable.
//!
//! Grounded on the source's `wal.go`. A `WAL` wraps a [`FileHandle`] and
//! knows nothing about sequence numbers or op codes — durability comes
//! from appending a [`record::Record`] and fsyncing before returning,
//! matching spec.md §4.6.

use filehandle::{FileHandle, FileHandleError};
use memtable::Memtable;
use record::{read_record, write_record, Record, RecordError};
use std::io::{Seek, SeekFrom, Write};
use thiserror::Error;

/// Errors a WAL operation can report.
#[derive(Debug, Error)]
pub enum WalError {
    /// The backing file handle is not open.
    #[error("wal file is not opened")]
    NotOpened,
    /// An underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FileHandleError> for WalError {
    fn from(e: FileHandleError) -> Self {
        match e {
            FileHandleError::NotOpened => WalError::NotOpened,
            FileHandleError::Io(e) => WalError::Io(e),
        }
    }
}

/// An append-only sequence of records backed by a single file handle.
pub struct Wal {
    file: FileHandle,
}

impl Wal {
    /// Wraps an already-open file handle as a WAL.
    pub fn new(file: FileHandle) -> Self {
        Self { file }
    }

    /// Replays every record from the start of the file into a fresh
    /// memtable, matching the source's `Load`.
    ///
    /// A partially written trailing record (host crash mid-append) is
    /// discarded rather than treated as a fatal error — the rewrite's
    /// resolution of spec.md §4.6's Open Question 2. Any other I/O error
    /// still aborts replay.
    pub fn load(&mut self) -> Result<Memtable, WalError> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut mem = Memtable::new();

        loop {
            match read_record(&mut self.file) {
                Ok(Some(record)) => mem.put(record.key, record.value),
                Ok(None) => break,
                Err(RecordError::TruncatedHeader) | Err(RecordError::TruncatedPayload) => {
                    util::riptide_warn!(
                        "wal replay found a torn trailing record; discarding and stopping"
                    );
                    break;
                }
                Err(RecordError::Io(e)) => return Err(WalError::Io(e)),
            }
        }

        Ok(mem)
    }

    /// Appends a single record: seek to end, write, fsync. Returns only
    /// after the fsync succeeds, matching spec.md's durability invariant.
    pub fn append(&mut self, record: &Record) -> Result<(), WalError> {
        self.file.seek(SeekFrom::End(0))?;
        write_record(&mut self.file, record).map_err(io_err)?;
        self.file.sync()?;
        Ok(())
    }

    /// Appends every record in `records` as a single durable batch:
    /// encode them all into an in-memory buffer, issue one write, then one
    /// fsync — either all records become durable or none become visible
    /// as a partial batch.
    pub fn append_many(&mut self, records: &[Record]) -> Result<(), WalError> {
        self.file.seek(SeekFrom::End(0))?;

        let mut buf = Vec::new();
        for record in records {
            write_record(&mut buf, record).map_err(io_err)?;
        }

        self.file.write_all(&buf)?;
        self.file.sync()?;
        Ok(())
    }

    /// Truncates the WAL to empty and fsyncs, matching the source's
    /// `Clean` — called after a successful flush.
    pub fn clean(&mut self) -> Result<(), WalError> {
        self.file.clean()?;
        Ok(())
    }

    /// Closes the underlying file handle.
    pub fn close(&mut self) -> Result<(), WalError> {
        self.file.close()?;
        Ok(())
    }
}

fn io_err(e: RecordError) -> std::io::Error {
    match e {
        RecordError::Io(e) => e,
        other => std::io::Error::new(std::io::ErrorKind::Other, other.to_string()),
    }
}
