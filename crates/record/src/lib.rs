//! The on-disk record frame shared by the WAL and every SSTable area
//! (data, sparse index).
//!
//! Grounded on the source's `io.go` and `record.go`: two little-endian u64
//! length headers followed by the raw key and value bytes, read/written in
//! chunks of at most [`CHUNK_STEP`] bytes (`io.go`'s `defaultReadStep`) so a
//! short read from the underlying stream is retried rather than treated as
//! corruption.
//!
//! ## Tombstone encoding
//!
//! The source conflates "no value" with "deleted" by storing a nil value
//! slice for both. This rewrite keeps the record frame's shape unchanged
//! (spec.md §4.3: two u64 LE lengths + bytes) but gives deletions an
//! unambiguous encoding: the value-length field carries the sentinel
//! [`TOMBSTONE_SENTINEL`] (`u64::MAX`) and no value bytes follow. No real
//! value can reach that length under [`MAX_VALUE_SIZE`]-style ceilings
//! enforced above this crate, so `Value::Data(vec![])` (a legitimate empty
//! value) and `Value::Tombstone` (a deletion) are never confused.

use std::io::{self, Read, Write};
use thiserror::Error;

/// Read/write step size, matching the source's `defaultReadStep = 255`.
pub const CHUNK_STEP: usize = 255;

/// Value-length sentinel marking a tombstone record.
pub const TOMBSTONE_SENTINEL: u64 = u64::MAX;

/// The width, in bytes, of each length header.
pub const LEN_FIELD_BYTES: u64 = 8;

/// Errors produced while reading or writing a record frame.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The underlying stream failed outside of a length/content boundary.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// The stream ended partway through a length header.
    #[error("truncated record header")]
    TruncatedHeader,
    /// The stream ended partway through key or value bytes.
    #[error("truncated record payload")]
    TruncatedPayload,
}

/// A record's value: live data, or a deletion marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A live value, possibly empty.
    Data(Vec<u8>),
    /// A deletion marker.
    Tombstone,
}

impl Value {
    /// Borrows the live bytes, or `None` for a tombstone.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Data(v) => Some(v),
            Value::Tombstone => None,
        }
    }

    /// `true` for a tombstone.
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Value::Tombstone)
    }
}

/// A `(key, value)` pair as it appears on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Vec<u8>,
    pub value: Value,
}

impl Record {
    /// Builds a live-data record.
    pub fn data(key: Vec<u8>, value: Vec<u8>) -> Self {
        Self { key, value: Value::Data(value) }
    }

    /// Builds a tombstone record.
    pub fn tombstone(key: Vec<u8>) -> Self {
        Self { key, value: Value::Tombstone }
    }

    /// Builds a record whose value slot carries an encoded `u64` LE offset
    /// — the shape every sparse-index entry takes.
    pub fn with_offset(key: Vec<u8>, offset: u64) -> Self {
        Self::data(key, offset.to_le_bytes().to_vec())
    }

    /// Decodes this record's value as a `u64` LE offset (sparse-index
    /// entries and the SSTable trailer reuse the record frame this way).
    pub fn as_offset(&self) -> Option<u64> {
        let bytes = self.value.as_bytes()?;
        let arr: [u8; 8] = bytes.try_into().ok()?;
        Some(u64::from_le_bytes(arr))
    }

    /// Bytes this record occupies on disk: `16 + |key| + |value|`
    /// (`0` value bytes for a tombstone), per spec.md §3.
    pub fn on_disk_size(&self) -> u64 {
        on_disk_size(self.key.len(), self.value.as_bytes().map_or(0, |v| v.len()))
    }
}

/// `16 + key_len + value_len`, the formula behind the source's
/// `CalOnDiskSize`.
pub fn on_disk_size(key_len: usize, value_len: usize) -> u64 {
    2 * LEN_FIELD_BYTES + key_len as u64 + value_len as u64
}

/// Writes `record`'s frame to `w`: two u64 LE length headers, then the key
/// bytes, then the value bytes (absent for a tombstone).
pub fn write_record<W: Write>(w: &mut W, record: &Record) -> Result<(), RecordError> {
    w.write_all(&(record.key.len() as u64).to_le_bytes())?;
    let value_len_field = match &record.value {
        Value::Data(v) => v.len() as u64,
        Value::Tombstone => TOMBSTONE_SENTINEL,
    };
    w.write_all(&value_len_field.to_le_bytes())?;
    w.write_all(&record.key)?;
    if let Value::Data(v) = &record.value {
        w.write_all(v)?;
    }
    Ok(())
}

/// Reads one record frame from `r`.
///
/// Returns `Ok(None)` on a clean end-of-stream (no bytes read before the
/// key-length header). Any other truncation — a partial header, or a
/// payload shorter than its declared length — is a
/// [`RecordError::TruncatedHeader`] / [`RecordError::TruncatedPayload`]
/// error; callers that tolerate a torn trailing record (the WAL) catch
/// these and stop, while callers that require a complete file (the
/// SSTable reader) propagate them.
pub fn read_record<R: Read>(r: &mut R) -> Result<Option<Record>, RecordError> {
    let key_len = match read_len_field(r)? {
        Some(v) => v,
        None => return Ok(None),
    };
    let value_len_field = read_len_field(r)?.ok_or(RecordError::TruncatedHeader)?;

    let key = read_chunked(r, key_len as usize)?;
    let value = if value_len_field == TOMBSTONE_SENTINEL {
        Value::Tombstone
    } else {
        Value::Data(read_chunked(r, value_len_field as usize)?)
    };

    Ok(Some(Record { key, value }))
}

/// Reads one 8-byte little-endian length field. `Ok(None)` signals a clean
/// EOF (zero bytes available); a partial header is
/// [`RecordError::TruncatedHeader`].
fn read_len_field<R: Read>(r: &mut R) -> Result<Option<u64>, RecordError> {
    let mut buf = [0u8; 8];
    let mut filled = 0usize;
    while filled < buf.len() {
        let n = r.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    if filled == 0 {
        return Ok(None);
    }
    if filled < buf.len() {
        return Err(RecordError::TruncatedHeader);
    }
    Ok(Some(u64::from_le_bytes(buf)))
}

/// Reads exactly `len` bytes from `r` in steps of at most [`CHUNK_STEP`],
/// retrying short reads. A stream that ends before `len` bytes are
/// collected is [`RecordError::TruncatedPayload`].
fn read_chunked<R: Read>(r: &mut R, len: usize) -> Result<Vec<u8>, RecordError> {
    let mut out = Vec::with_capacity(len);
    let mut remaining = len;
    while remaining > 0 {
        let step = remaining.min(CHUNK_STEP);
        let mut buf = vec![0u8; step];
        let mut filled = 0usize;
        while filled < step {
            let n = r.read(&mut buf[filled..])?;
            if n == 0 {
                return Err(RecordError::TruncatedPayload);
            }
            filled += n;
        }
        out.extend_from_slice(&buf);
        remaining -= step;
    }
    Ok(out)
}
