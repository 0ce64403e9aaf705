//! A small wrapper around a single on-disk file, tracking whether it is
//! currently open.
//!
//! Grounded on the source's `filesystem.go`. Per Design Notes ("express
//! 'not opened' as a sum type... so the compiler enforces the check"),
//! `FileHandle` holds its open/closed state as an enum rather than an
//! `Option<File>` plus a boolean flag.

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use thiserror::Error;

/// Permission bits applied to every file this crate creates, matching the
/// source's `fileSystemPermission = 0o600`.
const FILE_PERMISSION: u32 = 0o600;

/// Errors a file handle operation can report.
#[derive(Debug, Error)]
pub enum FileHandleError {
    /// An I/O operation was attempted before `open()` or after `close()`.
    #[error("file is not opened")]
    NotOpened,
    /// An underlying I/O error, wrapped with no extra context beyond the
    /// source error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

enum State {
    Closed,
    Open(std::fs::File),
}

/// A file opened read/write, created if missing, with 0o600 permissions.
pub struct FileHandle {
    path: PathBuf,
    state: State,
}

impl FileHandle {
    /// Builds a handle in the closed state for `path` without touching the
    /// filesystem.
    pub fn closed<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: sanitize(path.as_ref()),
            state: State::Closed,
        }
    }

    /// Opens `path` immediately (creating it if missing).
    pub fn open_new<P: AsRef<Path>>(path: P) -> Result<Self, FileHandleError> {
        let mut fh = Self::closed(path);
        fh.open()?;
        Ok(fh)
    }

    /// `true` iff the handle currently owns an open file descriptor.
    pub fn is_opened(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// The (sanitized) path this handle refers to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file, creating it if it does not exist. Calling `open`
    /// while already open logs a warning and is otherwise a no-op,
    /// matching the source's `Open` (`WARN("File %s is already opened...")`).
    pub fn open(&mut self) -> Result<(), FileHandleError> {
        if self.is_opened() {
            util::riptide_warn!(
                "file {} is already opened; consider close and re-open again",
                self.path.display()
            );
            return Ok(());
        }

        let mut opts = OpenOptions::new();
        opts.read(true).write(true).create(true);
        #[cfg(unix)]
        opts.mode(FILE_PERMISSION);
        let file = opts.open(&self.path)?;
        self.state = State::Open(file);
        Ok(())
    }

    /// Closes the file. Errors with [`FileHandleError::NotOpened`] if
    /// already closed.
    pub fn close(&mut self) -> Result<(), FileHandleError> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(file) => {
                drop(file);
                Ok(())
            }
            State::Closed => Err(FileHandleError::NotOpened),
        }
    }

    /// Flushes the file's contents and metadata to disk.
    pub fn sync(&mut self) -> Result<(), FileHandleError> {
        self.file_mut()?.sync_all()?;
        Ok(())
    }

    /// Current cursor offset from the start of the file.
    pub fn cursor_pos(&mut self) -> Result<u64, FileHandleError> {
        Ok(self.file_mut()?.seek(SeekFrom::Current(0))?)
    }

    /// Closes, truncates to zero length, reopens, and fsyncs — matching
    /// the source's `Clean`.
    pub fn clean(&mut self) -> Result<(), FileHandleError> {
        self.close()?;

        let mut opts = OpenOptions::new();
        opts.read(true).write(true).create(true).truncate(true);
        #[cfg(unix)]
        opts.mode(FILE_PERMISSION);
        let file = opts.open(&self.path)?;
        self.state = State::Open(file);

        self.sync()
    }

    /// Renames the underlying file while keeping the handle usable.
    ///
    /// Matches the source's `Rename`, also marked obsolete there
    /// ("no more purpose to use this function").
    #[deprecated(note = "no more purpose to use this function")]
    pub fn rename<P: AsRef<Path>>(&mut self, new_path: P) -> Result<(), FileHandleError> {
        self.close()?;
        let new_path = sanitize(new_path.as_ref());
        fs::rename(&self.path, &new_path)?;
        self.path = new_path;
        self.open()
    }

    fn file_mut(&mut self) -> Result<&mut std::fs::File, FileHandleError> {
        match &mut self.state {
            State::Open(f) => Ok(f),
            State::Closed => Err(FileHandleError::NotOpened),
        }
    }
}

/// Rejects path components that would escape the intended directory
/// (`..`), matching spec.md §4.4's "Path is sanitized before open".
fn sanitize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::ParentDir))
        .collect()
}

fn not_opened_io_error() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "file is not opened")
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.state {
            State::Open(f) => f.read(buf),
            State::Closed => Err(not_opened_io_error()),
        }
    }
}

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.state {
            State::Open(f) => f.write(buf),
            State::Closed => Err(not_opened_io_error()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.state {
            State::Open(f) => f.flush(),
            State::Closed => Err(not_opened_io_error()),
        }
    }
}

impl Seek for FileHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.state {
            State::Open(f) => f.seek(pos),
            State::Closed => Err(not_opened_io_error()),
        }
    }
}
