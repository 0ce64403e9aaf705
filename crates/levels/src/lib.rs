//! The level catalog: discovers existing SSTables on disk, tracks them per
//! level, and mints filenames for new ones.
//!
//! Grounded on the source's `rindb.go` (`Hino`, `LoadLevels`,
//! `NewSSTableFS`). The directory itself IS the persisted catalog — no
//! separate manifest file — per spec.md §3 ("Level catalog: ... Persisted
//! implicitly as the set of files in a single directory").

mod ulid;

use linkedlist::LinkedList;
use std::path::{Path, PathBuf};
use thiserror::Error;
use ulid::UlidGenerator;

/// Errors a level-catalog operation can report.
#[derive(Debug, Error)]
pub enum LevelsError {
    /// An underlying I/O error while scanning the directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The per-directory set of levels, each an ordered list of table paths in
/// creation order (oldest first).
pub struct LevelCatalog {
    dir: PathBuf,
    levels: Vec<LinkedList<PathBuf>>,
    ulids: UlidGenerator,
}

impl LevelCatalog {
    /// Scans `dir` for files matching `l{NN}_{ULID}.sst`, sorts the whole
    /// listing by filename (ULID suffixes sort lexicographically in
    /// creation order), then buckets each path into its level, matching
    /// the source's `LoadLevels`. Files that do not match the pattern
    /// (the WAL, a leftover `*.sst.tmp`) are ignored.
    pub fn discover(dir: &Path) -> Result<Self, LevelsError> {
        let mut entries: Vec<(String, PathBuf)> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                Some((name, path))
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut levels: Vec<LinkedList<PathBuf>> = Vec::new();
        for (name, path) in entries {
            let Some(level_idx) = parse_level_number(&name) else {
                continue;
            };
            if level_idx + 1 > levels.len() {
                levels.resize_with(level_idx + 1, LinkedList::new);
            }
            levels[level_idx].push_back(path);
        }

        Ok(Self { dir: dir.to_path_buf(), levels, ulids: UlidGenerator::new() })
    }

    /// Number of levels currently known (some may be empty).
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Mutable access to a level's table-path list, growing the catalog if
    /// `level_idx` is new.
    pub fn level_mut(&mut self, level_idx: usize) -> &mut LinkedList<PathBuf> {
        if level_idx + 1 > self.levels.len() {
            self.levels.resize_with(level_idx + 1, LinkedList::new);
        }
        &mut self.levels[level_idx]
    }

    /// Every path currently cataloged at `level_idx`, oldest first. Empty
    /// if the level does not exist yet.
    pub fn level_paths_oldest_first(&mut self, level_idx: usize) -> Vec<PathBuf> {
        if level_idx >= self.levels.len() {
            return Vec::new();
        }
        let mut cursor = self.levels[level_idx].iter();
        let mut out = Vec::new();
        while cursor.has_next() {
            out.push(cursor.next().unwrap().clone());
        }
        out
    }

    /// Every path currently cataloged at `level_idx`, newest first — the
    /// order spec.md §4.11 requires for point lookups.
    pub fn level_paths_newest_first(&mut self, level_idx: usize) -> Vec<PathBuf> {
        let mut paths = self.level_paths_oldest_first(level_idx);
        paths.reverse();
        paths
    }

    /// Generates a fresh, unused path for a new table at `level_idx`:
    /// `l{NN:02}_{ULID}.sst`, matching the source's `NewSSTableFS`.
    pub fn new_table_path(&mut self, level_idx: usize) -> PathBuf {
        let id = self.ulids.next();
        self.dir.join(format!("l{level_idx:02}_{id}.sst"))
    }

    /// The directory this catalog was discovered from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Parses the level number out of a filename matching `l{NN}_{suffix}.sst`
/// (exactly two decimal digits for `NN`), or `None` if it does not match.
fn parse_level_number(file_name: &str) -> Option<usize> {
    let stem = file_name.strip_prefix('l')?;
    let rest = stem.strip_suffix(".sst")?;
    let (digits, suffix) = rest.split_once('_')?;
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if suffix.is_empty() {
        return None;
    }
    digits.parse().ok()
}
