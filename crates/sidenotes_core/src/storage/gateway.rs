//! Storage gateway contract and its `std::fs` implementation.

use super::ignore::{self, IgnoreEntryStatus};
use super::{StorageError, StorageResult};
use crate::config::NotesConfig;
use log::{debug, info};
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Filesystem access contract used by `SyncController`.
///
/// Implementations hold no note state; every call reads the filesystem.
pub trait StorageGateway: Send + Sync {
    /// Absolute path of the notes directory.
    fn notes_dir(&self) -> &Path;
    /// Non-failing existence check for the notes directory.
    fn directory_exists(&self) -> bool;
    /// Creates the notes directory when absent. Returns `true` if created.
    fn ensure_directory(&self) -> StorageResult<bool>;
    /// Sorted names of suffix-qualified notes; empty when the directory is absent.
    fn list_qualifying_files(&self) -> StorageResult<Vec<String>>;
    /// Sorted names of every entry; empty when the directory is absent.
    fn list_all_files(&self) -> StorageResult<Vec<String>>;
    /// Creates an empty `<name><suffix>` file and returns its path.
    ///
    /// Fails with `StorageError::AlreadyExists` instead of overwriting.
    fn create_file(&self, name: &str) -> StorageResult<PathBuf>;
    /// Ensures the ignore file excludes the notes directory.
    fn ensure_ignore_entry(&self) -> StorageResult<IgnoreEntryStatus>;
}

/// `std::fs`-backed gateway rooted at one project.
#[derive(Debug, Clone)]
pub struct FsStorageGateway {
    notes_dir: PathBuf,
    ignore_file: PathBuf,
    ignore_entry: String,
    suffix: String,
}

impl FsStorageGateway {
    pub fn new(config: &NotesConfig) -> Self {
        Self {
            notes_dir: config.notes_dir(),
            ignore_file: config.ignore_file(),
            ignore_entry: config.notes_dir_name.clone(),
            suffix: config.note_suffix.clone(),
        }
    }

    fn read_names(&self, qualifying_only: bool) -> StorageResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.notes_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StorageError::io(&self.notes_dir, err)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| StorageError::io(&self.notes_dir, err))?;
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    debug!(
                        "event=list_skip module=storage status=non_utf8 name={:?}",
                        raw
                    );
                    continue;
                }
            };
            if qualifying_only {
                if !name.ends_with(&self.suffix) {
                    continue;
                }
                // Entry may vanish between readdir and stat; treat it as gone.
                match entry.file_type() {
                    Ok(kind) if kind.is_dir() => continue,
                    Ok(_) => {}
                    Err(_) => continue,
                }
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }
}

impl StorageGateway for FsStorageGateway {
    fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    fn directory_exists(&self) -> bool {
        self.notes_dir.is_dir()
    }

    fn ensure_directory(&self) -> StorageResult<bool> {
        match std::fs::create_dir(&self.notes_dir) {
            Ok(()) => {
                info!(
                    "event=notes_dir_created module=storage status=ok path={}",
                    self.notes_dir.display()
                );
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists && self.notes_dir.is_dir() => {
                Ok(false)
            }
            Err(err) => Err(StorageError::io(&self.notes_dir, err)),
        }
    }

    fn list_qualifying_files(&self) -> StorageResult<Vec<String>> {
        self.read_names(true)
    }

    fn list_all_files(&self) -> StorageResult<Vec<String>> {
        self.read_names(false)
    }

    fn create_file(&self, name: &str) -> StorageResult<PathBuf> {
        let path = self.notes_dir.join(format!("{name}{}", self.suffix));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                info!(
                    "event=note_file_created module=storage status=ok path={}",
                    path.display()
                );
                Ok(path)
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                Err(StorageError::AlreadyExists(path))
            }
            Err(err) => Err(StorageError::io(path, err)),
        }
    }

    fn ensure_ignore_entry(&self) -> StorageResult<IgnoreEntryStatus> {
        ignore::ensure_entry(&self.ignore_file, &self.ignore_entry)
    }
}
