//! Storage layer over the notes directory and the ignore file.
//!
//! # Responsibility
//! - Define the filesystem access contract used by the sync service.
//! - Keep raw `std::io` details out of service orchestration.
//!
//! # Invariants
//! - A missing notes directory is a valid state equivalent to zero notes.
//! - Note creation never overwrites an existing file.
//! - The ignore file is append-only from this crate's point of view.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod gateway;
pub mod ignore;

pub use gateway::{FsStorageGateway, StorageGateway};
pub use ignore::IgnoreEntryStatus;

pub type StorageResult<T> = Result<T, StorageError>;

/// Typed storage failure surfaced by `StorageGateway` implementations.
#[derive(Debug)]
pub enum StorageError {
    /// A note with the exact target file name already exists.
    AlreadyExists(PathBuf),
    /// Any other filesystem failure (permissions, disk, path collision).
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::AlreadyExists(path) => path,
            Self::Io { path, .. } => path,
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyExists(path) => write!(f, "file already exists: {}", path.display()),
            Self::Io { path, source } => write!(f, "io failure at {}: {source}", path.display()),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AlreadyExists(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}
