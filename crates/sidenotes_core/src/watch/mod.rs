//! Filesystem watch over the notes directory.
//!
//! # Responsibility
//! - Turn raw `notify` events into typed Created/Deleted events for the
//!   notes directory itself and for its direct children.
//! - Drive a refresh callback from those events on a worker thread.
//!
//! # Invariants
//! - Watches are non-recursive: the project root (for the directory entry)
//!   and the notes directory (for its contents).
//! - The contents watch follows the directory: it is re-registered when the
//!   directory is created and dropped when it is deleted.
//! - No callback fires after `WatchCoordinator::stop` returns.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod coordinator;
pub mod subscription;

pub use coordinator::{WatchCoordinator, WatchState};
pub use subscription::{FsSubscription, Next, SubscriptionCloser};

/// Which logical watch produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchScope {
    /// The notes directory entry itself.
    Directory,
    /// A direct child of the notes directory.
    Contents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchEventKind {
    Created,
    Deleted,
}

/// One relevant filesystem change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub scope: WatchScope,
    pub kind: WatchEventKind,
    pub path: PathBuf,
}

#[derive(Debug)]
pub enum WatchError {
    /// Backend could not be constructed.
    Create(notify::Error),
    /// A path could not be registered.
    Watch {
        path: PathBuf,
        source: notify::Error,
    },
    /// Worker thread could not be spawned.
    Spawn(std::io::Error),
}

impl Display for WatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create(err) => write!(f, "failed to create filesystem watcher: {err}"),
            Self::Watch { path, source } => {
                write!(f, "failed to watch {}: {source}", path.display())
            }
            Self::Spawn(err) => write!(f, "failed to spawn watch worker: {err}"),
        }
    }
}

impl Error for WatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Create(err) => Some(err),
            Self::Watch { source, .. } => Some(source),
            Self::Spawn(err) => Some(err),
        }
    }
}
