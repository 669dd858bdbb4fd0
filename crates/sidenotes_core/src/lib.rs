//! Core of the side-notes listing.
//!
//! Keeps an in-memory listing of `<root>/.notes/*.txt` in step with the
//! filesystem and provides the note-creation path. The filesystem is the
//! source of truth; everything held in memory is rebuilt from it.

pub mod config;
pub mod host;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod view;
pub mod watch;

pub use config::{ConfigError, CountMode, NotesConfig, WatchBackend};
pub use host::{
    ContextPublisher, HostBindings, HostCommand, NamePrompt, SharedContext, UserNotifier,
};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::note_model::NoteModel;
pub use model::note_name::{NoteName, NoteNameError};
pub use service::notifier::{ChangeNotifier, SubscriptionId};
pub use service::sync_controller::{
    AddNoteOutcome, CommandOutcome, RefreshOutcome, SyncController, NAME_NOT_ENTERED_MESSAGE,
    NOTE_NAME_PROMPT,
};
pub use storage::{
    FsStorageGateway, IgnoreEntryStatus, StorageError, StorageGateway, StorageResult,
};
pub use view::NoteViewItem;
pub use watch::{
    FsSubscription, Next, WatchCoordinator, WatchError, WatchEvent, WatchEventKind, WatchScope,
    WatchState,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
