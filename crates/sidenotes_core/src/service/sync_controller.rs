//! Refresh and note-creation orchestration.
//!
//! # Responsibility
//! - Rebuild `NoteModel` from storage, publish the notes count, and notify
//!   observers.
//! - Provision the notes directory and ignore entry, then create a note
//!   named by the host prompt.
//!
//! # Invariants
//! - At most one `refresh`/`add_note` runs at a time (operation lock).
//! - `refresh` never fails; listing errors keep the last good model.
//! - `add_note` never overwrites an existing note.
//! - Provisioning happens before prompting, even if the user cancels.
//! - Observers must not call back into `refresh`/`add_note`.

use crate::config::{ConfigError, CountMode, NotesConfig};
use crate::host::{HostBindings, HostCommand};
use crate::model::note_model::NoteModel;
use crate::model::note_name::{NoteName, NoteNameError};
use crate::service::notifier::{ChangeNotifier, SubscriptionId};
use crate::storage::{FsStorageGateway, StorageError, StorageGateway};
use crate::view::{self, NoteViewItem};
use crate::watch::{WatchCoordinator, WatchError};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

pub const NOTE_NAME_PROMPT: &str = "Enter a name for the file:";
pub const NAME_NOT_ENTERED_MESSAGE: &str = "Name not entered";

/// Result of one `refresh` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Model rebuilt from a fresh listing; `count` was published.
    Updated { count: usize },
    /// Listing failed; the previous model and count were kept.
    Retained { count: usize },
}

impl RefreshOutcome {
    pub fn count(self) -> usize {
        match self {
            Self::Updated { count } | Self::Retained { count } => count,
        }
    }
}

/// Result of one `add_note` call. Every variant has already been reported
/// to the user through `UserNotifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddNoteOutcome {
    Created { file_name: String, path: PathBuf },
    /// Prompt returned no value.
    Cancelled,
    /// Prompt returned a value that is not a usable note name.
    Rejected(NoteNameError),
    /// A note with this file name already exists; it was left untouched.
    Conflict { file_name: String },
    Failed { message: String },
}

/// Result of `SyncController::dispatch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Refreshed(RefreshOutcome),
    NoteAdded(AddNoteOutcome),
}

#[derive(Debug, Default)]
struct SyncState {
    model: NoteModel,
    count: usize,
}

/// Keeps `NoteModel` in step with the notes directory.
pub struct SyncController<S: StorageGateway> {
    storage: S,
    host: HostBindings,
    context_key: String,
    count_mode: CountMode,
    state: RwLock<SyncState>,
    changes: ChangeNotifier,
    op_lock: Mutex<()>,
}

impl SyncController<FsStorageGateway> {
    /// Validates `config` and builds a controller over the real filesystem.
    pub fn from_config(config: &NotesConfig, host: HostBindings) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(FsStorageGateway::new(config), config, host))
    }
}

impl<S: StorageGateway> SyncController<S> {
    pub fn new(storage: S, config: &NotesConfig, host: HostBindings) -> Self {
        Self {
            storage,
            host,
            context_key: config.context_key.clone(),
            count_mode: config.count_mode,
            state: RwLock::new(SyncState::default()),
            changes: ChangeNotifier::new(),
            op_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Snapshot of the model from the last successful refresh.
    pub fn notes(&self) -> NoteModel {
        self.read_state().model.clone()
    }

    /// Last published notes count.
    pub fn notes_count(&self) -> usize {
        self.read_state().count
    }

    pub fn view_items(&self) -> Vec<NoteViewItem> {
        view::items(&self.read_state().model, self.storage.notes_dir())
    }

    /// Registers a "model changed" observer.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&NoteModel) + Send + Sync + 'static,
    {
        self.changes.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.changes.unsubscribe(id)
    }

    pub fn dispatch(&self, command: HostCommand) -> CommandOutcome {
        match command {
            HostCommand::AddNote => CommandOutcome::NoteAdded(self.add_note()),
            HostCommand::Refresh => CommandOutcome::Refreshed(self.refresh()),
        }
    }

    /// Rebuilds the model from the notes directory, publishes the count and
    /// notifies observers.
    pub fn refresh(&self) -> RefreshOutcome {
        let _op = self.lock_ops();
        self.refresh_locked()
    }

    /// Provisions storage, prompts for a name and creates the note.
    pub fn add_note(&self) -> AddNoteOutcome {
        let _op = self.lock_ops();
        if let Err(outcome) = self.provision_locked() {
            return outcome;
        }
        let raw = self.host.prompt.prompt_note_name(NOTE_NAME_PROMPT);
        self.create_locked(raw)
    }

    /// Same as `add_note` with the name supplied up front.
    pub fn add_note_named(&self, name: &str) -> AddNoteOutcome {
        let _op = self.lock_ops();
        if let Err(outcome) = self.provision_locked() {
            return outcome;
        }
        self.create_locked(Some(name.to_string()))
    }

    fn refresh_locked(&self) -> RefreshOutcome {
        let names = match self.storage.list_qualifying_files() {
            Ok(names) => names,
            Err(err) if !self.storage.directory_exists() => {
                info!(
                    "event=refresh module=sync status=dir_missing error={}",
                    err
                );
                Vec::new()
            }
            Err(err) => {
                let count = self.read_state().count;
                warn!(
                    "event=refresh module=sync status=retained count={} error={}",
                    count, err
                );
                return RefreshOutcome::Retained { count };
            }
        };

        let model = NoteModel::rebuild(names);
        let count = self.count_for(&model);
        {
            let mut state = self.write_state();
            state.model = model.clone();
            state.count = count;
        }
        self.host.context.publish(&self.context_key, count);
        self.changes.notify(&model);
        info!(
            "event=refresh module=sync status=ok notes={} count={}",
            model.len(),
            count
        );
        RefreshOutcome::Updated { count }
    }

    fn count_for(&self, model: &NoteModel) -> usize {
        match self.count_mode {
            CountMode::Notes => model.len(),
            CountMode::AllEntries => match self.storage.list_all_files() {
                Ok(entries) => entries.len(),
                Err(err) => {
                    warn!(
                        "event=count_entries module=sync status=fallback error={}",
                        err
                    );
                    model.len()
                }
            },
        }
    }

    fn provision_locked(&self) -> Result<(), AddNoteOutcome> {
        if let Err(err) = self.storage.ensure_directory() {
            error!(
                "event=add_note module=sync status=error stage=ensure_directory error={}",
                err
            );
            let message = format!("Could not create notes folder: {err}");
            self.host.notifier.error(&message);
            return Err(AddNoteOutcome::Failed { message });
        }

        if let Err(err) = self.storage.ensure_ignore_entry() {
            warn!(
                "event=add_note module=sync status=warn stage=ensure_ignore_entry error={}",
                err
            );
            self.host
                .notifier
                .warn(&format!("Could not update ignore file: {err}"));
        }
        Ok(())
    }

    fn create_locked(&self, raw: Option<String>) -> AddNoteOutcome {
        let Some(raw) = raw else {
            info!("event=add_note module=sync status=cancelled");
            self.host.notifier.error(NAME_NOT_ENTERED_MESSAGE);
            return AddNoteOutcome::Cancelled;
        };

        let name = match NoteName::parse(&raw) {
            Ok(name) => name,
            Err(err) => {
                info!("event=add_note module=sync status=rejected reason={}", err);
                self.host.notifier.error(&format!("Invalid note name: {err}"));
                return AddNoteOutcome::Rejected(err);
            }
        };

        match self.storage.create_file(name.as_str()) {
            Ok(path) => {
                let file_name = file_name_of(&path);
                self.refresh_locked();
                self.host.notifier.info(&format!("Created note {file_name}"));
                AddNoteOutcome::Created { file_name, path }
            }
            Err(StorageError::AlreadyExists(path)) => {
                let file_name = file_name_of(&path);
                info!(
                    "event=add_note module=sync status=conflict file={}",
                    file_name
                );
                self.host
                    .notifier
                    .error(&format!("A note named {file_name} already exists"));
                AddNoteOutcome::Conflict { file_name }
            }
            Err(err) => {
                error!(
                    "event=add_note module=sync status=error stage=create_file error={}",
                    err
                );
                let message = format!("Could not create note {name}: {err}");
                self.host.notifier.error(&message);
                AddNoteOutcome::Failed { message }
            }
        }
    }

    fn lock_ops(&self) -> MutexGuard<'_, ()> {
        match self.op_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, SyncState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, SyncState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<S: StorageGateway + 'static> SyncController<S> {
    /// Starts a `WatchCoordinator` that refreshes this controller on every
    /// relevant directory event.
    ///
    /// The coordinator holds a weak reference; dropping the last `Arc` of
    /// the controller turns later events into no-ops.
    pub fn start_watching(
        self: &Arc<Self>,
        config: &NotesConfig,
    ) -> Result<WatchCoordinator, WatchError> {
        let controller = Arc::downgrade(self);
        WatchCoordinator::start(config, move || {
            if let Some(controller) = controller.upgrade() {
                controller.refresh();
            }
        })
    }
}

fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
