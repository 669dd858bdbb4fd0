//! Project-level configuration for the notes listing.
//!
//! # Responsibility
//! - Describe where notes live relative to a project root.
//! - Carry watch and count tuning knobs supplied by the host.
//!
//! # Invariants
//! - `notes_dir_name` is a single normal path component without surrounding
//!   whitespace, used verbatim by storage, watch and the ignore entry.
//! - `note_suffix` and `context_key` are never empty after `validate()`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_NOTES_DIR_NAME: &str = ".notes";
pub const DEFAULT_NOTE_SUFFIX: &str = ".txt";
pub const DEFAULT_IGNORE_FILE_NAME: &str = ".gitignore";
pub const DEFAULT_CONTEXT_KEY: &str = "notesView.notesLen";
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Which listing feeds the published notes count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    /// Count only suffix-qualified notes (matches the rendered list).
    #[default]
    Notes,
    /// Count every entry in the notes directory.
    AllEntries,
}

/// Filesystem notification backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchBackend {
    /// OS-native notifications (inotify, FSEvents, ReadDirectoryChangesW).
    #[default]
    Native,
    /// Periodic directory scans. Useful on network mounts.
    Poll,
}

/// Configuration error raised by `NotesConfig::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNotesDir(String),
    EmptySuffix,
    EmptyContextKey,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNotesDir(value) => {
                write!(f, "notes directory must be a single path component, got `{value}`")
            }
            Self::EmptySuffix => write!(f, "note suffix cannot be empty"),
            Self::EmptyContextKey => write!(f, "context key cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Notes listing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    pub project_root: PathBuf,
    pub notes_dir_name: String,
    pub note_suffix: String,
    pub ignore_file_name: String,
    pub context_key: String,
    pub count_mode: CountMode,
    /// Debounce window for watch events. `0` refreshes once per event.
    pub debounce_ms: u64,
    pub watch_backend: WatchBackend,
    pub poll_interval_ms: u64,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            notes_dir_name: DEFAULT_NOTES_DIR_NAME.to_string(),
            note_suffix: DEFAULT_NOTE_SUFFIX.to_string(),
            ignore_file_name: DEFAULT_IGNORE_FILE_NAME.to_string(),
            context_key: DEFAULT_CONTEXT_KEY.to_string(),
            count_mode: CountMode::default(),
            debounce_ms: 0,
            watch_backend: WatchBackend::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl NotesConfig {
    /// Creates a default configuration rooted at `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    /// `<root>/<notes_dir_name>`.
    pub fn notes_dir(&self) -> PathBuf {
        self.project_root.join(&self.notes_dir_name)
    }

    /// `<root>/<ignore_file_name>`.
    pub fn ignore_file(&self) -> PathBuf {
        self.project_root.join(&self.ignore_file_name)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.notes_dir_name.as_str();
        let mut components = Path::new(name).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(std::path::Component::Normal(_)), None)
        );
        if name.is_empty()
            || name.trim() != name
            || !single_normal
            || name.contains(['/', '\\'])
        {
            return Err(ConfigError::InvalidNotesDir(self.notes_dir_name.clone()));
        }
        if self.note_suffix.is_empty() {
            return Err(ConfigError::EmptySuffix);
        }
        if self.context_key.trim().is_empty() {
            return Err(ConfigError::EmptyContextKey);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CountMode, NotesConfig};
    use std::path::PathBuf;

    #[test]
    fn defaults_point_at_dot_notes_and_gitignore() {
        let config = NotesConfig::new("/project");
        assert_eq!(config.notes_dir(), PathBuf::from("/project/.notes"));
        assert_eq!(config.ignore_file(), PathBuf::from("/project/.gitignore"));
        assert_eq!(config.count_mode, CountMode::Notes);
        assert!(config.debounce().is_zero());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_nested_or_parent_notes_dir() {
        for bad in ["", "..", ".", "a/b", "a\\b"] {
            let mut config = NotesConfig::new("/project");
            config.notes_dir_name = bad.to_string();
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidNotesDir(_))),
                "`{bad}` should be rejected"
            );
        }
    }

    #[test]
    fn validate_rejects_whitespace_padded_notes_dir() {
        for bad in [" .notes", ".notes ", "\t.notes"] {
            let mut config = NotesConfig::new("/project");
            config.notes_dir_name = bad.to_string();
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidNotesDir(_))),
                "`{bad:?}` should be rejected"
            );
        }
    }

    #[test]
    fn validate_rejects_empty_suffix_and_key() {
        let mut config = NotesConfig::new("/project");
        config.note_suffix.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptySuffix));

        let mut config = NotesConfig::new("/project");
        config.context_key = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptyContextKey));
    }
}
