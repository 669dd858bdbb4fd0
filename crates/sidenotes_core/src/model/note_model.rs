//! Note listing snapshot.

use serde::Serialize;

/// Ordered note file names taken from one directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteModel {
    names: Vec<String>,
}

impl NoteModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents with one listing result.
    pub fn rebuild(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.names.iter().any(|name| name == file_name)
    }
}
