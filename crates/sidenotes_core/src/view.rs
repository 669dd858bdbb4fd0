//! Tree-view projection of the note model.
//!
//! The host renders one item per note and opens `path` when it is activated.

use crate::model::note_model::NoteModel;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One row in the host's notes tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteViewItem {
    pub label: String,
    pub path: PathBuf,
}

pub fn items(model: &NoteModel, notes_dir: &Path) -> Vec<NoteViewItem> {
    model
        .names()
        .iter()
        .map(|name| NoteViewItem {
            label: name.clone(),
            path: notes_dir.join(name),
        })
        .collect()
}
