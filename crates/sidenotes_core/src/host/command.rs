//! Host command identifiers.

/// Externally triggerable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    AddNote,
    Refresh,
}

impl HostCommand {
    pub const ADD_NOTE_ID: &'static str = "notesView.addNote";
    pub const REFRESH_ID: &'static str = "notesView.refresh";

    pub fn id(self) -> &'static str {
        match self {
            Self::AddNote => Self::ADD_NOTE_ID,
            Self::Refresh => Self::REFRESH_ID,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim() {
            Self::ADD_NOTE_ID => Some(Self::AddNote),
            Self::REFRESH_ID => Some(Self::Refresh),
            _ => None,
        }
    }
}
