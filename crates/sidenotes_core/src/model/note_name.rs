//! User-supplied note name validation.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static FORBIDDEN_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[/\\\x00-\x1f\x7f]").expect("valid forbidden-char regex"));

/// Rejection reasons for a note name entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteNameError {
    /// Empty or whitespace-only input.
    Empty,
    /// Contains a path separator or control character.
    InvalidCharacters(String),
    /// `.` or `..`.
    Reserved(String),
}

impl Display for NoteNameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "note name cannot be empty"),
            Self::InvalidCharacters(value) => {
                write!(f, "note name contains invalid characters: `{}`", value.escape_default())
            }
            Self::Reserved(value) => write!(f, "note name is reserved: `{value}`"),
        }
    }
}

impl Error for NoteNameError {}

/// Validated note base name (without the note suffix).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteName(String);

impl NoteName {
    /// Trims and validates raw prompt input.
    pub fn parse(raw: &str) -> Result<Self, NoteNameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NoteNameError::Empty);
        }
        if trimmed == "." || trimmed == ".." {
            return Err(NoteNameError::Reserved(trimmed.to_string()));
        }
        if FORBIDDEN_CHARS_RE.is_match(trimmed) {
            return Err(NoteNameError::InvalidCharacters(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NoteName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
