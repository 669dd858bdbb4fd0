//! Derived in-memory view of the notes directory.
//!
//! # Responsibility
//! - Hold the note names observed by the last successful listing.
//! - Validate user-supplied note names before they reach storage.
//!
//! # Invariants
//! - `NoteModel` is rebuilt wholesale; there is no partial update path.
//! - The filesystem is authoritative; the model is a disposable cache.

pub mod note_model;
pub mod note_name;
