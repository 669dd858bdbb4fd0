//! Contracts for the editor host collaborators.
//!
//! # Responsibility
//! - Describe what the core needs from the host: a name prompt, a place to
//!   show messages, and a sink for the published notes count.
//! - Map host command identifiers onto sync operations.
//!
//! # Invariants
//! - No raw filesystem error crosses these contracts; the service converts
//!   failures into user-facing strings first.

pub mod command;
pub mod context;

pub use command::HostCommand;
pub use context::{ContextPublisher, SharedContext};

use std::sync::Arc;

/// The three host collaborators a `SyncController` is wired to.
#[derive(Clone)]
pub struct HostBindings {
    pub prompt: Arc<dyn NamePrompt>,
    pub notifier: Arc<dyn UserNotifier>,
    pub context: Arc<dyn ContextPublisher>,
}

/// Input collaborator asking the user for a note name.
pub trait NamePrompt: Send + Sync {
    /// Returns `None` when the user cancels.
    fn prompt_note_name(&self, prompt: &str) -> Option<String>;
}

impl<F> NamePrompt for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn prompt_note_name(&self, prompt: &str) -> Option<String> {
        self(prompt)
    }
}

/// User-visible message surface.
pub trait UserNotifier: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}
