//! Sync use-case services.
//!
//! # Responsibility
//! - Orchestrate storage calls into refresh/add-note use-cases.
//! - Convert every storage failure into a fallback or a user message.
//!
//! # See also
//! - `crate::watch` for the event source that drives refreshes.

pub mod notifier;
pub mod sync_controller;
