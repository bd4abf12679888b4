//! # Confirmation Feature
//!
//! Turns extracted drafts into durable reminders through explicit user
//! approval and recurrence selection.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

pub mod pending;
pub mod workflow;

pub use pending::{PendingDraft, PendingDrafts};
pub use workflow::{ConfirmOutcome, ConfirmationWorkflow, SubmitOutcome};
