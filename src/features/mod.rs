//! # Features Layer
//!
//! All feature modules of the reminder bot, leaf-first: recurrence and
//! extraction are pure, confirmation sits on storage, and the reminders
//! sweep ties them together.

pub mod confirmation;
pub mod extraction;
pub mod rate_limiting;
pub mod recurrence;
pub mod reminders;

// Re-export primary feature items
pub use confirmation::{ConfirmationWorkflow, PendingDrafts};
pub use extraction::{Extractor, ReminderDraft};
pub use rate_limiting::RateLimiter;
pub use recurrence::{next_occurrence, Frequency};
pub use reminders::{Notifier, ReminderScheduler};
