//! # Reminders Feature
//!
//! The due-reminder sweep and the dispatch seam it delivers through.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true

pub mod scheduler;

pub use scheduler::{Notifier, ReminderScheduler};
