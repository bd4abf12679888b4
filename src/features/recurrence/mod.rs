//! # Recurrence Feature
//!
//! Frequency model and calendar arithmetic for advancing recurring reminders.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod calculator;

pub use calculator::{days_in_month, next_occurrence, Frequency};
