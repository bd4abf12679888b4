//! # Core Module
//!
//! Core configuration and reply formatting for the reminder bot.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add fire-time formatting alongside message chunking
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use response::{chunk_for_message, chunk_text, format_fire_time, month_name, MESSAGE_LIMIT};
