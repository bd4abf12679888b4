//! # Extraction Feature
//!
//! Natural-language parsing of reminder requests into structured drafts.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod extractor;

pub use extractor::{Extractor, ReminderDraft, TimeOfDay};
