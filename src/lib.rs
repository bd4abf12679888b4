// Core layer - shared types and configuration
pub mod core;

// Features layer - all feature modules
pub mod features;

// UI components (button rows, interaction responses)
pub mod message_components;

// Infrastructure
pub mod database;

// Application layer
pub mod commands;

// Re-export core config for backwards compatibility
pub use core::Config;

// Re-export feature items for backwards compatibility
pub use features::{
    // Confirmation
    ConfirmationWorkflow, PendingDrafts,
    // Extraction
    Extractor, ReminderDraft,
    // Rate limiting
    RateLimiter,
    // Recurrence
    next_occurrence, Frequency,
    // Reminders
    Notifier, ReminderScheduler,
};
