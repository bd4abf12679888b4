//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with core shared state

use chrono::FixedOffset;

use crate::database::Database;

/// Shared context for all command handlers
///
/// Contains the services the command surface needs:
/// - Database for the owner's reminder rows
/// - The fixed timezone all displayed times are interpreted in
#[derive(Clone)]
pub struct CommandContext {
    pub database: Database,
    pub timezone: FixedOffset,
}

impl CommandContext {
    pub fn new(database: Database, timezone: FixedOffset) -> Self {
        Self { database, timezone }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_context_clone() {
        // CommandContext should be Clone for sharing across handlers
        fn assert_clone<T: Clone>() {}
        assert_clone::<CommandContext>();
    }
}
