//! Environment-driven configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with Config::from_env

use anyhow::{anyhow, Context as _, Result};
use chrono::FixedOffset;
use std::time::Duration;

/// Runtime configuration, loaded once at startup from environment variables
/// (a `.env` file is honored via dotenvy in the binary).
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token (required)
    pub discord_token: String,
    /// Optional guild ID for guild-scoped command registration (faster
    /// propagation during development)
    pub discord_guild_id: Option<String>,
    /// Path to the SQLite reminders database
    pub database_path: String,
    /// Default log filter for env_logger
    pub log_level: String,
    /// Fixed timezone all reminder times are interpreted in
    pub timezone: FixedOffset,
    /// Period of the due-reminder sweep
    pub sweep_interval: Duration,
    /// How long an unconfirmed draft is kept before it expires
    pub pending_draft_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only `DISCORD_TOKEN` is required; everything else has a default:
    /// `DATABASE_PATH` (reminders.db), `LOG_LEVEL` (info),
    /// `TIMEZONE_OFFSET` (+00:00), `SWEEP_INTERVAL_SECS` (30),
    /// `PENDING_DRAFT_TTL_SECS` (21600, six hours).
    pub fn from_env() -> Result<Self> {
        let discord_token = std::env::var("DISCORD_TOKEN")
            .context("DISCORD_TOKEN environment variable is required")?;

        let timezone_offset =
            std::env::var("TIMEZONE_OFFSET").unwrap_or_else(|_| "+00:00".to_string());

        Ok(Config {
            discord_token,
            discord_guild_id: std::env::var("DISCORD_GUILD_ID").ok(),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "reminders.db".to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            timezone: parse_timezone_offset(&timezone_offset)?,
            sweep_interval: Duration::from_secs(env_u64("SWEEP_INTERVAL_SECS", 30)?),
            pending_draft_ttl: Duration::from_secs(env_u64("PENDING_DRAFT_TTL_SECS", 21_600)?),
        })
    }
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow!("{name} must be a positive integer, got {raw:?}")),
        Err(_) => Ok(default),
    }
}

/// Parse a timezone offset string like `+03:30` or `-05:00` into a
/// `FixedOffset`.
pub fn parse_timezone_offset(raw: &str) -> Result<FixedOffset> {
    let raw = raw.trim();
    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => (1, raw),
    };

    let (hours_str, minutes_str) = rest
        .split_once(':')
        .ok_or_else(|| anyhow!("TIMEZONE_OFFSET must look like +03:30, got {raw:?}"))?;
    let hours: i32 = hours_str
        .parse()
        .map_err(|_| anyhow!("Invalid hours in TIMEZONE_OFFSET {raw:?}"))?;
    let minutes: i32 = minutes_str
        .parse()
        .map_err(|_| anyhow!("Invalid minutes in TIMEZONE_OFFSET {raw:?}"))?;
    if hours > 23 || minutes > 59 {
        return Err(anyhow!("TIMEZONE_OFFSET out of range: {raw:?}"));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| anyhow!("TIMEZONE_OFFSET out of range: {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_offset() {
        let tz = parse_timezone_offset("+03:30").unwrap();
        assert_eq!(tz.local_minus_utc(), 3 * 3600 + 30 * 60);
    }

    #[test]
    fn test_parse_negative_offset() {
        let tz = parse_timezone_offset("-05:00").unwrap();
        assert_eq!(tz.local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_parse_utc() {
        let tz = parse_timezone_offset("+00:00").unwrap();
        assert_eq!(tz.local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_without_sign() {
        let tz = parse_timezone_offset("04:00").unwrap();
        assert_eq!(tz.local_minus_utc(), 4 * 3600);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timezone_offset("tehran").is_err());
        assert!(parse_timezone_offset("+25:00").is_err());
        assert!(parse_timezone_offset("+03:99").is_err());
        assert!(parse_timezone_offset("").is_err());
    }
}
