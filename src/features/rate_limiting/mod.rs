//! # Rate Limiting Feature
//!
//! Per-user sliding-window limits on natural-language extraction requests.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false

pub mod limiter;

pub use limiter::RateLimiter;
