//! # Feature: Rate Limiting
//!
//! Prevents extraction spam with a per-user sliding window. Uses DashMap for
//! thread-safe concurrent access from the message path.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false

use dashmap::DashMap;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct RateLimiter {
    requests: DashMap<String, Vec<Instant>>,
    max_requests: usize,
    time_window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        RateLimiter {
            requests: DashMap::new(),
            max_requests,
            time_window,
        }
    }

    /// Record a request for `user_id` if the window allows another one.
    /// Returns false when the user is over the limit.
    pub fn check_rate_limit(&self, user_id: &str) -> bool {
        let now = Instant::now();
        let mut entry = self.requests.entry(user_id.to_string()).or_default();

        entry.retain(|&time| now.duration_since(time) < self.time_window);

        if entry.len() >= self.max_requests {
            false
        } else {
            entry.push(now);
            true
        }
    }
}
