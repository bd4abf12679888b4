//! # Feature: Pending Draft Store
//!
//! Ephemeral, time-bounded store for drafts awaiting user confirmation.
//! Uses DashMap for thread-safe concurrent access; each draft gets its own
//! generated id, so concurrent confirmations from the same user never
//! interfere. Entries expire after a TTL to bound growth, and the whole
//! store is lost on restart - a stale id simply resolves to nothing.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use chrono::NaiveDateTime;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A draft parked here between extraction and the user's verdict.
#[derive(Debug, Clone)]
pub struct PendingDraft {
    pub owner_id: String,
    pub task_text: String,
    /// The combined absolute fire time presented for approval.
    pub fire_at: NaiveDateTime,
    created: Instant,
}

/// Draft-id keyed store with expiry.
pub struct PendingDrafts {
    entries: DashMap<String, PendingDraft>,
    ttl: Duration,
}

impl PendingDrafts {
    pub fn new(ttl: Duration) -> Self {
        PendingDrafts {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Park a draft and return its generated id.
    pub fn insert(&self, owner_id: &str, task_text: &str, fire_at: NaiveDateTime) -> String {
        self.purge_expired();
        let draft_id = Uuid::new_v4().to_string();
        self.entries.insert(
            draft_id.clone(),
            PendingDraft {
                owner_id: owner_id.to_string(),
                task_text: task_text.to_string(),
                fire_at,
                created: Instant::now(),
            },
        );
        draft_id
    }

    /// Remove and return the draft for `draft_id`, but only if it belongs to
    /// `owner_id` and has not expired. Expired or unknown ids yield `None`.
    pub fn take(&self, draft_id: &str, owner_id: &str) -> Option<PendingDraft> {
        self.purge_expired();
        let current_owner = self.entries.get(draft_id)?.owner_id.clone();
        if current_owner != owner_id {
            return None;
        }
        self.entries.remove(draft_id).map(|(_, draft)| draft)
    }

    /// Discard a draft without consuming it. Returns whether it existed.
    pub fn discard(&self, draft_id: &str, owner_id: &str) -> bool {
        self.take(draft_id, owner_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn purge_expired(&self) {
        self.entries
            .retain(|_, draft| draft.created.elapsed() < self.ttl);
    }
}
