//! # Feature: Confirmation Workflow
//!
//! The state machine between extraction and a persisted reminder:
//!
//! `Drafted -> PendingConfirmation -> FrequencySelection -> Scheduled`,
//! with rejection terminal from `PendingConfirmation`.
//!
//! Submitting a resolved draft parks it in the pending store and hands back
//! a draft id for the confirm/reject buttons. Approval persists the reminder
//! with the `once` default, then the frequency is refined in place once the
//! user picks one. Stale ids (expired, restarted process, double click) are
//! reported as such and never create partial records.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use anyhow::Result;
use chrono::NaiveDateTime;
use log::info;
use std::sync::Arc;

use super::pending::PendingDrafts;
use crate::database::Database;
use crate::features::extraction::ReminderDraft;
use crate::features::recurrence::Frequency;

/// Result of submitting an extracted draft.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Draft parked; present the confirm/reject choice to the user.
    AwaitingConfirmation {
        draft_id: String,
        task_text: String,
        fire_at: NaiveDateTime,
    },
    /// Time and/or date could not be resolved; ask the user to rephrase.
    Unresolved,
}

/// Result of a confirmation button press.
#[derive(Debug)]
pub enum ConfirmOutcome {
    /// Reminder persisted; offer the frequency choices for this id.
    Confirmed {
        reminder_id: i64,
        fire_at: NaiveDateTime,
    },
    /// The draft id is unknown or expired. Nothing was persisted.
    Stale,
}

/// Drives drafts through confirmation into storage.
#[derive(Clone)]
pub struct ConfirmationWorkflow {
    database: Database,
    pending: Arc<PendingDrafts>,
}

impl ConfirmationWorkflow {
    pub fn new(database: Database, pending: Arc<PendingDrafts>) -> Self {
        ConfirmationWorkflow { database, pending }
    }

    /// Submit an extracted draft for confirmation.
    ///
    /// Only drafts with both time and date resolved (and a non-empty task)
    /// are eligible; everything else is `Unresolved` with no state created.
    pub fn submit(&self, owner_id: &str, draft: &ReminderDraft) -> SubmitOutcome {
        let Some(fire_at) = draft.fire_at() else {
            return SubmitOutcome::Unresolved;
        };
        if draft.task_text.is_empty() {
            return SubmitOutcome::Unresolved;
        }

        let draft_id = self.pending.insert(owner_id, &draft.task_text, fire_at);
        info!("Parked draft {draft_id} for user {owner_id} (fires {fire_at})");
        SubmitOutcome::AwaitingConfirmation {
            draft_id,
            task_text: draft.task_text.clone(),
            fire_at,
        }
    }

    /// User approved the draft: persist it with the `once` default.
    pub async fn confirm(&self, draft_id: &str, owner_id: &str) -> Result<ConfirmOutcome> {
        let Some(draft) = self.pending.take(draft_id, owner_id) else {
            return Ok(ConfirmOutcome::Stale);
        };

        let reminder_id = self
            .database
            .add_reminder(owner_id, &draft.task_text, draft.fire_at)
            .await?;
        info!("Created reminder {reminder_id} for user {owner_id} (fires {})", draft.fire_at);

        Ok(ConfirmOutcome::Confirmed {
            reminder_id,
            fire_at: draft.fire_at,
        })
    }

    /// User rejected the draft: discard it, nothing persisted.
    /// Returns false when the id was already gone.
    pub fn reject(&self, draft_id: &str, owner_id: &str) -> bool {
        let existed = self.pending.discard(draft_id, owner_id);
        if existed {
            info!("Discarded draft {draft_id} for user {owner_id}");
        }
        existed
    }

    /// User picked a recurrence for an already-persisted reminder.
    /// Returns false when the row no longer exists (deleted in the meantime).
    pub async fn choose_frequency(&self, reminder_id: i64, frequency: Frequency) -> Result<bool> {
        let updated = self.database.update_frequency(reminder_id, frequency).await?;
        if updated {
            info!("Reminder {reminder_id} frequency set to {}", frequency.as_str());
        }
        Ok(updated)
    }
}
