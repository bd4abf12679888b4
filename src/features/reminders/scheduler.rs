//! # Feature: Due-Reminder Scheduler
//!
//! Background sweep that fires reminders whose time has arrived. Every tick
//! it reads the due rows, dispatches each through the [`Notifier`] seam,
//! then deletes `once` rows and advances the rest via the recurrence
//! calculator. One reminder failing to deliver never blocks the others;
//! delivery is not retried within the sweep, so a failed dispatch still
//! advances (or retires) the row.
//!
//! The loop is cancellable through a watch channel, and [`ReminderScheduler::sweep`]
//! is callable on its own so tests can single-step sweeps deterministically.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.1.0: Cancellation via watch channel, standalone sweep for tests
//! - 1.0.0: Initial 30-second polling loop

use anyhow::Result;
use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDateTime, Utc};
use log::{debug, error, info};
use std::time::Duration;
use tokio::sync::watch;

use crate::database::Database;
use crate::features::recurrence::{next_occurrence, Frequency};

/// Dispatch seam between the scheduler and the chat transport.
///
/// Failures are tolerated: the sweep logs them and moves on. At-least-once
/// delivery is explicitly not guaranteed.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, owner_id: &str, text: &str) -> Result<()>;
}

/// Periodic due-reminder sweep.
pub struct ReminderScheduler {
    database: Database,
    timezone: FixedOffset,
    interval: Duration,
}

impl ReminderScheduler {
    pub fn new(database: Database, timezone: FixedOffset, interval: Duration) -> Self {
        ReminderScheduler {
            database,
            timezone,
            interval,
        }
    }

    /// Run the sweep loop until `shutdown` changes.
    ///
    /// The tick period is fixed; a slow sweep delays the next tick rather
    /// than bunching ticks up.
    pub async fn run(&self, notifier: &dyn Notifier, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(
            "Reminder scheduler running (every {} seconds)",
            self.interval.as_secs()
        );
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Utc::now().with_timezone(&self.timezone).naive_local();
                    if let Err(e) = self.sweep(now, notifier).await {
                        error!("Reminder sweep failed: {e:#}");
                    }
                }
                _ = shutdown.changed() => {
                    info!("Reminder scheduler stopping");
                    break;
                }
            }
        }
    }

    /// One sweep: dispatch everything due at `now`, then retire or
    /// reschedule each row. A failure on one reminder is logged and the
    /// rest of the batch is still processed.
    pub async fn sweep(&self, now: NaiveDateTime, notifier: &dyn Notifier) -> Result<()> {
        let due = self.database.due_reminders(now).await?;
        if due.is_empty() {
            return Ok(());
        }
        debug!("Sweep at {now}: {} reminder(s) due", due.len());

        for reminder in due {
            if let Err(e) = notifier.notify(&reminder.owner_id, &reminder.text).await {
                error!(
                    "Failed to deliver reminder {} to user {}: {e:#}",
                    reminder.id, reminder.owner_id
                );
            }

            let outcome = if reminder.frequency == Frequency::Once {
                self.database
                    .delete_reminder(reminder.id, &reminder.owner_id)
                    .await
                    .map(|_| ())
            } else {
                let next = next_occurrence(reminder.next_run, reminder.frequency);
                self.database.update_next_run(reminder.id, next).await.map(|_| ())
            };
            if let Err(e) = outcome {
                error!("Failed to advance reminder {}: {e:#}", reminder.id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn temp_db_path() -> String {
        std::env::temp_dir()
            .join(format!("chime-test-{}.db", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned()
    }

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    /// Records every delivery; optionally fails for one owner.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, owner_id: &str, text: &str) -> Result<()> {
            if self.fail_for.as_deref() == Some(owner_id) {
                return Err(anyhow::anyhow!("transport down"));
            }
            self.sent
                .lock()
                .unwrap()
                .push((owner_id.to_string(), text.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_once_reminder_fires_and_is_deleted() {
        let db = Database::new(&temp_db_path()).await.unwrap();
        let at = dt(2026, 6, 5, 15, 0);
        db.add_reminder("alice", "call mother", at).await.unwrap();

        let scheduler = ReminderScheduler::new(db.clone(), utc(), Duration::from_secs(30));
        let notifier = RecordingNotifier::default();
        scheduler.sweep(at, &notifier).await.unwrap();

        assert_eq!(
            *notifier.sent.lock().unwrap(),
            vec![("alice".to_string(), "call mother".to_string())]
        );
        assert!(db.list_for_owner("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_yet_due_rows_are_untouched() {
        let db = Database::new(&temp_db_path()).await.unwrap();
        db.add_reminder("alice", "later", dt(2026, 6, 5, 16, 0)).await.unwrap();

        let scheduler = ReminderScheduler::new(db.clone(), utc(), Duration::from_secs(30));
        let notifier = RecordingNotifier::default();
        scheduler.sweep(dt(2026, 6, 5, 15, 0), &notifier).await.unwrap();

        assert!(notifier.sent.lock().unwrap().is_empty());
        assert_eq!(db.list_for_owner("alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_recurring_reminder_is_rescheduled() {
        let db = Database::new(&temp_db_path()).await.unwrap();
        let at = dt(2026, 6, 5, 15, 0);
        let id = db.add_reminder("alice", "stretch", at).await.unwrap();
        db.update_frequency(id, Frequency::Daily).await.unwrap();

        let scheduler = ReminderScheduler::new(db.clone(), utc(), Duration::from_secs(30));
        let notifier = RecordingNotifier::default();
        scheduler.sweep(at, &notifier).await.unwrap();

        let rows = db.list_for_owner("alice").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].next_run, dt(2026, 6, 6, 15, 0));
        // The original request time is never touched.
        assert_eq!(rows[0].scheduled_time, at);
    }

    #[tokio::test]
    async fn test_dispatch_failure_does_not_abort_the_sweep() {
        let db = Database::new(&temp_db_path()).await.unwrap();
        let at = dt(2026, 6, 5, 15, 0);
        db.add_reminder("alice", "first", at).await.unwrap();
        db.add_reminder("bob", "second", at).await.unwrap();

        let scheduler = ReminderScheduler::new(db.clone(), utc(), Duration::from_secs(30));
        let notifier = RecordingNotifier {
            fail_for: Some("alice".to_string()),
            ..Default::default()
        };
        scheduler.sweep(at, &notifier).await.unwrap();

        // Bob still got his reminder, and the failed one is retired all the
        // same (no synchronous retry).
        assert_eq!(
            *notifier.sent.lock().unwrap(),
            vec![("bob".to_string(), "second".to_string())]
        );
        assert!(db.list_for_owner("alice").await.unwrap().is_empty());
        assert!(db.list_for_owner("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let db = Database::new(&temp_db_path()).await.unwrap();
        let scheduler = ReminderScheduler::new(db, utc(), Duration::from_millis(10));
        let notifier = RecordingNotifier::default();
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            scheduler.run(&notifier, rx).await;
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("scheduler should stop promptly")
            .unwrap();
    }
}
