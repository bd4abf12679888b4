//! # Database Module
//!
//! SQLite-backed persistence for scheduled reminders. This is the storage
//! contract the rest of the bot programs against: insert on confirmation,
//! owner-scoped listing ordered by next fire time, id-conditioned frequency
//! and next-run updates, and the due-row query the sweep runs.
//!
//! All mutations are single-statement conditioned writes (`WHERE id = ?`),
//! so the sweep task and the interaction path can share the connection
//! without read-modify-write races.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Owner-conditioned deletes, due-row query for the sweep
//! - 1.0.0: Initial schema and insert/list operations

use anyhow::{Context as _, Result};
use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::features::recurrence::Frequency;

/// Storage format for all timestamps.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A persisted reminder row.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: i64,
    pub owner_id: String,
    pub text: String,
    /// The originally requested fire time. Fixed at creation, never mutated.
    pub scheduled_time: NaiveDateTime,
    pub frequency: Frequency,
    /// Next time this reminder must fire. Advanced by the sweep.
    pub next_run: NaiveDateTime,
}

/// Thread-safe handle to the reminders database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<sqlite::ConnectionThreadSafe>,
}

impl Database {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = sqlite::Connection::open_thread_safe(path)
            .with_context(|| format!("Failed to open database at {path}"))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS reminders (
                id INTEGER PRIMARY KEY,
                owner_id TEXT NOT NULL,
                text TEXT NOT NULL,
                scheduled_time TEXT NOT NULL,
                frequency TEXT NOT NULL DEFAULT 'once',
                next_run TEXT NOT NULL
            )",
        )?;
        conn.execute("CREATE INDEX IF NOT EXISTS idx_reminders_next_run ON reminders (next_run)")?;
        conn.execute("CREATE INDEX IF NOT EXISTS idx_reminders_owner ON reminders (owner_id)")?;

        Ok(Database {
            conn: Arc::new(conn),
        })
    }

    /// Insert a new reminder with `frequency = once` and
    /// `next_run = scheduled_time`. Returns the assigned row id.
    pub async fn add_reminder(
        &self,
        owner_id: &str,
        text: &str,
        scheduled_time: NaiveDateTime,
    ) -> Result<i64> {
        let when = scheduled_time.format(DATETIME_FORMAT).to_string();
        let mut stmt = self.conn.prepare(
            "INSERT INTO reminders (owner_id, text, scheduled_time, frequency, next_run)
             VALUES (?, ?, ?, 'once', ?)",
        )?;
        stmt.bind((1, owner_id))?;
        stmt.bind((2, text))?;
        stmt.bind((3, when.as_str()))?;
        stmt.bind((4, when.as_str()))?;
        while let sqlite::State::Row = stmt.next()? {}

        let mut id_stmt = self.conn.prepare("SELECT last_insert_rowid()")?;
        let mut id = 0;
        while let sqlite::State::Row = id_stmt.next()? {
            id = id_stmt.read::<i64, _>(0)?;
        }
        Ok(id)
    }

    /// All reminders for one owner, ordered by next fire time ascending.
    /// This ordering is what 1-based display indexes resolve against.
    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Reminder>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, text, scheduled_time, frequency, next_run
             FROM reminders WHERE owner_id = ? ORDER BY next_run",
        )?;
        stmt.bind((1, owner_id))?;
        read_rows(&mut stmt)
    }

    /// All reminders whose next fire time has arrived (`next_run <= now`).
    pub async fn due_reminders(&self, now: NaiveDateTime) -> Result<Vec<Reminder>> {
        let cutoff = now.format(DATETIME_FORMAT).to_string();
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, text, scheduled_time, frequency, next_run
             FROM reminders WHERE next_run <= ? ORDER BY next_run",
        )?;
        stmt.bind((1, cutoff.as_str()))?;
        read_rows(&mut stmt)
    }

    /// Update the frequency of an existing reminder in place.
    /// Returns false when the row no longer exists.
    pub async fn update_frequency(&self, id: i64, frequency: Frequency) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("UPDATE reminders SET frequency = ? WHERE id = ?")?;
        stmt.bind((1, frequency.as_str()))?;
        stmt.bind((2, id))?;
        while let sqlite::State::Row = stmt.next()? {}
        Ok(self.conn.change_count() > 0)
    }

    /// Advance the next fire time of a recurring reminder.
    /// Returns false when the row no longer exists.
    pub async fn update_next_run(&self, id: i64, next_run: NaiveDateTime) -> Result<bool> {
        let when = next_run.format(DATETIME_FORMAT).to_string();
        let mut stmt = self
            .conn
            .prepare("UPDATE reminders SET next_run = ? WHERE id = ?")?;
        stmt.bind((1, when.as_str()))?;
        stmt.bind((2, id))?;
        while let sqlite::State::Row = stmt.next()? {}
        Ok(self.conn.change_count() > 0)
    }

    /// Delete a reminder, conditioned on both id and owner so one user can
    /// never remove another's rows. Returns false when nothing matched.
    pub async fn delete_reminder(&self, id: i64, owner_id: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("DELETE FROM reminders WHERE id = ? AND owner_id = ?")?;
        stmt.bind((1, id))?;
        stmt.bind((2, owner_id))?;
        while let sqlite::State::Row = stmt.next()? {}
        Ok(self.conn.change_count() > 0)
    }
}

fn read_rows(stmt: &mut sqlite::Statement) -> Result<Vec<Reminder>> {
    let mut rows = Vec::new();
    while let sqlite::State::Row = stmt.next()? {
        rows.push(Reminder {
            id: stmt.read::<i64, _>("id")?,
            owner_id: stmt.read::<String, _>("owner_id")?,
            text: stmt.read::<String, _>("text")?,
            scheduled_time: parse_stored_datetime(&stmt.read::<String, _>("scheduled_time")?)?,
            frequency: Frequency::parse(&stmt.read::<String, _>("frequency")?),
            next_run: parse_stored_datetime(&stmt.read::<String, _>("next_run")?)?,
        });
    }
    Ok(rows)
}

fn parse_stored_datetime(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .with_context(|| format!("Malformed timestamp in storage: {raw:?}"))
}
