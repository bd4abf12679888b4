//! Reminder command handlers
//!
//! Handles: reminders, delete, help
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::get_integer_option;
use crate::commands::handler::SlashCommandHandler;
use crate::core::response::{chunk_for_message, format_fire_time};
use crate::database::Reminder;
use crate::features::recurrence::Frequency;

const HELP_TEXT: &str = "\
**How to set a reminder**
Just tell me in plain words, for example:
> remind me tomorrow at 3pm call mother
> remind me to pay rent 1 July 2026 at 9am
> remind me today at 8 in the evening water the plants

I'll ask you to confirm, then you can make it repeat daily, weekly, or monthly.

**Commands**
/reminders - list your reminders, ordered by fire time
/delete index - delete a reminder by its number in that list
/help - this message";

/// Handler for the reminder command surface
pub struct RemindersHandler;

#[async_trait]
impl SlashCommandHandler for RemindersHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["reminders", "delete", "help"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "reminders" => self.handle_list(&ctx, serenity_ctx, command).await,
            "delete" => self.handle_delete(&ctx, serenity_ctx, command).await,
            "help" => respond(serenity_ctx, command, HELP_TEXT).await,
            _ => Ok(()),
        }
    }
}

impl RemindersHandler {
    /// Handle /reminders - list the caller's reminders by fire time
    async fn handle_list(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let reminders = ctx.database.list_for_owner(&user_id).await?;
        debug!("Listing {} reminder(s) for user {user_id}", reminders.len());

        if reminders.is_empty() {
            return respond(
                serenity_ctx,
                command,
                "📋 You don't have any reminders yet. Just tell me what to remind you about!",
            )
            .await;
        }

        let listing = format_reminder_list(&reminders);
        let chunks = chunk_for_message(&listing);
        let (first, rest) = match chunks.split_first() {
            Some(split) => split,
            None => return Ok(()),
        };

        respond(serenity_ctx, command, first).await?;
        for chunk in rest {
            command
                .create_followup_message(&serenity_ctx.http, |msg| msg.content(chunk))
                .await?;
        }
        Ok(())
    }

    /// Handle /delete - remove a reminder by its 1-based display index
    async fn handle_delete(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let Some(index) = get_integer_option(&command.data.options, "index") else {
            return respond(
                serenity_ctx,
                command,
                "❌ Please give the reminder number. Example: /delete 2",
            )
            .await;
        };

        let reminders = ctx.database.list_for_owner(&user_id).await?;
        let Some(target) = reminder_at_index(&reminders, index) else {
            return respond(serenity_ctx, command, "❌ Invalid reminder number.").await;
        };

        // The row can disappear between the list read and the delete (sweep
        // retiring a once reminder); the conditioned delete reports that.
        if ctx.database.delete_reminder(target.id, &user_id).await? {
            info!("Deleted reminder {} for user {user_id}", target.id);
            respond(
                serenity_ctx,
                command,
                &format!("🗑️ Deleted reminder {index} ({})", target.text),
            )
            .await
        } else {
            respond(serenity_ctx, command, "❌ Invalid reminder number.").await
        }
    }
}

/// Resolve a 1-based display index against the owner's ordered list.
fn reminder_at_index(reminders: &[Reminder], index: i64) -> Option<&Reminder> {
    if index < 1 {
        return None;
    }
    reminders.get(index as usize - 1)
}

fn format_reminder_list(reminders: &[Reminder]) -> String {
    let mut listing = String::from("📅 **Your reminders:**\n\n");
    for (idx, reminder) in reminders.iter().enumerate() {
        listing.push_str(&format!(
            "{}. {} - {}",
            idx + 1,
            reminder.text,
            format_fire_time(reminder.next_run)
        ));
        if reminder.frequency != Frequency::Once {
            listing.push_str(&format!(" ({})", reminder.frequency.label()));
        }
        listing.push('\n');
    }
    listing.push_str("\n*Use /delete <number> to remove one.*");
    listing
}

async fn respond(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: &str,
) -> Result<()> {
    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|msg| msg.content(content))
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use chrono::{NaiveDate, NaiveDateTime};

    fn temp_db_path() -> String {
        std::env::temp_dir()
            .join(format!("chime-test-{}.db", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned()
    }

    fn dt(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_handler_command_names() {
        let handler = RemindersHandler;
        let names = handler.command_names();

        assert!(names.contains(&"reminders"));
        assert!(names.contains(&"delete"));
        assert!(names.contains(&"help"));
        assert_eq!(names.len(), 3);
    }

    #[tokio::test]
    async fn test_index_resolution_follows_next_run_order() {
        let db = Database::new(&temp_db_path()).await.unwrap();
        // Inserted out of order on purpose; display order is by next_run.
        db.add_reminder("alice", "third", dt(3, 9)).await.unwrap();
        db.add_reminder("alice", "first", dt(1, 9)).await.unwrap();
        db.add_reminder("alice", "second", dt(2, 9)).await.unwrap();

        let rows = db.list_for_owner("alice").await.unwrap();
        assert_eq!(reminder_at_index(&rows, 1).unwrap().text, "first");
        assert_eq!(reminder_at_index(&rows, 2).unwrap().text, "second");
        assert_eq!(reminder_at_index(&rows, 3).unwrap().text, "third");
        assert!(reminder_at_index(&rows, 0).is_none());
        assert!(reminder_at_index(&rows, 4).is_none());
        assert!(reminder_at_index(&rows, -1).is_none());
    }

    #[tokio::test]
    async fn test_deleting_middle_index_leaves_neighbors_intact() {
        let db = Database::new(&temp_db_path()).await.unwrap();
        db.add_reminder("alice", "first", dt(1, 9)).await.unwrap();
        db.add_reminder("alice", "second", dt(2, 9)).await.unwrap();
        db.add_reminder("alice", "third", dt(3, 9)).await.unwrap();

        let before = db.list_for_owner("alice").await.unwrap();
        let target = reminder_at_index(&before, 2).unwrap();
        assert!(db.delete_reminder(target.id, "alice").await.unwrap());

        let after = db.list_for_owner("alice").await.unwrap();
        assert_eq!(after.len(), 2);
        // The survivors keep their ids and order.
        assert_eq!(after[0].id, before[0].id);
        assert_eq!(after[0].text, "first");
        assert_eq!(after[1].id, before[2].id);
        assert_eq!(after[1].text, "third");
    }

    #[test]
    fn test_list_formatting_annotates_recurrence() {
        let reminders = vec![
            Reminder {
                id: 1,
                owner_id: "alice".to_string(),
                text: "call mother".to_string(),
                scheduled_time: dt(5, 15),
                frequency: Frequency::Once,
                next_run: dt(5, 15),
            },
            Reminder {
                id: 2,
                owner_id: "alice".to_string(),
                text: "stretch".to_string(),
                scheduled_time: dt(6, 8),
                frequency: Frequency::Daily,
                next_run: dt(6, 8),
            },
        ];

        let listing = format_reminder_list(&reminders);
        assert!(listing.contains("1. call mother - 5 June 2026, at 3:00 pm\n"));
        assert!(listing.contains("2. stretch - 6 June 2026, at 8:00 am (every day)\n"));
        // Once reminders carry no annotation.
        assert!(!listing.contains("(once)"));
    }
}
