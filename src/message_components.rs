//! Button components for the confirmation workflow.
//!
//! Two button rows drive the workflow: confirm/reject on a fresh draft
//! (`confirm_<draft-id>` / `reject_<draft-id>`), then the four frequency
//! choices on the saved reminder (`freq_<reminder-id>_<frequency>`).
//! Stale ids of either kind get a "no longer valid" reply and change
//! nothing.

use anyhow::Result;
use log::info;
use serenity::builder::CreateComponents;
use serenity::model::application::component::ButtonStyle;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;

use crate::core::response::format_fire_time;
use crate::features::confirmation::{ConfirmOutcome, ConfirmationWorkflow};
use crate::features::recurrence::Frequency;

const STALE_REPLY: &str = "⌛ This reminder is no longer valid. Just send me a new one.";

/// Handler for all message component interactions
pub struct MessageComponentHandler {
    workflow: ConfirmationWorkflow,
}

impl MessageComponentHandler {
    pub fn new(workflow: ConfirmationWorkflow) -> Self {
        Self { workflow }
    }

    /// Handle all types of component interactions
    pub async fn handle_component_interaction(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let custom_id = &interaction.data.custom_id;
        let user_id = interaction.user.id.to_string();

        info!("Processing component interaction: {custom_id} from user: {user_id}");

        match custom_id.as_str() {
            id if id.starts_with("confirm_") => {
                let draft_id = id.strip_prefix("confirm_").unwrap_or("");
                self.handle_confirm(ctx, interaction, draft_id, &user_id).await?;
            }
            id if id.starts_with("reject_") => {
                let draft_id = id.strip_prefix("reject_").unwrap_or("");
                self.handle_reject(ctx, interaction, draft_id, &user_id).await?;
            }
            id if id.starts_with("freq_") => {
                self.handle_frequency(ctx, interaction, id).await?;
            }
            _ => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message.content("Unknown component interaction.")
                            })
                    })
                    .await?;
            }
        }

        Ok(())
    }

    /// Confirm button: persist the draft and offer the frequency choices.
    async fn handle_confirm(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        draft_id: &str,
        user_id: &str,
    ) -> Result<()> {
        match self.workflow.confirm(draft_id, user_id).await? {
            ConfirmOutcome::Confirmed { reminder_id, fire_at } => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| {
                                message
                                    .content(format!(
                                        "✅ Reminder saved for {}.\nHow often should I repeat it?",
                                        format_fire_time(fire_at)
                                    ))
                                    .set_components(create_frequency_buttons(reminder_id))
                            })
                    })
                    .await?;
            }
            ConfirmOutcome::Stale => {
                update_and_clear(ctx, interaction, STALE_REPLY).await?;
            }
        }
        Ok(())
    }

    /// Reject button: discard the pending draft, nothing persisted.
    async fn handle_reject(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        draft_id: &str,
        user_id: &str,
    ) -> Result<()> {
        let content = if self.workflow.reject(draft_id, user_id) {
            "❌ Reminder discarded. You can send me a new one anytime."
        } else {
            STALE_REPLY
        };
        update_and_clear(ctx, interaction, content).await
    }

    /// Frequency button: refine the persisted reminder in place.
    async fn handle_frequency(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        custom_id: &str,
    ) -> Result<()> {
        let Some((reminder_id, frequency)) = parse_frequency_custom_id(custom_id) else {
            return update_and_clear(ctx, interaction, STALE_REPLY).await;
        };

        let content = if self.workflow.choose_frequency(reminder_id, frequency).await? {
            format!("✅ Reminder set ({}).", frequency.label())
        } else {
            STALE_REPLY.to_string()
        };
        update_and_clear(ctx, interaction, &content).await
    }
}

/// Confirm/reject row shown under a freshly extracted draft.
pub fn create_confirmation_buttons(draft_id: &str) -> CreateComponents {
    let mut components = CreateComponents::default();
    components.create_action_row(|row| {
        row.create_button(|button| {
            button
                .custom_id(format!("confirm_{draft_id}"))
                .label("✅ Set reminder")
                .style(ButtonStyle::Success)
        })
        .create_button(|button| {
            button
                .custom_id(format!("reject_{draft_id}"))
                .label("❌ Discard")
                .style(ButtonStyle::Danger)
        })
    });
    components
}

/// Frequency choice rows shown once a reminder is persisted.
pub fn create_frequency_buttons(reminder_id: i64) -> CreateComponents {
    let mut components = CreateComponents::default();
    components
        .create_action_row(|row| {
            row.create_button(|button| {
                button
                    .custom_id(format!("freq_{reminder_id}_once"))
                    .label("Once")
                    .style(ButtonStyle::Secondary)
            })
            .create_button(|button| {
                button
                    .custom_id(format!("freq_{reminder_id}_daily"))
                    .label("Daily")
                    .style(ButtonStyle::Secondary)
            })
        })
        .create_action_row(|row| {
            row.create_button(|button| {
                button
                    .custom_id(format!("freq_{reminder_id}_weekly"))
                    .label("Weekly")
                    .style(ButtonStyle::Secondary)
            })
            .create_button(|button| {
                button
                    .custom_id(format!("freq_{reminder_id}_monthly"))
                    .label("Monthly")
                    .style(ButtonStyle::Secondary)
            })
        });
    components
}

/// Parse `freq_<reminder-id>_<frequency>`. Malformed ids yield `None`.
fn parse_frequency_custom_id(custom_id: &str) -> Option<(i64, Frequency)> {
    let rest = custom_id.strip_prefix("freq_")?;
    let (id_part, freq_part) = rest.split_once('_')?;
    let reminder_id: i64 = id_part.parse().ok()?;
    // Frequency::parse maps unknown storage values to Daily; button input is
    // stricter and rejects anything that is not one of the four choices.
    match freq_part {
        "once" | "daily" | "weekly" | "monthly" => {
            Some((reminder_id, Frequency::parse(freq_part)))
        }
        _ => None,
    }
}

async fn update_and_clear(
    ctx: &Context,
    interaction: &MessageComponentInteraction,
    content: &str,
) -> Result<()> {
    interaction
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::UpdateMessage)
                .interaction_response_data(|message| {
                    message.content(content).components(|c| c) // Clear components
                })
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frequency_custom_id() {
        assert_eq!(
            parse_frequency_custom_id("freq_42_daily"),
            Some((42, Frequency::Daily))
        );
        assert_eq!(
            parse_frequency_custom_id("freq_7_once"),
            Some((7, Frequency::Once))
        );
        assert_eq!(
            parse_frequency_custom_id("freq_7_monthly"),
            Some((7, Frequency::Monthly))
        );
    }

    #[test]
    fn test_parse_frequency_rejects_malformed_ids() {
        assert!(parse_frequency_custom_id("freq_x_daily").is_none());
        assert!(parse_frequency_custom_id("freq_42_fortnightly").is_none());
        assert!(parse_frequency_custom_id("freq_42").is_none());
        assert!(parse_frequency_custom_id("confirm_42").is_none());
    }
}
