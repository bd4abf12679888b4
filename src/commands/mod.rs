//! # Command System
//!
//! Slash command (/) surface of the reminder bot: listing reminders,
//! deleting by display index, and help. Reminder creation itself goes
//! through the free-text message path, not a slash command.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Modular handler infrastructure (handler trait, context, registry)
//! - 1.0.0: Initial slash command definitions

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;

use anyhow::Result;
use log::{info, warn};
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::{Command, CommandOptionType};
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::id::GuildId;
use serenity::prelude::Context;
use std::sync::Arc;

// Re-export handler infrastructure
pub use context::CommandContext;
pub use handler::SlashCommandHandler;
pub use registry::CommandRegistry;

/// Creates all slash command definitions
pub fn create_slash_commands() -> Vec<CreateApplicationCommand> {
    let mut reminders = CreateApplicationCommand::default();
    reminders
        .name("reminders")
        .description("List your scheduled reminders, ordered by fire time");

    let mut delete = CreateApplicationCommand::default();
    delete
        .name("delete")
        .description("Delete one of your reminders")
        .create_option(|option| {
            option
                .name("index")
                .description("The reminder's number as shown by /reminders")
                .kind(CommandOptionType::Integer)
                .required(true)
                .min_int_value(1)
        });

    let mut help = CreateApplicationCommand::default();
    help.name("help")
        .description("How to talk to the reminder bot");

    vec![reminders, delete, help]
}

/// Registers all slash commands globally
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully ({count} commands)");
    Ok(())
}

/// Registers all slash commands for a specific guild (faster for testing)
pub async fn register_guild_commands(ctx: &Context, guild_id: GuildId) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    guild_id
        .set_application_commands(&ctx.http, |commands| {
            for command in slash_commands {
                commands.add_application_command(command);
            }
            commands
        })
        .await?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(())
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Utility function to get integer option from slash command
pub fn get_integer_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_i64())
}

/// Routes incoming slash commands to their registered handlers.
#[derive(Clone)]
pub struct CommandDispatcher {
    registry: CommandRegistry,
    ctx: Arc<CommandContext>,
}

impl CommandDispatcher {
    /// Build a dispatcher with every handler registered.
    pub fn new(ctx: CommandContext) -> Self {
        let mut registry = CommandRegistry::new();
        for handler in handlers::create_all_handlers() {
            registry.register(handler);
        }
        Self {
            registry,
            ctx: Arc::new(ctx),
        }
    }

    /// Dispatch one slash command. Unknown names get a reply rather than
    /// silence so a stale registration is visible to the user.
    pub async fn dispatch(
        &self,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let name = command.data.name.as_str();
        match self.registry.get(name) {
            Some(handler) => handler.handle(self.ctx.clone(), serenity_ctx, command).await,
            None => {
                warn!("Received unregistered command: {name}");
                command
                    .create_interaction_response(&serenity_ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|msg| {
                                msg.content("Unknown command. Try /help.")
                            })
                    })
                    .await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_command_set() {
        // The command surface is list, delete-by-index, and help.
        assert_eq!(create_slash_commands().len(), 3);
    }
}
