use anyhow::Result;
use chrono::Utc;
use dotenvy::dotenv;
use log::{debug, error, info};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::application::interaction::Interaction;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::{GuildId, UserId};
use serenity::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use chime::commands::{
    register_global_commands, register_guild_commands, CommandContext, CommandDispatcher,
};
use chime::core::response::format_fire_time;
use chime::core::Config;
use chime::database::Database;
use chime::features::confirmation::SubmitOutcome;
use chime::message_components::{create_confirmation_buttons, MessageComponentHandler};
use chime::{
    ConfirmationWorkflow, Extractor, Notifier, PendingDrafts, RateLimiter, ReminderScheduler,
};

// Applies to the free-text extraction path only.
const RATE_LIMIT_MAX_REQUESTS: usize = 6;
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

const UNRESOLVED_REPLY: &str = "\
🤔 I couldn't work out when to remind you. Tell me the time (and optionally \
the date), for example:
> remind me tomorrow at 3pm call mother
> remind me to pay rent 1 July 2026 at 9am";

/// Delivers due reminders over a DM to their owner.
struct DiscordNotifier {
    http: Arc<Http>,
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, owner_id: &str, text: &str) -> Result<()> {
        let user_id: u64 = owner_id
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid owner id: {owner_id}"))?;
        let channel = UserId(user_id).create_dm_channel(&self.http).await?;
        channel.say(&self.http, format!("🔔 Reminder: {text}")).await?;
        Ok(())
    }
}

struct Handler {
    dispatcher: Arc<CommandDispatcher>,
    component_handler: Arc<MessageComponentHandler>,
    workflow: ConfirmationWorkflow,
    extractor: Extractor,
    rate_limiter: RateLimiter,
    timezone: chrono::FixedOffset,
    guild_id: Option<GuildId>,
}

impl Handler {
    /// Handle one free-text message: extract a draft and either park it
    /// behind confirm/reject buttons or ask the user to rephrase.
    async fn handle_reminder_message(&self, ctx: &Context, msg: &Message) -> Result<()> {
        let user_id = msg.author.id.to_string();

        if !self.rate_limiter.check_rate_limit(&user_id) {
            msg.channel_id
                .say(&ctx.http, "⏳ Slow down a little, then try again.")
                .await?;
            return Ok(());
        }

        let content = strip_bot_mention(&msg.content, ctx.cache.current_user_id().0);
        let now = Utc::now().with_timezone(&self.timezone).naive_local();
        let draft = self.extractor.extract(&content, now);
        debug!("Extracted draft for user {user_id}: {draft:?}");

        match self.workflow.submit(&user_id, &draft) {
            SubmitOutcome::AwaitingConfirmation { draft_id, task_text, fire_at } => {
                msg.channel_id
                    .send_message(&ctx.http, |message| {
                        message
                            .content(format!(
                                "Should I set this reminder?\n\n📝 {task_text}\n⏰ {}",
                                format_fire_time(fire_at)
                            ))
                            .set_components(create_confirmation_buttons(&draft_id))
                    })
                    .await?;
            }
            SubmitOutcome::Unresolved => {
                msg.channel_id.say(&ctx.http, UNRESOLVED_REPLY).await?;
            }
        }
        Ok(())
    }
}

/// Remove the bot's own mention tokens so they never land in the task text.
fn strip_bot_mention(content: &str, bot_id: u64) -> String {
    content
        .replace(&format!("<@{bot_id}>"), "")
        .replace(&format!("<@!{bot_id}>"), "")
        .trim()
        .to_string()
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        // Only DMs and explicit mentions reach the extractor; the bot stays
        // quiet in ordinary channel chatter.
        let is_dm = msg.guild_id.is_none();
        let mentioned = msg.mentions_me(&ctx).await.unwrap_or(false);
        if !is_dm && !mentioned {
            return;
        }

        if let Err(e) = self.handle_reminder_message(&ctx, &msg).await {
            error!("Error handling message: {e}");
            if let Err(why) = msg
                .channel_id
                .say(
                    &ctx.http,
                    "Sorry, I encountered an error processing your message.",
                )
                .await
            {
                error!("Failed to send error message: {why}");
            }
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        // Register slash commands - guild commands for development (instant), global for production
        if let Some(guild_id) = self.guild_id {
            info!("🔧 Development mode: Registering commands for guild {guild_id}");
            if let Err(e) = register_guild_commands(&ctx, guild_id).await {
                error!("❌ Failed to register guild slash commands: {e}");
            }
        } else {
            info!("🌍 Production mode: Registering commands globally");
            if let Err(e) = register_global_commands(&ctx).await {
                error!("❌ Failed to register global slash commands: {e}");
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = self.dispatcher.dispatch(&ctx, &command).await {
                    error!("Error handling slash command '{}': {e}", command.data.name);
                }
            }
            Interaction::MessageComponent(component) => {
                if let Err(e) = self
                    .component_handler
                    .handle_component_interaction(&ctx, &component)
                    .await
                {
                    error!(
                        "Error handling component interaction '{}': {e}",
                        component.data.custom_id
                    );
                }
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Chime reminder bot...");

    let database = Database::new(&config.database_path).await?;
    let pending = Arc::new(PendingDrafts::new(config.pending_draft_ttl));
    let workflow = ConfirmationWorkflow::new(database.clone(), pending);

    let dispatcher = CommandDispatcher::new(CommandContext::new(
        database.clone(),
        config.timezone,
    ));
    let component_handler = MessageComponentHandler::new(workflow.clone());

    // Parse guild ID if provided for development mode
    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let handler = Handler {
        dispatcher: Arc::new(dispatcher),
        component_handler: Arc::new(component_handler),
        workflow,
        extractor: Extractor::new()?,
        rate_limiter: RateLimiter::new(RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW),
        timezone: config.timezone,
        guild_id,
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    // Start the reminder sweep alongside the gateway connection
    let scheduler = ReminderScheduler::new(database, config.timezone, config.sweep_interval);
    let notifier = DiscordNotifier {
        http: client.cache_and_http.http.clone(),
    };
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run(&notifier, shutdown_rx).await;
    });

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        let _ = shutdown_tx.send(true);
        let _ = scheduler_handle.await;
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    let _ = shutdown_tx.send(true);
    let _ = scheduler_handle.await;
    Ok(())
}
