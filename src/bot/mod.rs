//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the shop, including all slash commands,
//! autocomplete handlers, the `!order` message listener and bot context management.

/// Discord command implementations (ordering, admin, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, message listener)
pub mod handlers;
/// Reply text shared across commands and the listener
pub mod replies;

use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{error, info, instrument};

use crate::{
    core::{admin::AdminGate, checkout::Shop},
    errors::{Error, Result},
};

/// Shared data available to all bot commands.
/// This structure holds the shop and the admin gate.
pub struct BotData {
    /// Catalog, ledgers and checkout
    pub shop: Arc<Shop>,
    /// Shared-secret check for `/admin` commands
    pub admin: AdminGate,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(shop: Arc<Shop>, admin: AdminGate) -> Self {
        Self { shop, admin }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Connects to Discord and serves commands until the client stops.
///
/// # Errors
/// Returns the framework error if the client cannot be built or the gateway fails.
#[instrument(skip(token, data))]
pub async fn run_bot(token: &str, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::catalog(),
                commands::quote(),
                commands::order(),
                commands::admin(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::listener::handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    // Message content is needed by the `!order` listener
    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
