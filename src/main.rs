use std::sync::Arc;

use dotenvy::dotenv;
use shop_buddy::{
    bot::{self, BotData},
    config::{self, secrets},
    core::admin::AdminGate,
    errors::Result,
    notify::{DiscordChannelSink, LogSink, NotificationSink},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;

    // 4. Secrets
    let token = secrets::bot_token()
        .inspect_err(|e| error!("{} not found: {}", secrets::BOT_TOKEN_VAR, e))?;
    let admin = AdminGate::new(secrets::admin_password());
    if !admin.is_enabled() {
        warn!(
            "{} is not set, admin commands are disabled",
            secrets::ADMIN_PASSWORD_VAR
        );
    }

    // 5. Notification sink
    let currency = app_config.shop.currency.clone();
    let notifier: Arc<dyn NotificationSink> = match secrets::admin_channel_id()? {
        Some(channel_id) => {
            info!("Order notifications go to channel {}", channel_id);
            Arc::new(DiscordChannelSink::new(&token, channel_id, currency))
        }
        None => {
            warn!(
                "{} is not set, order notifications are only logged",
                secrets::ADMIN_CHANNEL_VAR
            );
            Arc::new(LogSink::new(currency))
        }
    };

    // 6. Open catalog and ledgers; corrupt files abort startup
    let shop = config::open_shop(&app_config, notifier)
        .await
        .inspect(|_| info!("Shop data opened successfully."))
        .inspect_err(|e| error!("Failed to open shop data: {}", e))?;

    // 7. Run the bot
    bot::run_bot(&token, BotData::new(Arc::new(shop), admin)).await
}
