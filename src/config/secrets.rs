//! Secrets loaded from environment variables (usually via `.env`).
//!
//! None of these are stored in config.toml.

use crate::errors::{Error, Result};

/// Bot token variable
pub const BOT_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";
/// Admin password variable
pub const ADMIN_PASSWORD_VAR: &str = "ADMIN_PASSWORD";
/// Notification channel variable
pub const ADMIN_CHANNEL_VAR: &str = "ADMIN_CHANNEL_ID";

/// Reads the Discord bot token.
///
/// # Errors
/// Returns [`Error::EnvVar`] if `DISCORD_BOT_TOKEN` is not set.
pub fn bot_token() -> Result<String> {
    std::env::var(BOT_TOKEN_VAR).map_err(Error::EnvVar)
}

/// Reads the admin password, if any.
#[must_use]
pub fn admin_password() -> Option<String> {
    std::env::var(ADMIN_PASSWORD_VAR).ok()
}

/// Reads the channel that receives order notifications, if any.
///
/// # Errors
/// Returns [`Error::Config`] if the variable is set but is not a channel ID.
pub fn admin_channel_id() -> Result<Option<u64>> {
    std::env::var(ADMIN_CHANNEL_VAR)
        .ok()
        .map(|raw| parse_channel_id(&raw))
        .transpose()
}

fn parse_channel_id(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| Error::Config {
            message: format!("{ADMIN_CHANNEL_VAR} must be a Discord channel ID, got '{raw}'"),
        })
}
