//! Notification sinks - where "order placed" messages go.
//!
//! Delivery is fire-and-forget from checkout's point of view: the order is already on disk
//! when a sink is called, and a failing sink is only logged.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    entities::Order,
    errors::{Error, Result},
};

/// Event emitted after an order has been durably recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlaced {
    /// Who ordered
    pub customer_name: String,
    /// How to reach them
    pub contact: String,
    /// What they ordered
    pub product_name: String,
    /// How many
    pub quantity: u32,
    /// Amount charged
    pub net_total: Decimal,
    /// Promo code applied, if any
    pub promo_code: Option<String>,
    /// When the order was accepted
    pub timestamp: DateTime<Utc>,
}

impl OrderPlaced {
    /// Human-readable message for an admin channel.
    #[must_use]
    pub fn message(&self, currency: &str) -> String {
        let promo = self
            .promo_code
            .as_deref()
            .map(|code| format!(" with code {code}"))
            .unwrap_or_default();
        format!(
            "New order from {} for {}x {} ({:.2}{currency}{promo})\nContact: {}",
            self.customer_name, self.quantity, self.product_name, self.net_total, self.contact
        )
    }
}

impl From<&Order> for OrderPlaced {
    fn from(order: &Order) -> Self {
        Self {
            customer_name: order.customer_name.clone(),
            contact: order.contact.clone(),
            product_name: order.product_name.clone(),
            quantity: order.quantity,
            net_total: order.net_total,
            promo_code: order.promo_code.clone(),
            timestamp: order.timestamp,
        }
    }
}

/// Destination for order notifications.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one event. Errors are logged by the caller and never retried.
    async fn notify(&self, event: &OrderPlaced) -> Result<()>;
}

/// Sink that only writes the event to the log.
#[derive(Debug, Clone)]
pub struct LogSink {
    currency: String,
}

impl LogSink {
    /// Creates a log sink that formats totals with `currency`.
    #[must_use]
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }
}

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify(&self, event: &OrderPlaced) -> Result<()> {
        info!(target: "shop_buddy::orders", "{}", event.message(&self.currency));
        Ok(())
    }
}

/// Sink that posts each event to a Discord channel.
pub struct DiscordChannelSink {
    http: Arc<serenity::Http>,
    channel: serenity::ChannelId,
    currency: String,
}

impl DiscordChannelSink {
    /// Creates a sink posting to `channel_id` with the given bot token.
    #[must_use]
    pub fn new(token: &str, channel_id: u64, currency: impl Into<String>) -> Self {
        Self {
            http: Arc::new(serenity::Http::new(token)),
            channel: serenity::ChannelId::new(channel_id),
            currency: currency.into(),
        }
    }
}

impl std::fmt::Debug for DiscordChannelSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordChannelSink")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NotificationSink for DiscordChannelSink {
    async fn notify(&self, event: &OrderPlaced) -> Result<()> {
        self.channel
            .say(&*self.http, event.message(&self.currency))
            .await
            .map_err(|e| Error::Notification {
                message: format!("posting to channel {} failed: {e}", self.channel),
            })?;
        Ok(())
    }
}
