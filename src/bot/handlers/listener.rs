//! Message listener - orders placed by sending `!order ...` as a plain message.
//!
//! Runs inside the bot's gateway event loop, concurrently with slash commands, and goes
//! through the same [`Shop::checkout`](crate::core::checkout::Shop::checkout) path.

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info};

use crate::{
    bot::{BotData, replies},
    core::{
        checkout::CheckoutRequest,
        command::{ParseError, parse_order_command},
    },
    errors::{Error, Result},
};

/// Framework event hook; only new messages are of interest.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    if let serenity::FullEvent::Message { new_message } = event {
        if !new_message.author.bot {
            handle_message(ctx, new_message, data).await?;
        }
    }
    Ok(())
}

async fn handle_message(ctx: &serenity::Context, message: &serenity::Message, data: &BotData) -> Result<()> {
    let command = match parse_order_command(&message.content) {
        Ok(command) => command,
        Err(ParseError::NotAnOrder) => return Ok(()),
        Err(e) => {
            debug!("Rejected order command from {}: {}", message.author.name, e);
            message.reply(ctx, format!("❌ {e}")).await?;
            return Ok(());
        }
    };

    info!(
        "Order command from {}: {}x {}",
        message.author.name, command.quantity, command.product_name
    );
    let request = CheckoutRequest {
        product_name: command.product_name,
        quantity: command.quantity,
        customer_name: message.author.name.clone(),
        contact: command.contact,
        promo_code: None,
    };

    let shop = &data.shop;
    let reply = match shop.checkout(request).await {
        Ok(outcome) => replies::order_confirmation(&outcome, &shop.settings().currency),
        Err(e) => replies::rejection(&e).unwrap_or_else(|| {
            error!("Order command from {} failed: {}", message.author.name, e);
            "❌ Your order could not be recorded, please try again.".to_string()
        }),
    };
    message.reply(ctx, reply).await?;
    Ok(())
}
