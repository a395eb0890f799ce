//! Ordering Discord commands - `catalog`, `quote` and `order`.
//!
//! These are the interactive storefront: browse, preview a total, place an order.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, replies},
        core::checkout::CheckoutRequest,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::error;

    /// Lists every drink in the catalog with its price.
    #[poise::command(slash_command)]
    pub async fn catalog(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let shop = &ctx.data().shop;
        let products = shop.catalog().list_products();

        if products.is_empty() {
            ctx.say("The catalog is empty right now.").await?;
            return Ok(());
        }

        let currency = &shop.settings().currency;
        let fields = products.iter().map(|p| {
            let value = if p.description.is_empty() {
                "\u{200b}".to_string()
            } else {
                p.description.clone()
            };
            (replies::product_line(p, currency), value, false)
        });

        let embed = serenity::CreateEmbed::default()
            .title("**Our Drinks**")
            .color(0x0000_80FF)
            .fields(fields);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows what an order would cost, without placing it.
    #[poise::command(slash_command)]
    pub async fn quote(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Drink to price"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
        #[description = "Number of units"] quantity: u32,
        #[description = "Promo code (optional)"] promo: Option<String>,
    ) -> Result<()> {
        let shop = &ctx.data().shop;
        let request = CheckoutRequest {
            product_name: product,
            quantity,
            customer_name: ctx.author().name.clone(),
            contact: ctx.author().name.clone(),
            promo_code: promo,
        };

        let reply = match shop.quote(&request).await {
            Ok(quote) => {
                let currency = &shop.settings().currency;
                let mut text = format!(
                    "Total for {}x {}: **{:.2}{currency}**",
                    quote.quantity, quote.product_name, quote.totals.net
                );
                if quote.totals.net != quote.totals.gross {
                    text.push_str(&format!(" (instead of {:.2}{currency})", quote.totals.gross));
                }
                let warning = replies::promo_warning(quote.promo);
                if !warning.is_empty() {
                    text.push('\n');
                    text.push_str(warning);
                }
                text
            }
            Err(e) => match replies::rejection(&e) {
                Some(text) => text,
                None => return Err(e),
            },
        };

        ctx.send(poise::CreateReply::default().content(reply).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Places an order. The admin is notified right away.
    #[poise::command(slash_command)]
    pub async fn order(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Drink to order"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
        #[description = "Number of units"] quantity: u32,
        #[description = "Your name"] name: String,
        #[description = "How we can reach you (Telegram, Insta...)"] contact: String,
        #[description = "Promo code (optional)"] promo: Option<String>,
    ) -> Result<()> {
        let shop = &ctx.data().shop;
        let request = CheckoutRequest {
            product_name: product,
            quantity,
            customer_name: name,
            contact,
            promo_code: promo,
        };

        match shop.checkout(request).await {
            Ok(outcome) => {
                ctx.say(replies::order_confirmation(
                    &outcome,
                    &shop.settings().currency,
                ))
                .await?;
            }
            Err(e) => {
                if let Some(text) = replies::rejection(&e) {
                    ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
                        .await?;
                } else {
                    error!("Checkout failed for {}: {}", ctx.author().name, e);
                    ctx.say("❌ Your order could not be recorded. Please try again later.")
                        .await?;
                }
            }
        }

        Ok(())
    }
}

pub use inner::*;
