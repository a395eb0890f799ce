//! Admin Discord commands - order listing, reset, CSV export and promo codes.
//!
//! Every subcommand takes the shared admin password and answers ephemerally, so neither
//! the password prompt nor the order data is visible to other members.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::pricing::round_money,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use rust_decimal::Decimal;
    use tracing::{info, warn};

    /// Discord's message length limit, with room for the code fence.
    const MAX_LISTING_CHARS: usize = 1900;

    async fn reply_private(ctx: poise::Context<'_, BotData, Error>, text: String) -> Result<()> {
        ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Checks the password; replies and returns `false` when it is wrong.
    async fn authorize(ctx: poise::Context<'_, BotData, Error>, password: &str) -> Result<bool> {
        match ctx.data().admin.verify(password) {
            Ok(()) => Ok(true),
            Err(Error::Unauthorized) => {
                warn!(
                    "Rejected admin command `{}` from {}",
                    ctx.command().name,
                    ctx.author().name
                );
                reply_private(ctx, "⛔ Access denied.".to_string()).await?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn truncate_listing(mut listing: String) -> String {
        if listing.len() > MAX_LISTING_CHARS {
            let mut cut = MAX_LISTING_CHARS;
            while !listing.is_char_boundary(cut) {
                cut -= 1;
            }
            listing.truncate(cut);
            listing.push_str("\n… (use /admin export for the full list)");
        }
        listing
    }

    /// Parent command for shop administration.
    #[poise::command(
        slash_command,
        subcommands(
            "admin_orders",
            "admin_sales",
            "admin_export",
            "admin_reset",
            "admin_promos",
            "admin_promo_new"
        ),
        subcommand_required
    )]
    pub async fn admin(_ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        Ok(())
    }

    /// Lists every order, oldest first.
    #[poise::command(slash_command, rename = "orders")]
    pub async fn admin_orders(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Admin password"] password: String,
    ) -> Result<()> {
        if !authorize(ctx, &password).await? {
            return Ok(());
        }
        let shop = &ctx.data().shop;
        let orders = shop.orders().list_all().await?;

        if orders.is_empty() {
            return reply_private(ctx, "No orders recorded.".to_string()).await;
        }

        let currency = &shop.settings().currency;
        let lines: Vec<String> = orders
            .iter()
            .map(|o| {
                format!(
                    "{} | {} | {}x {} | {:.2}{currency}{} | {}",
                    o.timestamp.format("%Y-%m-%d %H:%M"),
                    o.customer_name,
                    o.quantity,
                    o.product_name,
                    o.net_total,
                    o.promo_code
                        .as_deref()
                        .map(|c| format!(" [{c}]"))
                        .unwrap_or_default(),
                    o.contact
                )
            })
            .collect();

        let listing = truncate_listing(lines.join("\n"));
        reply_private(ctx, format!("**{} orders**\n```\n{listing}\n```", orders.len())).await
    }

    /// Units sold per product.
    #[poise::command(slash_command, rename = "sales")]
    pub async fn admin_sales(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Admin password"] password: String,
    ) -> Result<()> {
        if !authorize(ctx, &password).await? {
            return Ok(());
        }
        let sales = ctx.data().shop.orders().sales_by_product().await?;

        if sales.is_empty() {
            return reply_private(ctx, "Nothing sold yet.".to_string()).await;
        }

        let lines: Vec<String> = sales
            .iter()
            .map(|(product, units)| format!("• {product}: {units}"))
            .collect();
        reply_private(ctx, format!("**Units sold**\n{}", lines.join("\n"))).await
    }

    /// Downloads all orders as a CSV file.
    #[poise::command(slash_command, rename = "export")]
    pub async fn admin_export(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Admin password"] password: String,
    ) -> Result<()> {
        if !authorize(ctx, &password).await? {
            return Ok(());
        }
        let csv = ctx.data().shop.orders().export_csv().await?;
        let file_name = format!("orders-{}.csv", chrono::Utc::now().format("%Y%m%d-%H%M%S"));

        ctx.send(
            poise::CreateReply::default()
                .content("📄 Order export")
                .attachment(serenity::CreateAttachment::bytes(csv, file_name))
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Deletes every recorded order. Products and promo codes are kept.
    #[poise::command(slash_command, rename = "reset")]
    pub async fn admin_reset(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Admin password"] password: String,
    ) -> Result<()> {
        if !authorize(ctx, &password).await? {
            return Ok(());
        }
        ctx.data().shop.orders().reset().await?;
        info!("Orders reset by {}", ctx.author().name);
        reply_private(ctx, "🗑️ All orders deleted.".to_string()).await
    }

    /// Lists promo codes and whether they were used.
    #[poise::command(slash_command, rename = "promos")]
    pub async fn admin_promos(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Admin password"] password: String,
    ) -> Result<()> {
        if !authorize(ctx, &password).await? {
            return Ok(());
        }
        let shop = &ctx.data().shop;
        let promos = shop.promos().list_all().await?;

        if promos.is_empty() {
            return reply_private(ctx, "No promo codes yet.".to_string()).await;
        }

        let currency = &shop.settings().currency;
        let lines: Vec<String> = promos
            .iter()
            .map(|p| {
                format!(
                    "• `{}` -{:.2}{currency} {}",
                    p.code,
                    p.discount,
                    if p.used { "(used)" } else { "(available)" }
                )
            })
            .collect();
        reply_private(ctx, truncate_listing(lines.join("\n"))).await
    }

    /// Creates a new single-use promo code.
    #[poise::command(slash_command, rename = "promo_new")]
    pub async fn admin_promo_new(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Admin password"] password: String,
        #[description = "Discount amount (defaults to the configured value)"] discount: Option<f64>,
    ) -> Result<()> {
        if !authorize(ctx, &password).await? {
            return Ok(());
        }

        let discount = match discount.map(Decimal::try_from).transpose() {
            Ok(amount) => amount.map(round_money),
            Err(_) => {
                return reply_private(ctx, "❌ Invalid discount: must be a valid number".to_string())
                    .await;
            }
        };

        let shop = &ctx.data().shop;
        match shop.create_promo(discount).await {
            Ok(promo) => {
                let currency = &shop.settings().currency;
                reply_private(
                    ctx,
                    format!("🎟️ New code: `{}` (-{:.2}{currency})", promo.code, promo.discount),
                )
                .await
            }
            Err(Error::InvalidDiscount { amount }) => {
                reply_private(ctx, format!("❌ Discount cannot be negative ({amount}).")).await
            }
            Err(e) => Err(e),
        }
    }
}

pub use inner::*;
