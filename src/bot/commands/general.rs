//! General Discord commands - ping and help.
//! These commands don't touch the shop data.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::command::ORDER_PREFIX,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let max = ctx.data().shop.settings().max_quantity;
        let help_text = format!(
            "**ShopBuddy Help**\n\n\
            **Ordering**\n\
            • `/catalog` - Lists the drinks and their prices.\n\
            • `/quote <product> <quantity> [promo]` - Shows the total without ordering.\n\
            • `/order <product> <quantity> <name> <contact> [promo]` - Places an order (1 to {max} units).\n\
            • `{ORDER_PREFIX} [xN] <product> <contact>` - Same, as a plain message.\n\n\
            **Admin** (password required)\n\
            • `/admin orders` - Lists all orders.\n\
            • `/admin sales` - Units sold per product.\n\
            • `/admin export` - Downloads orders as CSV.\n\
            • `/admin reset` - Deletes all orders.\n\
            • `/admin promos` - Lists promo codes.\n\
            • `/admin promo_new [discount]` - Creates a promo code.\n\n\
            **Utility**\n\
            • `/ping` - Checks if the bot is responsive.\n\
            • `/help` - Shows this help message."
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
