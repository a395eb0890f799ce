//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggests catalog product names as the user types, so the value sent back matches a
//! catalog entry exactly.

use crate::{bot::BotData, entities::Product, errors::Error};

/// Discord's limit on autocomplete choices.
const MAX_CHOICES: usize = 25;

/// Provides autocomplete suggestions for product names.
///
/// Matching is a case-insensitive substring search; results keep catalog order.
pub async fn autocomplete_product_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching_products(ctx.data().shop.catalog().list_products(), partial)
}

fn matching_products(products: &[Product], partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    products
        .iter()
        .filter(|prod| prod.name.to_lowercase().contains(&partial_lower))
        .map(|prod| prod.name.clone())
        .take(MAX_CHOICES)
        .collect()
}
