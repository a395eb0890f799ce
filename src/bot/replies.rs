//! Reply text shared by slash commands and the message listener.

use crate::{
    core::{checkout::CheckoutOutcome, promo::PromoStatus},
    entities::Product,
    errors::Error,
};

/// Confirmation shown to the customer after a successful checkout.
#[must_use]
pub fn order_confirmation(outcome: &CheckoutOutcome, currency: &str) -> String {
    let order = &outcome.order;
    let mut message = format!(
        "✅ Order sent! {}x {} for **{:.2}{currency}**",
        order.quantity, order.product_name, order.net_total
    );
    if let Some(code) = &order.promo_code {
        message.push_str(&format!(
            " (code {code} saved you {:.2}{currency})",
            order.discount_granted()
        ));
    }
    if let Some(rejection) = outcome.promo_rejection {
        message.push('\n');
        message.push_str(promo_warning(rejection));
    }
    message
}

/// Warning for a promo code that was supplied but not applied.
#[must_use]
pub const fn promo_warning(status: PromoStatus) -> &'static str {
    match status {
        PromoStatus::AlreadyUsed => "⚠️ That promo code has already been used, full price applied.",
        PromoStatus::Unknown => "⚠️ Unknown promo code, full price applied.",
        PromoStatus::NotRequested | PromoStatus::Valid { .. } => "",
    }
}

/// Customer-facing text for a rejected checkout, or `None` for internal failures.
#[must_use]
pub fn rejection(error: &Error) -> Option<String> {
    let text = match error {
        Error::MissingFields => "❌ Please fill in both your name and a contact.".to_string(),
        Error::UnknownProduct { name } => {
            format!("❌ We don't sell '{name}'. Use `/catalog` to see the drinks.")
        }
        Error::InvalidQuantity { max, .. } => {
            format!("❌ Quantity must be between 1 and {max}.")
        }
        Error::InvalidPrice { product, .. } => {
            format!("❌ '{product}' can't be ordered right now (price error).")
        }
        _ => return None,
    };
    Some(text)
}

/// One catalog line: name, flavor and price.
#[must_use]
pub fn product_line(product: &Product, currency: &str) -> String {
    let price = product
        .price
        .parse()
        .map_or_else(|| "price unavailable".to_string(), |p| format!("{p:.2}{currency}"));
    if product.flavor.is_empty() {
        format!("**{}** - {price}", product.name)
    } else {
        format!("**{}** ({}) - {price}", product.name, product.flavor)
    }
}
