//! Order entity - One accepted checkout.
//!
//! Orders are created once by checkout and never modified afterwards; the only way to
//! remove them is a full ledger reset. Totals are stored already rounded to cents.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An order record as persisted in the orders file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Who placed the order
    pub customer_name: String,
    /// How to reach the customer (Telegram handle, Discord tag, ...)
    pub contact: String,
    /// Catalog name of the ordered product
    pub product_name: String,
    /// Number of units, `1..=max_quantity`
    pub quantity: u32,
    /// Promo code that reduced this order, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    /// Unit price at the time of the order
    pub unit_price: Decimal,
    /// `unit_price * quantity`
    pub gross_total: Decimal,
    /// Amount charged after the promo discount
    pub net_total: Decimal,
    /// When the order was accepted
    pub timestamp: DateTime<Utc>,
}

impl Order {
    /// Discount that was actually granted on this order.
    #[must_use]
    pub fn discount_granted(&self) -> Decimal {
        self.gross_total - self.net_total
    }
}
