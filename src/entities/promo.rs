//! Promo code entity - A one-shot discount minted by an admin.
//!
//! Codes are stored in `promos.json` as an object keyed by the code string, so the code
//! itself is not part of [`PromoEntry`]. [`PromoCode`] is the flattened form handed to
//! callers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Value stored under each code in the promos file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoEntry {
    /// Amount taken off the gross total, in currency units
    pub discount: Decimal,
    /// Set on first successful redemption, never cleared
    #[serde(default)]
    pub used: bool,
}

/// A promo code together with its state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    /// Uppercase alphanumeric identifier
    pub code: String,
    /// Amount taken off the gross total
    pub discount: Decimal,
    /// Whether the code has already been redeemed
    pub used: bool,
}

impl PromoCode {
    /// Builds the public view of a stored entry.
    #[must_use]
    pub fn from_entry(code: &str, entry: &PromoEntry) -> Self {
        Self {
            code: code.to_string(),
            discount: entry.discount,
            used: entry.used,
        }
    }
}
