//! Product entity - A drink listed in the catalog file.
//!
//! Products are loaded once at startup and never change while the process runs.
//! The `name` is the key orders and sales counters refer to. The price is kept exactly as
//! it appears in the file and only parsed when an order is priced, so a malformed price
//! rejects that product's orders instead of the whole catalog.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog entry as stored in `products.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique display name
    pub name: String,
    /// Unit price, as written in the catalog file
    pub price: RawPrice,
    /// Flavor shown in the catalog listing
    #[serde(default)]
    pub flavor: String,
    /// Free-form description
    #[serde(default, rename = "desc")]
    pub description: String,
    /// Image path or URL
    #[serde(default, rename = "image")]
    pub image_ref: String,
}

/// A price as found in the catalog: either a JSON number or a string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    /// `"price": 3.5`
    Number(serde_json::Number),
    /// `"price": "3.50"`
    Text(String),
}

impl RawPrice {
    /// Parses the price into a non-negative decimal.
    ///
    /// Returns `None` for non-numeric text, negative values and numbers that do not fit
    /// a `Decimal`.
    #[must_use]
    pub fn parse(&self) -> Option<Decimal> {
        let text = match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.trim().to_string(),
        };
        let value = Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()?;
        (!value.is_sign_negative() || value.is_zero()).then_some(value.normalize())
    }
}

impl std::fmt::Display for RawPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}
