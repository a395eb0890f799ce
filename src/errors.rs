//! Unified error type for the shop.
//!
//! Checkout validation failures (`MissingFields`, `UnknownProduct`, `InvalidQuantity`,
//! `InvalidPrice`) are recoverable and leave every ledger untouched. `CatalogUnavailable`
//! and `LedgerCorrupt` are raised at startup and are fatal to the process.

use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

/// Every failure the shop can report.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog file exists but cannot be used.
    #[error("Catalog unavailable at {path:?}: {reason}")]
    CatalogUnavailable {
        /// Location of the catalog file
        path: PathBuf,
        /// Why the catalog was rejected
        reason: String,
    },

    /// Customer name or contact was blank.
    #[error("Customer name and contact are both required")]
    MissingFields,

    /// The requested product is not in the catalog.
    #[error("Unknown product: {name}")]
    UnknownProduct {
        /// Product name as requested
        name: String,
    },

    /// Quantity outside `1..=max`.
    #[error("Invalid quantity {quantity}: must be between 1 and {max}")]
    InvalidQuantity {
        /// Requested quantity
        quantity: u32,
        /// Configured upper bound
        max: u32,
    },

    /// The catalog price of a product does not parse to a non-negative number, or the
    /// order total is too large to record.
    #[error("Invalid price {raw:?} for product {product}")]
    InvalidPrice {
        /// Product whose price is malformed
        product: String,
        /// Raw price as stored in the catalog
        raw: String,
    },

    /// A promo discount must be non-negative and below the storable limit.
    #[error("Invalid discount amount: {amount}")]
    InvalidDiscount {
        /// Rejected discount
        amount: Decimal,
    },

    /// A ledger file exists but could not be parsed.
    #[error("Ledger file {path:?} is unreadable: {reason}")]
    LedgerCorrupt {
        /// Location of the ledger file
        path: PathBuf,
        /// Parse failure or shape mismatch
        reason: String,
    },

    /// A ledger mutation could not be persisted; the mutation did not happen.
    #[error("Failed to write ledger file {path:?}: {source}")]
    LedgerWrite {
        /// Location of the ledger file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Admin secret did not match.
    #[error("Admin access denied")]
    Unauthorized,

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
    },

    /// Required environment variable missing or not unicode.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// I/O error outside of ledger writes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delivery to a notification sink failed.
    #[error("Notification failed: {message}")]
    Notification {
        /// Sink-specific failure description
        message: String,
    },

    /// Serenity/Poise framework error.
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
