//! Checkout - pricing an order, applying at most one promo and committing it.
//!
//! [`Shop`] ties the catalog, both ledgers and the notification sink together. Every
//! front end (slash commands, the text listener) goes through [`Shop::checkout`]; nothing
//! else appends orders or redeems codes on a customer's behalf.
//!
//! Side effects happen in a fixed order: the order is appended first, the promo code is
//! redeemed only once the append succeeded, and the notification goes out last. A failed
//! append therefore never consumes a code, and a failed redemption or notification never
//! loses an order.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{error, instrument, warn};

use crate::{
    core::{
        catalog::Catalog,
        order::OrderLedger,
        pricing::Totals,
        promo::{PromoLedger, PromoStatus, Redemption},
    },
    entities::{Order, Product, PromoCode},
    errors::{Error, Result},
    notify::{NotificationSink, OrderPlaced},
};

/// Everything a customer submits when ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Catalog name of the product
    pub product_name: String,
    /// Units requested
    pub quantity: u32,
    /// Customer's name
    pub customer_name: String,
    /// Customer's contact handle
    pub contact: String,
    /// Optional promo code; blank means none
    pub promo_code: Option<String>,
}

/// Priced order that has not been committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Product being priced
    pub product_name: String,
    /// Units
    pub quantity: u32,
    /// Unit, gross and net amounts
    pub totals: Totals,
    /// What the promo lookup said
    pub promo: PromoStatus,
    /// The trimmed code, present only when it applies
    pub promo_code: Option<String>,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    /// The recorded order
    pub order: Order,
    /// Set when a code was supplied but could not be applied (unknown or already used)
    pub promo_rejection: Option<PromoStatus>,
}

/// Shop-wide settings that checkout depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopSettings {
    /// Largest quantity accepted in one order
    pub max_quantity: u32,
    /// Discount used when an admin mints a code without choosing one
    pub default_promo_discount: Decimal,
    /// Currency symbol for messages
    pub currency: String,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            max_quantity: 11,
            default_promo_discount: Decimal::ONE,
            currency: "€".to_string(),
        }
    }
}

/// The storefront: catalog, ledgers and notification sink.
pub struct Shop {
    catalog: Catalog,
    promos: PromoLedger,
    orders: OrderLedger,
    notifier: Arc<dyn NotificationSink>,
    settings: ShopSettings,
    checkout_lock: Mutex<()>,
}

impl Shop {
    /// Assembles a shop from its parts.
    #[must_use]
    pub fn new(
        catalog: Catalog,
        promos: PromoLedger,
        orders: OrderLedger,
        notifier: Arc<dyn NotificationSink>,
        settings: ShopSettings,
    ) -> Self {
        Self {
            catalog,
            promos,
            orders,
            notifier,
            settings,
            checkout_lock: Mutex::new(()),
        }
    }

    /// Product catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Promo code ledger.
    #[must_use]
    pub const fn promos(&self) -> &PromoLedger {
        &self.promos
    }

    /// Order ledger.
    #[must_use]
    pub const fn orders(&self) -> &OrderLedger {
        &self.orders
    }

    /// Shop settings.
    #[must_use]
    pub const fn settings(&self) -> &ShopSettings {
        &self.settings
    }

    /// Prices a request without recording anything.
    ///
    /// Runs the same validation as [`Shop::checkout`]. An unknown or used promo code is not
    /// an error; the quote simply carries the gross total.
    ///
    /// # Errors
    /// `MissingFields`, `UnknownProduct`, `InvalidQuantity` or `InvalidPrice`, checked in
    /// that order, or a ledger error if the promo file cannot be read.
    pub async fn quote(&self, request: &CheckoutRequest) -> Result<Quote> {
        let (product, totals) = self.price_line(request)?;

        let code = request.promo_code.as_deref().unwrap_or_default().trim();
        let promo = self.promos.validate(code).await?;
        let discount = match promo {
            PromoStatus::Valid { discount } => Some(discount),
            PromoStatus::NotRequested | PromoStatus::Unknown | PromoStatus::AlreadyUsed => None,
        };

        Ok(Quote {
            product_name: product.name.clone(),
            quantity: request.quantity,
            totals: totals.with_discount(discount),
            promo,
            promo_code: discount.map(|_| code.to_string()),
        })
    }

    /// Validates, prices and records an order.
    ///
    /// # Errors
    /// The validation errors of [`Shop::quote`], or [`Error::LedgerWrite`] if the order
    /// could not be persisted. In the latter case no promo code was consumed.
    #[instrument(skip(self, request), fields(product = %request.product_name, quantity = request.quantity))]
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutOutcome> {
        let guard = self.checkout_lock.lock().await;

        let quote = self.quote(&request).await?;
        let order = Order {
            customer_name: request.customer_name.trim().to_string(),
            contact: request.contact.trim().to_string(),
            product_name: quote.product_name,
            quantity: quote.quantity,
            promo_code: quote.promo_code,
            unit_price: quote.totals.unit_price,
            gross_total: quote.totals.gross,
            net_total: quote.totals.net,
            timestamp: Utc::now(),
        };

        self.orders.append(order.clone()).await?;

        if let Some(code) = &order.promo_code {
            match self.promos.redeem(code).await {
                Ok(Redemption::Redeemed { .. }) => {}
                Ok(outcome) => warn!("Promo code {} could not be redeemed: {:?}", code, outcome),
                Err(e) => error!("Order recorded but promo code {} was not marked used: {}", code, e),
            }
        }
        drop(guard);

        let promo_rejection = match quote.promo {
            PromoStatus::Unknown | PromoStatus::AlreadyUsed => {
                warn!("Ignoring promo code: {:?}", quote.promo);
                Some(quote.promo)
            }
            PromoStatus::NotRequested | PromoStatus::Valid { .. } => None,
        };

        self.dispatch_notification(OrderPlaced::from(&order));

        Ok(CheckoutOutcome {
            order,
            promo_rejection,
        })
    }

    /// Mints a promo code, using the configured default discount when none is given.
    ///
    /// # Errors
    /// See [`PromoLedger::create`].
    pub async fn create_promo(&self, discount: Option<Decimal>) -> Result<PromoCode> {
        self.promos
            .create(discount.unwrap_or(self.settings.default_promo_discount))
            .await
    }

    fn price_line(&self, request: &CheckoutRequest) -> Result<(&Product, Totals)> {
        if request.customer_name.trim().is_empty() || request.contact.trim().is_empty() {
            return Err(Error::MissingFields);
        }

        let name = request.product_name.trim();
        let product = self
            .catalog
            .find_by_name(name)
            .ok_or_else(|| Error::UnknownProduct {
                name: name.to_string(),
            })?;

        let max = self.settings.max_quantity;
        if !(1..=max).contains(&request.quantity) {
            return Err(Error::InvalidQuantity {
                quantity: request.quantity,
                max,
            });
        }

        // Unparseable, negative, or too large to total and store
        let totals = product
            .price
            .parse()
            .and_then(|unit_price| Totals::compute(unit_price, request.quantity))
            .ok_or_else(|| Error::InvalidPrice {
                product: product.name.clone(),
                raw: product.price.to_string(),
            })?;

        Ok((product, totals))
    }

    fn dispatch_notification(&self, event: OrderPlaced) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&event).await {
                error!("Failed to deliver order notification: {}", e);
            }
        });
    }
}

impl std::fmt::Debug for Shop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shop")
            .field("catalog", &self.catalog)
            .field("orders", &self.orders)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
