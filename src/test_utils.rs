//! Shared test utilities for `ShopBuddy`.
//!
//! This module provides helpers for building a shop on top of a temporary data
//! directory and for observing notifications.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tempfile::TempDir;
use tokio::sync::mpsc;

use crate::{
    core::{
        catalog::Catalog,
        checkout::{CheckoutRequest, Shop, ShopSettings},
        order::{OrderLedger, OrdersShape},
        pricing::Totals,
        promo::PromoLedger,
    },
    entities::Order,
    errors::{Error, Result},
    notify::{NotificationSink, OrderPlaced},
};

/// Catalog used by shop-level tests: two valid products and one with a broken price.
pub const TEST_CATALOG: &str = r#"[
    {"name": "Blue Bull", "price": 3.00, "flavor": "Original", "desc": "The classic", "image": "images/blue.png"},
    {"name": "Green Volt", "price": "2.50", "flavor": "Lime", "desc": "Sour kick", "image": "images/green.png"},
    {"name": "Mystery Can", "price": "ask us", "flavor": "?", "desc": "", "image": ""}
]"#;

/// Sink that forwards every event to a channel.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    sender: mpsc::UnboundedSender<OrderPlaced>,
}

impl RecordingSink {
    /// Creates the sink and the receiving end tests read from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OrderPlaced>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, event: &OrderPlaced) -> Result<()> {
        // The receiver may already be gone at the end of a test.
        let _ = self.sender.send(event.clone());
        Ok(())
    }
}

/// Sink that always fails.
#[derive(Debug, Clone, Copy)]
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    async fn notify(&self, _event: &OrderPlaced) -> Result<()> {
        Err(Error::Notification {
            message: "channel unreachable".to_string(),
        })
    }
}

/// Builds a shop over a fresh temp directory holding [`TEST_CATALOG`].
pub async fn setup_test_shop_with(
    shape: OrdersShape,
    sink: Arc<dyn NotificationSink>,
) -> Result<(TempDir, Shop)> {
    setup_test_shop_from(TEST_CATALOG, shape, sink).await
}

/// Builds a shop over a fresh temp directory holding the given catalog JSON.
pub async fn setup_test_shop_from(
    catalog_json: &str,
    shape: OrdersShape,
    sink: Arc<dyn NotificationSink>,
) -> Result<(TempDir, Shop)> {
    let dir = TempDir::new()?;
    let catalog_path = dir.path().join("products.json");
    std::fs::write(&catalog_path, catalog_json)?;

    let catalog = Catalog::load(&catalog_path).await?;
    let promos = PromoLedger::new(dir.path().join("promos.json"), 8).await?;
    let orders = OrderLedger::new(dir.path().join("orders.json"), shape).await?;
    let shop = Shop::new(catalog, promos, orders, sink, ShopSettings::default());
    Ok((dir, shop))
}

/// Standard setup: list-shaped orders and a recording sink.
/// Returns (dir, shop, notifications).
pub async fn setup_test_shop() -> Result<(TempDir, Shop, mpsc::UnboundedReceiver<OrderPlaced>)> {
    let (sink, events) = RecordingSink::new();
    let (dir, shop) = setup_test_shop_with(OrdersShape::List, Arc::new(sink)).await?;
    Ok((dir, shop, events))
}

/// Checkout request with a fixed customer.
pub fn request(product: &str, quantity: u32, promo_code: Option<&str>) -> CheckoutRequest {
    CheckoutRequest {
        product_name: product.to_string(),
        quantity,
        customer_name: "Test Customer".to_string(),
        contact: "@tester".to_string(),
        promo_code: promo_code.map(str::to_string),
    }
}

/// Undiscounted order stamped with the current time.
pub fn sample_order(product: &str, quantity: u32, unit_price: Decimal) -> Order {
    let totals = Totals::compute(unit_price, quantity)
        .unwrap_or_else(|| panic!("{unit_price} x {quantity} is out of range"));
    Order {
        customer_name: "Test Customer".to_string(),
        contact: "@tester".to_string(),
        product_name: product.to_string(),
        quantity,
        promo_code: None,
        unit_price: totals.unit_price,
        gross_total: totals.gross,
        net_total: totals.net,
        timestamp: Utc::now(),
    }
}
