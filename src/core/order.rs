//! Order ledger - The durable history of accepted orders.
//!
//! The ledger is the only writer of the orders file. Two on-disk layouts are supported and
//! chosen by configuration:
//!
//! * [`OrdersShape::List`]: `[order, ...]` in acceptance order.
//! * [`OrdersShape::ByProduct`]: `{"<product>": [order, ...], ...}`.
//!
//! Callers see the same operations for either layout. A file whose layout does not match
//! the configured one is refused at startup rather than silently converted.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    core::store::{Commit, JsonStore},
    entities::Order,
    errors::{Error, Result},
};

/// CSV header written by [`OrderLedger::export_csv`].
pub const CSV_HEADER: &str = "name,product,quantity,contact,total,timestamp";

/// Persisted layout of the orders file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdersShape {
    /// Flat chronological array.
    #[default]
    List,
    /// Object keyed by product name, each value an array of orders.
    ByProduct,
}

/// In-memory form of the orders file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum OrderBook {
    List(Vec<Order>),
    ByProduct(BTreeMap<String, Vec<Order>>),
}

impl OrderBook {
    const fn empty(shape: OrdersShape) -> Self {
        match shape {
            OrdersShape::List => Self::List(Vec::new()),
            OrdersShape::ByProduct => Self::ByProduct(BTreeMap::new()),
        }
    }

    const fn shape(&self) -> OrdersShape {
        match self {
            Self::List(_) => OrdersShape::List,
            Self::ByProduct(_) => OrdersShape::ByProduct,
        }
    }

    fn push(&mut self, order: Order) {
        match self {
            Self::List(orders) => orders.push(order),
            Self::ByProduct(groups) => groups
                .entry(order.product_name.clone())
                .or_default()
                .push(order),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::List(orders) => orders.len(),
            Self::ByProduct(groups) => groups.values().map(Vec::len).sum(),
        }
    }

    fn chronological(self) -> Vec<Order> {
        match self {
            Self::List(orders) => orders,
            Self::ByProduct(groups) => {
                let mut orders: Vec<Order> = groups.into_values().flatten().collect();
                orders.sort_by_key(|o| o.timestamp);
                orders
            }
        }
    }

    fn grouped(self) -> BTreeMap<String, Vec<Order>> {
        match self {
            Self::List(orders) => {
                let mut groups: BTreeMap<String, Vec<Order>> = BTreeMap::new();
                for order in orders {
                    groups
                        .entry(order.product_name.clone())
                        .or_default()
                        .push(order);
                }
                groups
            }
            Self::ByProduct(groups) => groups,
        }
    }
}

/// Durable order history backed by the orders file.
#[derive(Debug)]
pub struct OrderLedger {
    store: JsonStore<OrderBook>,
    shape: OrdersShape,
}

impl OrderLedger {
    /// Opens (or creates) the orders file with the given layout.
    ///
    /// # Errors
    /// Returns [`Error::LedgerCorrupt`] if the file cannot be parsed or uses the other
    /// layout.
    pub async fn new(path: impl Into<PathBuf>, shape: OrdersShape) -> Result<Self> {
        let store = JsonStore::open(path, OrderBook::empty(shape)).await?;
        let found = store.load().await?.shape();
        if found != shape {
            return Err(Error::LedgerCorrupt {
                path: store.path().to_path_buf(),
                reason: format!("expected {shape:?} orders layout, found {found:?}"),
            });
        }
        Ok(Self { store, shape })
    }

    /// Configured layout.
    #[must_use]
    pub const fn shape(&self) -> OrdersShape {
        self.shape
    }

    /// Records an accepted order.
    ///
    /// # Errors
    /// Returns [`Error::LedgerWrite`] if the file could not be replaced; the order is then
    /// not recorded.
    #[instrument(skip(self, order), fields(product = %order.product_name, quantity = order.quantity))]
    pub async fn append(&self, order: Order) -> Result<()> {
        self.store
            .transact(|book| {
                book.push(order);
                Ok(Commit::Write(()))
            })
            .await?;
        info!("Order recorded");
        Ok(())
    }

    /// Every order, oldest first.
    ///
    /// In the `by_product` layout the groups are merged by timestamp alone, so orders with
    /// identical timestamps come back in product-name order rather than append order.
    pub async fn list_all(&self) -> Result<Vec<Order>> {
        Ok(self.store.load().await?.chronological())
    }

    /// Orders grouped by product name, each group oldest first.
    pub async fn list_by_product(&self) -> Result<BTreeMap<String, Vec<Order>>> {
        Ok(self.store.load().await?.grouped())
    }

    /// Total units sold per product.
    pub async fn sales_by_product(&self) -> Result<BTreeMap<String, u32>> {
        Ok(self
            .list_by_product()
            .await?
            .into_iter()
            .map(|(product, orders)| {
                let units = orders.iter().map(|o| o.quantity).sum();
                (product, units)
            })
            .collect())
    }

    /// Deletes the whole order history. Products and promo codes are not touched.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<()> {
        let shape = self.shape;
        let cleared = self
            .store
            .transact(|book| {
                let count = book.len();
                *book = OrderBook::empty(shape);
                Ok(Commit::Write(count))
            })
            .await?;
        info!("Order ledger reset, {} orders removed", cleared);
        Ok(())
    }

    /// Flattens all orders into CSV, oldest first.
    pub async fn export_csv(&self) -> Result<Vec<u8>> {
        let orders = self.list_all().await?;
        Ok(render_csv(&orders).into_bytes())
    }
}

fn render_csv(orders: &[Order]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for order in orders {
        let row = [
            csv_field(&order.customer_name),
            csv_field(&order.product_name),
            order.quantity.to_string(),
            csv_field(&order.contact),
            format!("{:.2}", order.net_total),
            order.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::sample_order;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    async fn setup_ledger(shape: OrdersShape) -> Result<(TempDir, OrderLedger)> {
        let dir = TempDir::new()?;
        let ledger = OrderLedger::new(dir.path().join("orders.json"), shape).await?;
        Ok((dir, ledger))
    }

    #[tokio::test]
    async fn test_append_then_list_round_trips() -> Result<()> {
        for shape in [OrdersShape::List, OrdersShape::ByProduct] {
            let (_dir, ledger) = setup_ledger(shape).await?;
            let order = sample_order("Blue Bull", 2, Decimal::new(300, 2));

            ledger.append(order.clone()).await?;

            assert_eq!(ledger.list_all().await?, vec![order]);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_grouped_layout_lists_chronologically() -> Result<()> {
        let (_dir, ledger) = setup_ledger(OrdersShape::ByProduct).await?;
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let mut first = sample_order("Zest", 1, Decimal::ONE);
        first.timestamp = start;
        let mut second = sample_order("Apple", 1, Decimal::ONE);
        second.timestamp = start + Duration::minutes(1);
        let mut third = sample_order("Zest", 3, Decimal::ONE);
        third.timestamp = start + Duration::minutes(2);

        for order in [&first, &second, &third] {
            ledger.append(order.clone()).await?;
        }

        assert_eq!(ledger.list_all().await?, vec![first, second, third]);
        let groups = ledger.list_by_product().await?;
        assert_eq!(groups["Zest"].len(), 2);
        assert_eq!(groups["Apple"].len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_grouped_layout_breaks_timestamp_ties_by_product() -> Result<()> {
        let stamp = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        let mut zest = sample_order("Zest", 1, Decimal::ONE);
        zest.timestamp = stamp;
        let mut apple = sample_order("Apple", 2, Decimal::ONE);
        apple.timestamp = stamp;

        let (_dir, grouped) = setup_ledger(OrdersShape::ByProduct).await?;
        let (_other, flat) = setup_ledger(OrdersShape::List).await?;
        for ledger in [&grouped, &flat] {
            ledger.append(zest.clone()).await?;
            ledger.append(apple.clone()).await?;
        }

        assert_eq!(grouped.list_all().await?, vec![apple.clone(), zest.clone()]);
        assert_eq!(flat.list_all().await?, vec![zest, apple]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_layout_groups_on_read() -> Result<()> {
        let (_dir, ledger) = setup_ledger(OrdersShape::List).await?;
        ledger.append(sample_order("Mint", 2, Decimal::ONE)).await?;
        ledger.append(sample_order("Lime", 1, Decimal::ONE)).await?;
        ledger.append(sample_order("Mint", 4, Decimal::ONE)).await?;

        let sales = ledger.sales_by_product().await?;

        assert_eq!(sales["Mint"], 6);
        assert_eq!(sales["Lime"], 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_persisted_layout_matches_shape() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("orders.json");
        let ledger = OrderLedger::new(&path, OrdersShape::ByProduct).await?;
        ledger.append(sample_order("Mint", 2, Decimal::ONE)).await?;

        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)
            .map_err(|e| Error::Config {
                message: e.to_string(),
            })?;

        assert!(raw["Mint"].is_array());
        assert_eq!(raw["Mint"][0]["quantity"], 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_refused() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("orders.json");
        std::fs::write(&path, "{}")?;

        let result = OrderLedger::new(&path, OrdersShape::List).await;

        assert!(matches!(result, Err(Error::LedgerCorrupt { .. })));
        assert_eq!(std::fs::read_to_string(&path)?, "{}");
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_clears_and_is_idempotent() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("orders.json");
        let ledger = OrderLedger::new(&path, OrdersShape::ByProduct).await?;
        ledger.append(sample_order("Mint", 2, Decimal::ONE)).await?;

        ledger.reset().await?;
        ledger.reset().await?;

        assert!(ledger.list_all().await?.is_empty());
        assert_eq!(std::fs::read_to_string(&path)?, "{}");
        Ok(())
    }

    #[tokio::test]
    async fn test_export_csv_columns_and_quoting() -> Result<()> {
        let (_dir, ledger) = setup_ledger(OrdersShape::List).await?;
        let mut order = sample_order("Blue Bull", 2, Decimal::new(300, 2));
        order.customer_name = "Doe, Jane".to_string();
        order.contact = "say \"hi\"".to_string();
        order.timestamp = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        ledger.append(order).await?;

        let csv = String::from_utf8(ledger.export_csv().await?).unwrap();

        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            "\"Doe, Jane\",Blue Bull,2,\"say \"\"hi\"\"\",6.00,2025-03-04 05:06:07"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_export_csv_of_empty_ledger_is_header_only() -> Result<()> {
        let (_dir, ledger) = setup_ledger(OrdersShape::ByProduct).await?;

        let csv = ledger.export_csv().await?;

        assert_eq!(csv, format!("{CSV_HEADER}\n").into_bytes());
        Ok(())
    }
}
