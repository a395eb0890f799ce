//! Storage setup - opening the catalog and both ledgers.
//!
//! This is the startup path: missing ledger files are created with an empty document,
//! while a corrupt catalog or ledger aborts startup instead of being overwritten.

use std::sync::Arc;

use tracing::info;

use crate::{
    config::app::AppConfig,
    core::{catalog::Catalog, checkout::Shop, order::OrderLedger, promo::PromoLedger},
    errors::Result,
    notify::NotificationSink,
};

/// Opens every data file named in `config` and assembles the shop.
///
/// # Errors
/// Returns `CatalogUnavailable`, `LedgerCorrupt` or a configuration error; nothing is
/// written to an existing file on failure.
pub async fn open_shop(config: &AppConfig, notifier: Arc<dyn NotificationSink>) -> Result<Shop> {
    let storage = &config.storage;
    tokio::fs::create_dir_all(&storage.data_dir).await?;

    let settings = config.shop.settings()?;
    let catalog = Catalog::load(&storage.catalog_path()).await?;
    let promos = PromoLedger::new(storage.promos_path(), config.shop.promo_code_length).await?;
    let orders = OrderLedger::new(storage.orders_path(), storage.orders_shape).await?;

    info!(
        "Opened shop data in {:?} ({} products, {:?} orders layout)",
        storage.data_dir,
        catalog.len(),
        orders.shape()
    );
    Ok(Shop::new(catalog, promos, orders, notifier, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::app::StorageConfig,
        core::order::OrdersShape,
        errors::Error,
        notify::LogSink,
        test_utils::TEST_CATALOG,
    };
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, shape: OrdersShape) -> AppConfig {
        AppConfig {
            storage: StorageConfig {
                data_dir: dir.path().join("data"),
                orders_shape: shape,
                ..StorageConfig::default()
            },
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_open_shop_initializes_empty_ledgers() -> Result<()> {
        let dir = TempDir::new()?;
        let config = config_in(&dir, OrdersShape::ByProduct);

        let shop = open_shop(&config, Arc::new(LogSink::new("€"))).await?;

        assert!(shop.catalog().is_empty());
        assert_eq!(std::fs::read_to_string(config.storage.orders_path())?, "{}");
        assert_eq!(std::fs::read_to_string(config.storage.promos_path())?, "{}");
        Ok(())
    }

    #[tokio::test]
    async fn test_open_shop_loads_catalog() -> Result<()> {
        let dir = TempDir::new()?;
        let config = config_in(&dir, OrdersShape::List);
        std::fs::create_dir_all(&config.storage.data_dir)?;
        std::fs::write(config.storage.catalog_path(), TEST_CATALOG)?;

        let shop = open_shop(&config, Arc::new(LogSink::new("€"))).await?;

        assert_eq!(shop.catalog().len(), 3);
        assert_eq!(std::fs::read_to_string(config.storage.orders_path())?, "[]");
        Ok(())
    }

    #[tokio::test]
    async fn test_open_shop_fails_on_corrupt_promos() -> Result<()> {
        let dir = TempDir::new()?;
        let config = config_in(&dir, OrdersShape::List);
        std::fs::create_dir_all(&config.storage.data_dir)?;
        std::fs::write(config.storage.promos_path(), "{\"ABC\": ")?;

        let result = open_shop(&config, Arc::new(LogSink::new("€"))).await;

        assert!(matches!(result, Err(Error::LedgerCorrupt { .. })));
        Ok(())
    }
}
