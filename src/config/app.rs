//! Application configuration loading from config.toml
//!
//! Every key has a default, so a missing config file (or a missing section) yields a
//! working setup with the data files under `./data`.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    core::{checkout::ShopSettings, order::OrdersShape},
    errors::{Error, Result},
};

/// Default location of the config file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Where the JSON files live and how orders are laid out
    pub storage: StorageConfig,
    /// Checkout and promo settings
    pub shop: ShopConfig,
}

/// `[storage]` section
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the data files
    pub data_dir: PathBuf,
    /// Catalog file name, relative to `data_dir`
    pub catalog_file: String,
    /// Orders file name, relative to `data_dir`
    pub orders_file: String,
    /// Promos file name, relative to `data_dir`
    pub promos_file: String,
    /// Layout of the orders file (`list` or `by_product`)
    pub orders_shape: OrdersShape,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            catalog_file: "products.json".to_string(),
            orders_file: "orders.json".to_string(),
            promos_file: "promos.json".to_string(),
            orders_shape: OrdersShape::List,
        }
    }
}

impl StorageConfig {
    /// Full path of the catalog file
    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }

    /// Full path of the orders file
    #[must_use]
    pub fn orders_path(&self) -> PathBuf {
        self.data_dir.join(&self.orders_file)
    }

    /// Full path of the promos file
    #[must_use]
    pub fn promos_path(&self) -> PathBuf {
        self.data_dir.join(&self.promos_file)
    }
}

/// `[shop]` section
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShopConfig {
    /// Largest quantity accepted in one order
    pub max_quantity: u32,
    /// Discount of codes minted without an explicit amount
    pub default_promo_discount: Decimal,
    /// Length of generated promo codes (6 to 8)
    pub promo_code_length: usize,
    /// Currency symbol used in messages
    pub currency: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        let settings = ShopSettings::default();
        Self {
            max_quantity: settings.max_quantity,
            default_promo_discount: settings.default_promo_discount,
            promo_code_length: 8,
            currency: settings.currency,
        }
    }
}

impl ShopConfig {
    /// Checkout settings derived from this section.
    ///
    /// # Errors
    /// Returns [`Error::Config`] for a zero `max_quantity` or a negative default discount.
    pub fn settings(&self) -> Result<ShopSettings> {
        if self.max_quantity == 0 {
            return Err(Error::Config {
                message: "shop.max_quantity must be at least 1".to_string(),
            });
        }
        if self.default_promo_discount.is_sign_negative() && !self.default_promo_discount.is_zero()
        {
            return Err(Error::Config {
                message: "shop.default_promo_discount cannot be negative".to_string(),
            });
        }
        Ok(ShopSettings {
            max_quantity: self.max_quantity,
            default_promo_discount: self.default_promo_discount,
            currency: self.currency.clone(),
        })
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    debug!("Loading configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {path:?}: {e}"),
    })
}

/// Loads configuration from `SHOP_CONFIG` or `./config.toml`, falling back to defaults
/// when that file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("SHOP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if Path::new(&path).exists() {
        load_config(&path)
    } else {
        info!("No config file at {}, using defaults", path);
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [storage]
            data_dir = "/var/lib/shop"
            orders_file = "commandes.json"
            orders_shape = "by_product"

            [shop]
            max_quantity = 5
            default_promo_discount = 1.5
            promo_code_length = 6
            currency = "$"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.storage.orders_shape, OrdersShape::ByProduct);
        assert_eq!(
            config.storage.orders_path(),
            PathBuf::from("/var/lib/shop/commandes.json")
        );
        assert_eq!(
            config.storage.catalog_path(),
            PathBuf::from("/var/lib/shop/products.json")
        );
        assert_eq!(config.shop.max_quantity, 5);
        assert_eq!(config.shop.default_promo_discount, Decimal::new(15, 1));
        assert_eq!(config.shop.promo_code_length, 6);
        assert_eq!(config.shop.settings().unwrap().currency, "$");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage.promos_path(), PathBuf::from("data/promos.json"));
        assert_eq!(config.shop.max_quantity, 11);
        assert_eq!(config.shop.default_promo_discount, Decimal::ONE);
    }

    #[test]
    fn test_settings_rejects_zero_max_quantity() {
        let shop = ShopConfig {
            max_quantity: 0,
            ..ShopConfig::default()
        };
        assert!(matches!(shop.settings(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        let result: std::result::Result<AppConfig, _> =
            toml::from_str("[storage]\norders_shape = \"counts\"");
        assert!(result.is_err());
    }
}
