//! Catalog store - The read-only list of drinks.
//!
//! The catalog is read once at startup. A missing file yields an empty catalog, but a file
//! that exists and cannot be parsed (or lists the same name twice) is an error: nothing can
//! be priced without a trustworthy catalog.

use std::{collections::HashSet, path::Path};

use tracing::{info, warn};

use crate::{
    entities::Product,
    errors::{Error, Result},
};

/// Products available for ordering, in catalog file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog from already loaded products, enforcing unique names.
    ///
    /// # Errors
    /// Returns [`Error::CatalogUnavailable`] if two products share a name.
    pub fn from_products(products: Vec<Product>, source: &Path) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = products.iter().find(|p| !seen.insert(p.name.as_str())) {
            return Err(Error::CatalogUnavailable {
                path: source.to_path_buf(),
                reason: format!("duplicate product name '{}'", duplicate.name),
            });
        }
        Ok(Self { products })
    }

    /// Loads the catalog file at `path`.
    ///
    /// # Errors
    /// Returns [`Error::CatalogUnavailable`] if the file exists but cannot be read,
    /// is not a JSON array of products, or contains duplicate names.
    pub async fn load(path: &Path) -> Result<Self> {
        let unavailable = |reason: String| Error::CatalogUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Catalog file {:?} not found, starting with an empty catalog", path);
                return Ok(Self::default());
            }
            Err(e) => return Err(unavailable(e.to_string())),
        };

        let products: Vec<Product> =
            serde_json::from_slice(&bytes).map_err(|e| unavailable(e.to_string()))?;
        let catalog = Self::from_products(products, path)?;
        info!("Loaded {} products from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn list_products(&self) -> &[Product] {
        &self.products
    }

    /// Finds a product by exact name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True when no products are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
