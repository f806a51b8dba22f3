//! Catalog Service - menu item lookup for order building
//!
//! The menu catalog is owned by another system. The order core only needs one
//! question answered: "what is item X called and what does it cost right now?"
//! [`CatalogLookup`] is that seam; [`InMemoryCatalog`] is the cached
//! implementation the server ships with, seeded from a JSON file.

use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::order::SpiceLevel;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// Types
// =============================================================================

/// Authoritative catalog data for one menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub restaurant_id: String,
    pub item_id: String,
    pub name: String,
    pub price: Decimal,
    /// Spice level used when a guest does not pick one
    #[serde(default)]
    pub spice_level: SpiceLevel,
}

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Catalog file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Item lookup used by the order aggregator and editor
///
/// `Ok(None)` means the item does not exist for that restaurant; `Err` means
/// the catalog itself could not answer.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn lookup(
        &self,
        restaurant_id: &str,
        item_id: &str,
    ) -> Result<Option<CatalogEntry>, CatalogError>;
}

// =============================================================================
// InMemoryCatalog
// =============================================================================

type CatalogKey = (String, String);

/// In-memory catalog cache keyed by (restaurant_id, item_id)
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    items: Arc<RwLock<HashMap<CatalogKey, CatalogEntry>>>,
}

impl std::fmt::Debug for InMemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCatalog")
            .field("items_count", &self.items.read().len())
            .finish()
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let catalog = Self::new();
        for entry in entries {
            catalog.upsert(entry);
        }
        catalog
    }

    /// Load a JSON array of [`CatalogEntry`] from disk
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path.as_ref())?;
        let entries: Vec<CatalogEntry> = serde_json::from_slice(&bytes)?;
        let catalog = Self::from_entries(entries);
        tracing::info!(
            path = %path.as_ref().display(),
            items = catalog.len(),
            "📦 Catalog loaded"
        );
        Ok(catalog)
    }

    /// Insert or replace an entry
    pub fn upsert(&self, entry: CatalogEntry) {
        let key = (entry.restaurant_id.clone(), entry.item_id.clone());
        self.items.write().insert(key, entry);
    }

    /// Remove an entry, returning it if present
    pub fn remove(&self, restaurant_id: &str, item_id: &str) -> Option<CatalogEntry> {
        self.items
            .write()
            .remove(&(restaurant_id.to_string(), item_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

#[async_trait]
impl CatalogLookup for InMemoryCatalog {
    async fn lookup(
        &self,
        restaurant_id: &str,
        item_id: &str,
    ) -> Result<Option<CatalogEntry>, CatalogError> {
        let cache = self.items.read();
        Ok(cache
            .get(&(restaurant_id.to_string(), item_id.to_string()))
            .cloned())
    }
}
