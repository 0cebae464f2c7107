//! Catalog product and the wire envelope it arrives in.

use core::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product listed in the catalog.
///
/// Identity is the catalog key: two products with the same [`ProductId`]
/// compare equal even if any other field differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique catalog key.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Unit price (never negative).
    pub price: Price,
    /// Long-form description.
    pub description: String,
    /// Category slug, e.g. `beauty` or `groceries`.
    pub category: String,
    /// Thumbnail image URL.
    pub thumbnail: String,
}

impl Product {
    /// Whether the title or category contains `needle`.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.category.to_lowercase().contains(needle)
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Response body of the catalog endpoint.
///
/// `total`, `skip` and `limit` describe the page that was returned; the
/// client does not paginate, so they are only logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub products: Vec<Product>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
}
