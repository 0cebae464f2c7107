//! Favorites Store: products the user has marked with a heart.

use std::collections::BTreeMap;

use imarket_core::{Product, ProductId};
use tokio::sync::watch;
use tracing::debug;

use crate::error::add_breadcrumb;

/// Set of favorite products keyed by id.
///
/// [`toggle`](Self::toggle) is the only mutation. Iteration is by ascending
/// id, which has no meaning beyond being stable.
#[derive(Debug)]
pub struct FavoritesStore {
    items: watch::Sender<BTreeMap<ProductId, Product>>,
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FavoritesStore {
    /// Create an empty favorites set.
    #[must_use]
    pub fn new() -> Self {
        let (items, _) = watch::channel(BTreeMap::new());
        Self { items }
    }

    /// Subscribe to favorites changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BTreeMap<ProductId, Product>> {
        self.items.subscribe()
    }

    /// Add `product` if it is not a favorite, remove it if it is.
    ///
    /// Returns whether the product is a favorite afterwards.
    pub fn toggle(&self, product: &Product) -> bool {
        let mut now_favorite = false;
        self.items.send_modify(|items| {
            if items.remove(&product.id).is_none() {
                items.insert(product.id, product.clone());
                now_favorite = true;
            }
        });

        let id = product.id.to_string();
        let message = if now_favorite {
            "Marked favorite"
        } else {
            "Unmarked favorite"
        };
        add_breadcrumb("favorites", message, Some(&[("product_id", &id)]));
        debug!(product_id = %product.id, favorite = now_favorite, "Toggled favorite");

        now_favorite
    }

    /// Whether a product with the same id is a favorite.
    #[must_use]
    pub fn contains(&self, product: &Product) -> bool {
        self.contains_id(product.id)
    }

    /// Whether the product with this id is a favorite.
    #[must_use]
    pub fn contains_id(&self, id: ProductId) -> bool {
        self.items.borrow().contains_key(&id)
    }

    /// The favorite with this id, if any.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<Product> {
        self.items.borrow().get(&id).cloned()
    }

    /// Current favorites.
    #[must_use]
    pub fn items(&self) -> Vec<Product> {
        self.items.borrow().values().cloned().collect()
    }

    /// Number of favorites.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use imarket_core::Price;

    use super::*;

    fn product(id: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(100),
            description: String::new(),
            category: "misc".to_string(),
            thumbnail: String::new(),
        }
    }

    #[test]
    fn test_toggle_twice_restores_set() {
        let favorites = FavoritesStore::new();
        favorites.toggle(&product(1));
        let before: Vec<ProductId> = favorites.items().iter().map(|p| p.id).collect();

        assert!(favorites.toggle(&product(2)));
        assert!(!favorites.toggle(&product(2)));

        let after: Vec<ProductId> = favorites.items().iter().map(|p| p.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_contains_follows_toggle() {
        let favorites = FavoritesStore::new();
        let p = product(5);

        assert!(!favorites.contains(&p));
        favorites.toggle(&p);
        assert!(favorites.contains(&p));
        assert!(favorites.contains_id(ProductId::new(5)));
        assert_eq!(favorites.find(ProductId::new(5)), Some(p.clone()));
        favorites.toggle(&p);
        assert!(!favorites.contains(&p));
        assert_eq!(favorites.count(), 0);
    }

    #[test]
    fn test_toggle_matches_by_id() {
        let favorites = FavoritesStore::new();
        favorites.toggle(&product(1));

        let mut renamed = product(1);
        renamed.title = "Renamed".to_string();
        assert!(!favorites.toggle(&renamed));
        assert_eq!(favorites.count(), 0);
    }

    #[test]
    fn test_every_toggle_notifies() {
        let favorites = FavoritesStore::new();
        let mut rx = favorites.subscribe();

        favorites.toggle(&product(1));
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(rx.borrow_and_update().len(), 1);

        favorites.toggle(&product(1));
        assert!(rx.has_changed().unwrap_or(false));
        assert!(rx.borrow_and_update().is_empty());
    }
}
