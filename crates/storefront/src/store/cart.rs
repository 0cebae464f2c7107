//! Cart Store: products the user has picked for purchase.
//!
//! Items are unique by product id and kept in the order they were added.
//! Adding a product that is already present does nothing; there are no
//! quantities.

use imarket_core::{Price, Product, ProductId};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::add_breadcrumb;

/// Totals shown under the cart list.
///
/// Savings and taxes are not computed by this app and are always zero, so
/// `total` always equals `subtotal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    pub item_count: usize,
    pub subtotal: Price,
    pub savings: Price,
    pub taxes: Price,
    pub total: Price,
}

impl CartSummary {
    fn for_items(items: &[Product]) -> Self {
        let subtotal: Price = items.iter().map(|product| product.price).sum();
        Self {
            item_count: items.len(),
            subtotal,
            savings: Price::ZERO,
            taxes: Price::ZERO,
            total: subtotal,
        }
    }
}

/// Ordered, duplicate-free shopping cart.
#[derive(Debug)]
pub struct CartStore {
    items: watch::Sender<Vec<Product>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        let (items, _) = watch::channel(Vec::new());
        Self { items }
    }

    /// Subscribe to cart changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.items.subscribe()
    }

    /// Append `product` unless a product with the same id is already in the cart.
    ///
    /// Returns `true` if the cart changed.
    pub fn add(&self, product: &Product) -> bool {
        let added = self.items.send_if_modified(|items| {
            if items.iter().any(|item| item.id == product.id) {
                return false;
            }
            items.push(product.clone());
            true
        });

        if added {
            let id = product.id.to_string();
            add_breadcrumb("cart", "Added product", Some(&[("product_id", &id)]));
            debug!(product_id = %product.id, "Added product to cart");
        }
        added
    }

    /// Remove the product with the same id, if present.
    ///
    /// Returns `true` if the cart changed.
    pub fn remove(&self, product: &Product) -> bool {
        let removed = self.items.send_if_modified(|items| {
            match items.iter().position(|item| item.id == product.id) {
                Some(index) => {
                    items.remove(index);
                    true
                }
                None => false,
            }
        });

        if removed {
            let id = product.id.to_string();
            add_breadcrumb("cart", "Removed product", Some(&[("product_id", &id)]));
            debug!(product_id = %product.id, "Removed product from cart");
        }
        removed
    }

    /// Whether a product with the same id is in the cart.
    #[must_use]
    pub fn contains(&self, product: &Product) -> bool {
        self.contains_id(product.id)
    }

    /// Whether a product with this id is in the cart.
    #[must_use]
    pub fn contains_id(&self, id: ProductId) -> bool {
        self.items.borrow().iter().any(|item| item.id == id)
    }

    /// The cart entry with this id, if any.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<Product> {
        self.items.borrow().iter().find(|item| item.id == id).cloned()
    }

    /// Cart contents in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<Product> {
        self.items.borrow().clone()
    }

    /// Number of items (the cart badge).
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.borrow().len()
    }

    /// Sum of item prices.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.borrow().iter().map(|product| product.price).sum()
    }

    /// Count and totals for the current contents.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::for_items(&self.items.borrow())
    }

    /// Checkout is not wired to any payment flow; this only records the attempt.
    ///
    /// The cart is left unchanged.
    pub fn checkout(&self) -> CartSummary {
        let summary = self.summary();
        add_breadcrumb("cart", "Checkout pressed", None);
        info!(
            items = summary.item_count,
            total = %summary.total,
            "Checkout requested, no payment flow configured"
        );
        summary
    }
}
