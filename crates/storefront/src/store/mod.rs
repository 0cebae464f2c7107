//! Reactive stores shared by every screen.
//!
//! Each store owns its state behind a `tokio::sync::watch` sender. Mutations
//! go through the store's methods only and are published as whole snapshots;
//! `subscribe()` hands out receivers for anything that needs to re-render.

mod cart;
mod catalog;
mod favorites;

pub use cart::{CartStore, CartSummary};
pub use catalog::{CatalogState, CatalogStore, RefreshOutcome};
pub use favorites::FavoritesStore;
