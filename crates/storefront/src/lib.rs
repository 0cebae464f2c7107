//! iMarket Storefront library.
//!
//! Everything a front end needs to browse the catalog: the HTTP client for
//! the catalog endpoint, the three reactive stores (catalog, cart,
//! favorites), configuration and the shared [`state::AppState`].
//!
//! # Example
//!
//! ```rust,ignore
//! use imarket_storefront::{config::StorefrontConfig, state::AppState};
//!
//! let state = AppState::new(StorefrontConfig::from_env()?)?;
//! state.catalog().refresh().await;
//!
//! if let Some(product) = state.catalog().products().first() {
//!     state.cart().add(product);
//!     state.favorites().toggle(product);
//! }
//! println!("cart: {} item(s), {}", state.cart().count(), state.cart().subtotal());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod state;
pub mod store;

pub use catalog::CatalogClient;
pub use error::CatalogError;
pub use state::AppState;
pub use store::{CartStore, CartSummary, CatalogState, CatalogStore, FavoritesStore, RefreshOutcome};
