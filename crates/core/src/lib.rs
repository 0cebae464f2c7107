//! iMarket Core - Shared types library.
//!
//! This crate provides the types used across all iMarket components:
//! - `storefront` - Catalog client and the cart, favorites and catalog stores
//! - `cli` - Terminal front end that browses the catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. This keeps it lightweight and trivially testable.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, products, the catalog envelope and load status
//! - [`search`] - Catalog filtering and search suggestions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod search;
pub mod types;

pub use types::*;
