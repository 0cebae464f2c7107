//! Core types for iMarket.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use id::*;
pub use price::{Price, PriceError};
pub use product::{CatalogResponse, Product};
pub use status::LoadStatus;
