//! One-shot catalog commands: list products and show search suggestions.

use std::io::Write;

use imarket_core::search::{filter_products, suggestions};
use imarket_storefront::AppState;
use tracing::info;

use crate::render;

/// The catalog could not be loaded.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct LoadFailed(String);

/// Refresh the catalog once and fail if nothing usable came back.
pub async fn load(state: &AppState) -> Result<(), LoadFailed> {
    let outcome = state.catalog().refresh().await;
    info!(?outcome, "Catalog load settled");

    let snapshot = state.catalog().snapshot();
    match snapshot.error_message() {
        Some(message) if snapshot.products().is_empty() => Err(LoadFailed(message.to_string())),
        _ => Ok(()),
    }
}

/// Fetch the catalog and print the products matching `query`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or stdout is closed.
pub async fn products(state: &AppState, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    load(state).await?;

    let catalog = state.catalog().products();
    let matches = filter_products(&catalog, query);
    let screen = render::catalog_screen(&matches, query, state.cart(), state.favorites());

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{screen}")?;
    Ok(())
}

/// Fetch the catalog and print suggestions for `query`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or stdout is closed.
pub async fn suggest(state: &AppState, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    load(state).await?;

    let catalog = state.catalog().products();
    let mut stdout = std::io::stdout().lock();
    for suggestion in suggestions(&catalog, query) {
        writeln!(stdout, "{suggestion}")?;
    }
    Ok(())
}

