//! Text rendering for the three screens: catalog, my items and cart.
//!
//! Everything here returns `String`s so the layouts can be tested without a
//! terminal.

use std::fmt::Write as _;

use imarket_core::Product;
use imarket_storefront::{CartStore, CartSummary, CatalogState, FavoritesStore};

const TITLE_WIDTH: usize = 36;

/// Uppercase the first letter of every word (`home-decoration` stays one word).
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// One catalog row with favorite and cart markers.
pub fn product_line(product: &Product, favorite: bool, in_cart: bool) -> String {
    let heart = if favorite { '♥' } else { '♡' };
    let cart = if in_cart { "  [in cart]" } else { "" };
    format!(
        "{:>4}  {:<width$}  {:>9}  {} {}{}",
        product.id.as_i64(),
        truncate(&product.title, TITLE_WIDTH),
        product.price.to_string(),
        capitalize_words(&product.category),
        heart,
        cart,
        width = TITLE_WIDTH,
    )
}

/// Count line shown above search results.
pub fn results_header(count: usize, query: &str) -> String {
    if query.is_empty() {
        return format!("{count} products");
    }
    if count == 0 {
        return format!("No results for \"{query}\"\nCheck the spelling or try a new search");
    }
    format!("{count} results for \"{query}\"")
}

/// Status line for the catalog: loading, error, or when it was loaded.
pub fn catalog_status(state: &CatalogState) -> String {
    if state.is_loading() {
        return "Loading catalog...".to_string();
    }
    if let Some(message) = state.error_message() {
        return format!("Could not load products: {message}");
    }
    state.last_loaded_at().map_or_else(
        || "Catalog not loaded yet".to_string(),
        |at| {
            format!(
                "{} products, updated {}",
                state.products().len(),
                at.format("%H:%M:%S UTC")
            )
        },
    )
}

/// Catalog screen: header plus one row per product.
pub fn catalog_screen(
    products: &[&Product],
    query: &str,
    cart: &CartStore,
    favorites: &FavoritesStore,
) -> String {
    let mut out = results_header(products.len(), query);
    for product in products {
        out.push('\n');
        out.push_str(&product_line(
            product,
            favorites.contains(product),
            cart.contains(product),
        ));
    }
    out
}

/// "My Items" screen: favorites, marked with whether they are in the cart.
pub fn my_items_screen(cart: &CartStore, favorites: &FavoritesStore) -> String {
    let items = favorites.items();
    if items.is_empty() {
        return "No favorites yet. Use `fav <id>` to add one.".to_string();
    }

    let mut out = format!("My Items ({})", items.len());
    for product in &items {
        out.push('\n');
        out.push_str(&product_line(product, true, cart.contains(product)));
    }
    out
}

/// Totals block under the cart list.
pub fn cart_summary(summary: &CartSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total: {}", summary.total);
    let _ = writeln!(out, "{} items", summary.item_count);
    let _ = writeln!(out, "  Subtotal: {}", summary.subtotal);
    let _ = writeln!(out, "  Savings: {}", summary.savings);
    let _ = write!(out, "  Taxes: {}", summary.taxes);
    out
}

/// Cart screen: items in the order they were added, then the totals.
pub fn cart_screen(cart: &CartStore, favorites: &FavoritesStore) -> String {
    let items = cart.items();
    let mut out = if items.is_empty() {
        "Your cart is empty.".to_string()
    } else {
        format!("Cart ({})", items.len())
    };
    for product in &items {
        out.push('\n');
        out.push_str(&product_line(product, favorites.contains(product), true));
    }
    out.push_str("\n\n");
    out.push_str(&cart_summary(&cart.summary()));
    out
}
