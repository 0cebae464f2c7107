//! Catalog filtering and search-bar suggestions.
//!
//! Matching is a case-insensitive substring test against a product's title
//! or category. Both functions preserve catalog order.

use crate::types::Product;

/// Maximum number of suggestions offered for a query.
pub const MAX_SUGGESTIONS: usize = 5;

/// Products whose title or category contains `query`, ignoring case.
///
/// An empty query matches everything.
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    if query.is_empty() {
        return products.iter().collect();
    }

    let needle = query.to_lowercase();
    products
        .iter()
        .filter(|product| product.matches_lowercase(&needle))
        .collect()
}

/// Autofill suggestions for a partially typed query.
///
/// Distinct matching categories come first (in catalog order), then matching
/// titles. The first [`MAX_SUGGESTIONS`] candidates are kept and returned in
/// alphabetical order. An empty query yields no suggestions.
#[must_use]
pub fn suggestions(products: &[Product], query: &str) -> Vec<String> {
    if query.is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    let mut categories: Vec<&str> = Vec::new();
    for product in products {
        let category = product.category.as_str();
        if !categories.contains(&category) && category.to_lowercase().contains(&needle) {
            categories.push(category);
        }
    }

    let titles = products
        .iter()
        .map(|product| product.title.as_str())
        .filter(|title| title.to_lowercase().contains(&needle));

    let mut picked: Vec<String> = categories
        .into_iter()
        .chain(titles)
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect();
    picked.sort();
    picked
}
