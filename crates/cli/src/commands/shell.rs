//! Interactive session: browse, search, favorite and fill the cart.
//!
//! Every screen reads from the shared [`AppState`], so a product added to
//! the cart from the catalog listing shows as `[in cart]` on the favorites
//! screen too.

use std::io::Write;

use imarket_core::search::{filter_products, suggestions};
use imarket_core::{Product, ProductId};
use imarket_storefront::AppState;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::render;

const HELP: &str = "\
Commands:
  products [query]   List products, optionally filtered
  suggest <query>    Show search suggestions
  add <id>           Add a product to the cart
  remove <id>        Remove a product from the cart
  fav <id>           Toggle a product as favorite
  favorites          Show My Items
  cart               Show the cart and totals
  checkout           Check out the cart
  refresh            Reload the catalog in the background
  status             Show the catalog load status
  help               Show this help
  quit               Leave the shell";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Products(String),
    Suggest(String),
    Add(ProductId),
    Remove(ProductId),
    Favorite(ProductId),
    Favorites,
    Cart,
    Checkout,
    Refresh,
    Status,
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command `{0}`. Type `help` for the list.")]
    UnknownCommand(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("`{0}` is not a product id")]
    InvalidId(String),
}

/// Parse one input line.
///
/// # Errors
///
/// Returns an error for unknown commands, missing arguments and ids that are
/// not integers.
pub fn parse(line: &str) -> Result<ShellCommand, ParseError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let id = |name: &'static str| -> Result<ProductId, ParseError> {
        if rest.is_empty() {
            return Err(ParseError::MissingArgument(name));
        }
        rest.parse()
            .map_err(|_| ParseError::InvalidId(rest.to_string()))
    };

    let command = match word.to_lowercase().as_str() {
        "" => ShellCommand::Empty,
        "products" | "ls" => ShellCommand::Products(rest.to_string()),
        "suggest" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument("suggest"));
            }
            ShellCommand::Suggest(rest.to_string())
        }
        "add" => ShellCommand::Add(id("add")?),
        "remove" | "rm" => ShellCommand::Remove(id("remove")?),
        "fav" => ShellCommand::Favorite(id("fav")?),
        "favorites" | "items" => ShellCommand::Favorites,
        "cart" => ShellCommand::Cart,
        "checkout" => ShellCommand::Checkout,
        "refresh" => ShellCommand::Refresh,
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

/// Run the shell until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin or stdout fail.
pub async fn run(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting shell");
    let outcome = state.catalog().refresh().await;
    debug!(?outcome, "Initial catalog load settled");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", render::catalog_status(&state.catalog().snapshot()))?;
        writeln!(stdout, "Type `help` for commands.")?;
    }

    loop {
        prompt(state)?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match parse(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => execute(state, command),
            Err(e) => e.to_string(),
        };

        if !output.is_empty() {
            writeln!(std::io::stdout().lock(), "{output}")?;
        }
    }

    info!("Shell closed");
    Ok(())
}

fn prompt(state: &AppState) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match state.cart().count() {
        0 => write!(stdout, "imarket> ")?,
        count => write!(stdout, "imarket [cart {count}]> ")?,
    }
    stdout.flush()
}

/// Apply `command` to the shared state and return the text to show.
fn execute(state: &AppState, command: ShellCommand) -> String {
    match command {
        ShellCommand::Products(query) => {
            let catalog = state.catalog().snapshot();
            if catalog.products().is_empty() {
                return render::catalog_status(&catalog);
            }
            let matches = filter_products(catalog.products(), &query);
            render::catalog_screen(&matches, &query, state.cart(), state.favorites())
        }
        ShellCommand::Suggest(query) => {
            let found = suggestions(state.catalog().snapshot().products(), &query);
            if found.is_empty() {
                format!("No suggestions for \"{query}\"")
            } else {
                found.join("\n")
            }
        }
        ShellCommand::Add(id) => with_product(id, state.catalog().find(id), |product| {
            if state.cart().add(&product) {
                format!("Added {} to the cart", product.title)
            } else {
                format!("{} is already in the cart", product.title)
            }
        }),
        ShellCommand::Remove(id) => {
            let product = state.cart().find(id).or_else(|| state.catalog().find(id));
            with_product(id, product, |product| {
                if state.cart().remove(&product) {
                    format!("Removed {} from the cart", product.title)
                } else {
                    format!("{} is not in the cart", product.title)
                }
            })
        }
        ShellCommand::Favorite(id) => {
            let product = state
                .favorites()
                .find(id)
                .or_else(|| state.catalog().find(id));
            with_product(id, product, |product| {
                let heart = if state.favorites().toggle(&product) {
                    '♥'
                } else {
                    '♡'
                };
                format!("{heart} {}", product.title)
            })
        }
        ShellCommand::Favorites => render::my_items_screen(state.cart(), state.favorites()),
        ShellCommand::Cart => render::cart_screen(state.cart(), state.favorites()),
        ShellCommand::Checkout => {
            let summary = state.cart().checkout();
            format!(
                "Checkout is not available yet. Your cart still holds {} items ({}).",
                summary.item_count, summary.total
            )
        }
        ShellCommand::Refresh => {
            drop(state.catalog().spawn_refresh());
            "Refreshing catalog. Use `status` to check progress.".to_string()
        }
        ShellCommand::Status => render::catalog_status(&state.catalog().snapshot()),
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Quit | ShellCommand::Empty => String::new(),
    }
}

/// Apply `action` to `product`, or report that `id` matched nothing.
///
/// `add` resolves ids against the loaded catalog only; `remove` and `fav`
/// also find entries the latest catalog no longer lists.
fn with_product(
    id: ProductId,
    product: Option<Product>,
    action: impl FnOnce(Product) -> String,
) -> String {
    product.map_or_else(|| format!("No product with id {id}"), action)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use imarket_core::Price;
    use imarket_storefront::config::StorefrontConfig;

    use super::*;

    fn state() -> AppState {
        AppState::new(StorefrontConfig::from_lookup(|_| None).unwrap()).unwrap()
    }

    fn product(id: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(1250),
            description: String::new(),
            category: "misc".to_string(),
            thumbnail: String::new(),
        }
    }

    #[test]
    fn test_remove_and_unfavorite_items_missing_from_catalog() {
        let state = state();
        let p = product(3);
        state.cart().add(&p);
        state.favorites().toggle(&p);
        assert!(state.catalog().find(p.id).is_none());

        let removed = execute(&state, ShellCommand::Remove(p.id));
        assert_eq!(removed, "Removed Product 3 from the cart");
        assert_eq!(state.cart().count(), 0);

        let unfavorited = execute(&state, ShellCommand::Favorite(p.id));
        assert_eq!(unfavorited, "♡ Product 3");
        assert_eq!(state.favorites().count(), 0);
    }

    #[test]
    fn test_unknown_ids_are_reported() {
        let state = state();
        for command in [
            ShellCommand::Add(ProductId::new(8)),
            ShellCommand::Remove(ProductId::new(8)),
            ShellCommand::Favorite(ProductId::new(8)),
        ] {
            assert_eq!(execute(&state, command), "No product with id 8");
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("products"), Ok(ShellCommand::Products(String::new())));
        assert_eq!(
            parse("  products  home decor "),
            Ok(ShellCommand::Products("home decor".to_string()))
        );
        assert_eq!(parse("add 12"), Ok(ShellCommand::Add(ProductId::new(12))));
        assert_eq!(parse("RM 3"), Ok(ShellCommand::Remove(ProductId::new(3))));
        assert_eq!(parse("fav 4"), Ok(ShellCommand::Favorite(ProductId::new(4))));
        assert_eq!(parse("cart"), Ok(ShellCommand::Cart));
        assert_eq!(parse("exit"), Ok(ShellCommand::Quit));
        assert_eq!(parse(""), Ok(ShellCommand::Empty));
        assert_eq!(parse("   "), Ok(ShellCommand::Empty));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("add"), Err(ParseError::MissingArgument("add")));
        assert_eq!(parse("suggest"), Err(ParseError::MissingArgument("suggest")));
        assert_eq!(
            parse("add lamp"),
            Err(ParseError::InvalidId("lamp".to_string()))
        );
        assert_eq!(
            parse("buy 1"),
            Err(ParseError::UnknownCommand("buy".to_string()))
        );
    }
}
