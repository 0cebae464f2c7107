//! Integration tests for iMarket.
//!
//! The tests talk to a real HTTP server: [`MockCatalog`] binds an axum app on
//! an ephemeral localhost port and serves whatever body and status the test
//! configured, optionally after a delay, while counting requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p imarket-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::routing::get;
use imarket_storefront::CatalogClient;
use imarket_storefront::config::CatalogConfig;
use imarket_storefront::store::CatalogStore;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

/// Path the mock serves the catalog on.
pub const CATALOG_PATH: &str = "/products";

#[derive(Debug)]
struct Reply {
    status: StatusCode,
    body: String,
    delay: Duration,
}

#[derive(Debug)]
struct Shared {
    reply: Mutex<Reply>,
    hits: AtomicUsize,
}

/// A local catalog endpoint with a switchable response.
///
/// The server task is aborted when the mock is dropped.
#[derive(Debug)]
pub struct MockCatalog {
    addr: SocketAddr,
    shared: Arc<Shared>,
    server: JoinHandle<()>,
}

impl MockCatalog {
    /// Bind on `127.0.0.1:0` and start serving an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let shared = Arc::new(Shared {
            reply: Mutex::new(Reply {
                status: StatusCode::OK,
                body: catalog_json(Vec::new()).to_string(),
                delay: Duration::ZERO,
            }),
            hits: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route(CATALOG_PATH, get(serve_catalog))
            .with_state(Arc::clone(&shared));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            shared,
            server,
        })
    }

    /// Full URL of the catalog endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a valid URL.
    #[must_use]
    pub fn url(&self) -> Url {
        let raw = format!("http://{}{CATALOG_PATH}", self.addr);
        Url::parse(&raw).unwrap_or_else(|e| panic!("mock url {raw} is invalid: {e}"))
    }

    /// Client config pointing at this mock with a short timeout.
    #[must_use]
    pub fn config(&self) -> CatalogConfig {
        CatalogConfig {
            endpoint: self.url(),
            request_timeout: Duration::from_secs(5),
        }
    }

    /// A fresh, idle Catalog Store that fetches from this mock.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built for the mock URL.
    #[must_use]
    pub fn store(&self) -> CatalogStore {
        let client = CatalogClient::new(&self.config())
            .unwrap_or_else(|e| panic!("client for mock catalog: {e}"));
        CatalogStore::new(client)
    }

    /// Serve `body` with `status` from now on.
    pub fn respond(&self, status: StatusCode, body: impl Into<String>) {
        let mut reply = self.reply();
        reply.status = status;
        reply.body = body.into();
    }

    /// Serve `value` as a `200 OK` JSON body from now on.
    pub fn respond_json(&self, value: &Value) {
        self.respond(StatusCode::OK, value.to_string());
    }

    /// Hold every response for `delay` before sending it.
    pub fn set_delay(&self, delay: Duration) {
        self.reply().delay = delay;
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.shared.hits.load(Ordering::SeqCst)
    }

    fn reply(&self) -> std::sync::MutexGuard<'_, Reply> {
        self.shared.reply.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for MockCatalog {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn serve_catalog(
    State(shared): State<Arc<Shared>>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    shared.hits.fetch_add(1, Ordering::SeqCst);

    let (status, body, delay) = {
        let reply = shared.reply.lock().unwrap_or_else(PoisonError::into_inner);
        (reply.status, reply.body.clone(), reply.delay)
    };

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// One product as the endpoint sends it.
#[must_use]
pub fn product_json(id: i64, title: &str, price: f64, category: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "description": format!("{title} description"),
        "category": category,
        "thumbnail": format!("https://cdn.example.com/products/{id}/thumbnail.webp"),
        "rating": 4.5,
        "stock": 12,
    })
}

/// The catalog envelope around `products`.
#[must_use]
pub fn catalog_json(products: Vec<Value>) -> Value {
    let total = products.len();
    json!({
        "products": products,
        "total": total,
        "skip": 0,
        "limit": 30,
    })
}
