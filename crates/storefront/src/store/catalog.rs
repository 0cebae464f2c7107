//! Catalog Store: the fetched product list and its load status.
//!
//! State lives in a `watch` channel so every mutation is published as one
//! complete snapshot. A reader never sees `Loading` next to an error left
//! over from the previous attempt, or a half-replaced product list.
//!
//! ```text
//!            refresh()                 fetch ok
//!   Idle ─────────────► Loading ───────────────► Loaded
//!                        ▲   │                      │
//!                        │   │ fetch failed         │ refresh()
//!                        │   ▼                      │
//!                        └─ Failed ◄────────────────┘ (via Loading)
//! ```
//!
//! Overlapping refreshes are coalesced: while one is in flight, further calls
//! return [`RefreshOutcome::AlreadyInFlight`] without touching the network.

use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use imarket_core::{CatalogResponse, LoadStatus, Product, ProductId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::catalog::CatalogClient;
use crate::error::{CatalogError, report_error};

/// A consistent view of the Catalog Store.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    products: Vec<Product>,
    status: LoadStatus,
    error_message: Option<String>,
    last_loaded_at: Option<DateTime<Utc>>,
}

impl CatalogState {
    /// Products from the last successful fetch, in endpoint order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Where the last refresh got to.
    #[must_use]
    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Human-readable description of the last failure, if the last attempt failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// When `products` was last replaced.
    #[must_use]
    pub const fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.last_loaded_at
    }
}

/// Result of a call to [`CatalogStore::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// This call performed the fetch; carries the settled status.
    Completed(LoadStatus),
    /// Another refresh was already running; nothing was done.
    AlreadyInFlight,
    /// The store was dropped before the response arrived; nothing was applied.
    Discarded,
}

/// Holds the fetched catalog and publishes every change to subscribers.
pub struct CatalogStore {
    client: CatalogClient,
    state: watch::Sender<CatalogState>,
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("client", &self.client)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl CatalogStore {
    /// Create an empty, idle store that fetches through `client`.
    #[must_use]
    pub fn new(client: CatalogClient) -> Self {
        let (state, _) = watch::channel(CatalogState::default());
        Self { client, state }
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }

    /// Clone of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    /// Clone of the current product list.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.state.borrow().products.clone()
    }

    /// Look up a product in the current list.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<Product> {
        self.state
            .borrow()
            .products
            .iter()
            .find(|product| product.id == id)
            .cloned()
    }

    /// Fetch the catalog and publish the outcome.
    ///
    /// Failures are never returned: they land in
    /// [`CatalogState::error_message`] and the previous products are kept.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(previous) = self.begin() else {
            debug!("Catalog refresh already in flight, coalescing");
            return RefreshOutcome::AlreadyInFlight;
        };

        let mut guard = InFlight {
            store: StoreRef::Borrowed(self),
            previous: Some(previous),
        };

        let result = self.client.fetch_products().await;
        guard.disarm();

        RefreshOutcome::Completed(finish(&self.state, result))
    }

    /// Run a refresh on the tokio runtime.
    ///
    /// The task only holds a weak reference while the request is in flight.
    /// If the store is gone by the time the response arrives, the response is
    /// dropped instead of being applied. Aborting the returned handle before
    /// the response arrives restores the state the refresh started from.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<RefreshOutcome> {
        let previous = self.begin();
        let client = self.client.clone();
        let store: Weak<Self> = Arc::downgrade(self);

        // Built before spawning so an abort ahead of the first poll still
        // drops it.
        let guard = previous.map(|previous| InFlight {
            store: StoreRef::Detached(store.clone()),
            previous: Some(previous),
        });

        tokio::spawn(async move {
            let Some(mut guard) = guard else {
                debug!("Catalog refresh already in flight, coalescing");
                return RefreshOutcome::AlreadyInFlight;
            };

            let result = client.fetch_products().await;
            guard.disarm();

            match store.upgrade() {
                Some(store) => RefreshOutcome::Completed(finish(&store.state, result)),
                None => {
                    debug!("Catalog store dropped before refresh completed, discarding result");
                    RefreshOutcome::Discarded
                }
            }
        })
    }

    /// Enter `Loading` unless already there. Returns what the refresh replaced.
    fn begin(&self) -> Option<Previous> {
        let mut previous = None;
        self.state.send_if_modified(|state| {
            if state.status.is_loading() {
                return false;
            }
            previous = Some(Previous {
                status: state.status,
                error_message: state.error_message.take(),
            });
            state.status = LoadStatus::Loading;
            true
        });
        previous
    }
}

/// Publish the result of a fetch. Returns the settled status.
fn finish(
    state: &watch::Sender<CatalogState>,
    result: Result<CatalogResponse, CatalogError>,
) -> LoadStatus {
    match result {
        Ok(envelope) => {
            let count = envelope.products.len();
            state.send_modify(|state| {
                state.products = envelope.products;
                state.status = LoadStatus::Loaded;
                state.error_message = None;
                state.last_loaded_at = Some(Utc::now());
            });
            info!(count, "Catalog refreshed");
            LoadStatus::Loaded
        }
        Err(error) => {
            report_error(&error, "Catalog refresh failed");
            state.send_modify(|state| {
                state.status = LoadStatus::Failed;
                state.error_message = Some(error.to_string());
            });
            LoadStatus::Failed
        }
    }
}

/// Status and error a refresh cleared when it entered `Loading`.
#[derive(Debug)]
struct Previous {
    status: LoadStatus,
    error_message: Option<String>,
}

enum StoreRef<'a> {
    Borrowed(&'a CatalogStore),
    Detached(Weak<CatalogStore>),
}

/// Puts back the pre-refresh status and error if a refresh is dropped
/// mid-flight, so later refreshes are not coalesced into one that will never
/// finish.
struct InFlight<'a> {
    store: StoreRef<'a>,
    previous: Option<Previous>,
}

impl InFlight<'_> {
    fn disarm(&mut self) {
        self.previous = None;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };
        debug!("Catalog refresh cancelled");

        let restore = |state: &watch::Sender<CatalogState>| {
            state.send_modify(|state| {
                state.status = previous.status;
                state.error_message = previous.error_message;
            });
        };
        match &self.store {
            StoreRef::Borrowed(store) => restore(&store.state),
            StoreRef::Detached(weak) => {
                if let Some(store) = weak.upgrade() {
                    restore(&store.state);
                }
            }
        }
    }
}
