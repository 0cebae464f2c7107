//! HTTP client for the product catalog endpoint.
//!
//! One plain `GET` per call: no auth, no query parameters, no retries and no
//! caching. The body is read as text first so decode failures can be logged
//! with a snippet of what actually came back.

use std::sync::Arc;

use imarket_core::CatalogResponse;
use tracing::{debug, instrument};
use url::Url;

use crate::config::{CatalogConfig, parse_endpoint};
use crate::error::CatalogError;

/// Number of body characters included in failure logs.
const LOG_BODY_CHARS: usize = 500;

/// Client for the catalog endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidEndpoint`] if the endpoint is not http(s)
    /// and [`CatalogError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        // Configs built in code skip the env-time check.
        let endpoint =
            parse_endpoint(config.endpoint.as_str()).map_err(CatalogError::InvalidEndpoint)?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner { client, endpoint }),
        })
    }

    /// The endpoint this client fetches from.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Fetch and decode the catalog envelope.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Network`] on transport failure or timeout
    /// - [`CatalogError::Status`] on a non-success HTTP status
    /// - [`CatalogError::Decode`] if the body is not a catalog envelope
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch_products(&self) -> Result<CatalogResponse, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %snippet(&response_text),
                "Catalog endpoint returned non-success status"
            );
            return Err(CatalogError::Status { status });
        }

        let envelope: CatalogResponse = match serde_json::from_str(&response_text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    body = %snippet(&response_text),
                    "Failed to parse catalog response"
                );
                return Err(CatalogError::Decode(e));
            }
        };

        debug!(
            count = envelope.products.len(),
            total = envelope.total,
            skip = envelope.skip,
            limit = envelope.limit,
            "Fetched catalog page"
        );

        Ok(envelope)
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(LOG_BODY_CHARS).collect()
}
