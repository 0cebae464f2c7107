//! Error taxonomy for catalog fetches, plus Sentry helpers.
//!
//! Catalog failures never escape the Catalog Store: they are captured to
//! Sentry, logged, and stored as a display string. The variants exist so the
//! logs and error reports can tell the failure kinds apart.

use thiserror::Error;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configured endpoint cannot be used.
    #[error("Invalid catalog endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport failure (connect, TLS, timeout, body read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Catalog request failed with HTTP {status}")]
    Status {
        /// HTTP status code returned by the endpoint.
        status: reqwest::StatusCode,
    },

    /// The body did not match the catalog envelope.
    #[error("Could not read the catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CatalogError {
    /// Short machine-readable kind for structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint(_) => "invalid_endpoint",
            Self::Network(_) | Self::Status { .. } => "network",
            Self::Decode(_) => "decode",
        }
    }
}

/// Result type alias for `CatalogError`.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Capture an error to Sentry and log it.
///
/// When Sentry is not initialized the capture is a no-op and only the log
/// line remains.
pub fn report_error(error: &CatalogError, context: &str) {
    let event_id = sentry::capture_error(error);
    tracing::error!(
        error = %error,
        kind = error.kind(),
        sentry_event_id = %event_id,
        "{context}"
    );
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
