//! Application state shared across handlers.

use std::sync::Arc;

use axum::http::{HeaderValue, header::InvalidHeaderValue};

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::middleware::content_security_policy;

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("content security policy is not a valid header value: {0}")]
    InvalidPolicy(#[from] InvalidHeaderValue),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    content_security_policy: HeaderValue,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured image origin produces an invalid
    /// Content-Security-Policy header.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = CatalogClient::new(&config.catalog);
        let content_security_policy = HeaderValue::from_str(&content_security_policy(&config))?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                content_security_policy,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// The precomputed Content-Security-Policy header value.
    #[must_use]
    pub fn content_security_policy(&self) -> &HeaderValue {
        &self.inner.content_security_policy
    }
}
