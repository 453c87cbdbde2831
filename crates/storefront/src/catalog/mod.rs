//! Remote product catalog client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP GET using `reqwest`
//! - The catalog is the source of truth; nothing is cached or synced locally
//! - Wire records (`types`) are converted into `shopgrid_core` types (`conversions`)
//!
//! # Endpoints
//!
//! - `GET {endpoint}` returns `{"products": [...], "total": .., "skip": .., "limit": ..}`
//! - `GET {endpoint}/{id}` returns a single product record
//!
//! # Example
//!
//! ```rust,ignore
//! use shopgrid_storefront::catalog::CatalogClient;
//!
//! let catalog = CatalogClient::new(&config.catalog);
//! let products = catalog.get_products().await?;
//! let product = catalog.get_product(products[0].id).await?;
//! ```

mod conversions;
pub mod types;

use std::sync::Arc;

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use shopgrid_core::{Product, ProductId};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::CatalogConfig;

use types::{ProductList, ProductRecord};

/// How much of an unexpected response body is kept for diagnostics.
const BODY_SNIPPET_CHARS: usize = 200;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog has no product with this ID.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The catalog listed a price the storefront will not sell at.
    #[error("product {id} has an out-of-range price {price}")]
    InvalidPrice { id: ProductId, price: Decimal },
}

/// Client for the remote product catalog.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint.clone(),
            }),
        }
    }

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a
    /// non-success status, or the body is not a product list. Products with
    /// an out-of-range price are skipped.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn get_products(&self) -> Result<Vec<Product>, CatalogError> {
        let list: ProductList = self.get_json(self.inner.endpoint.clone()).await?;

        tracing::debug!(
            count = list.products.len(),
            total = ?list.total,
            "Fetched product list"
        );

        Ok(list
            .products
            .into_iter()
            .filter_map(|record| match Product::try_from(record) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping catalog product");
                    None
                }
            })
            .collect())
    }

    /// Fetch a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if the API answers 404,
    /// `CatalogError::InvalidPrice` for an out-of-range price, or another
    /// error if the request or decoding fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        match self.get_json::<ProductRecord>(self.product_url(id)).await {
            Ok(record) => Product::try_from(record),
            Err(CatalogError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(CatalogError::ProductNotFound(id))
            }
            Err(e) => Err(e),
        }
    }

    /// URL of a single product: the list endpoint with the ID appended and
    /// any query string dropped.
    fn product_url(&self, id: ProductId) -> Url {
        let mut url = self.inner.endpoint.clone();
        url.set_query(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self
            .inner
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %snippet(&response_text),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: snippet(&response_text),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %snippet(&response_text),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_CHARS).collect()
}
