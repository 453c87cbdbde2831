//! Wire types returned by the catalog API.
//!
//! Only the fields the storefront renders are decoded; everything else in the
//! payload (ratings, stock, images, ...) is ignored.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Response body of the product list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductList {
    pub products: Vec<ProductRecord>,
    /// Total number of products the catalog holds (may exceed `products.len()`).
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub skip: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// A product record as the catalog API serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    #[serde(default)]
    pub thumbnail: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
}
