//! Catalog product.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as listed in the catalog.
///
/// Products are immutable once fetched; the storefront re-fetches the whole
/// catalog rather than patching individual entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Absolute URL of the product thumbnail image.
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub price: Price,
}

impl Product {
    /// The first `max_chars` characters of the description.
    ///
    /// Cuts on character boundaries, never inside a multi-byte sequence.
    #[must_use]
    pub fn description_excerpt(&self, max_chars: usize) -> &str {
        match self.description.char_indices().nth(max_chars) {
            Some((byte_index, _)) => self.description.get(..byte_index).unwrap_or_default(),
            None => &self.description,
        }
    }
}
