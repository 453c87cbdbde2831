//! Conversions from catalog wire records to core types.

use rust_decimal::Decimal;
use shopgrid_core::{Price, Product, ProductId};

use super::CatalogError;
use super::types::ProductRecord;

/// Largest unit price accepted from the catalog, in dollars.
const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Catalog prices are plain numbers in US dollars.
///
/// Negative prices and prices above [`MAX_UNIT_PRICE`] are rejected.
impl TryFrom<ProductRecord> for Product {
    type Error = CatalogError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let id = ProductId::new(record.id);

        if record.price < Decimal::ZERO || record.price > MAX_UNIT_PRICE {
            return Err(CatalogError::InvalidPrice {
                id,
                price: record.price,
            });
        }

        Ok(Self {
            id,
            thumbnail: record.thumbnail,
            title: record.title,
            description: record.description,
            price: Price::usd(record.price),
        })
    }
}
