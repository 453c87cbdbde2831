//! Shopping cart container.
//!
//! The cart is an ordered list of entries, one per product. Entries keep the
//! order in which products were first added.
//!
//! # Invariants
//!
//! - At most one [`CartItem`] per [`ProductId`].
//! - Every entry has a quantity of at least 1; an entry whose quantity would
//!   drop to 0 is removed instead.
//!
//! Both invariants are re-checked when a cart is deserialized, so a tampered
//! or stale stored cart cannot reintroduce duplicates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CurrencyCode, Price, Product, ProductId};

/// Errors raised when rebuilding a cart from stored entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("product {0} appears more than once in the cart")]
    DuplicateProduct(ProductId),
    #[error("product {0} has a quantity of zero")]
    ZeroQuantity(ProductId),
}

/// A product in the cart together with how many units were selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// The product's identifier.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Result of [`Cart::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The product was not in the cart and now has quantity 1.
    Added,
    /// The product was already in the cart; holds the new quantity.
    Incremented(u32),
}

/// Result of [`Cart::decrement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decrement {
    /// Quantity went down and the entry stays; holds the new quantity.
    Decremented(u32),
    /// Quantity was 1, so the entry was taken out of the cart.
    Removed(CartItem),
    /// No entry for that product.
    NotInCart,
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Entries in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of entries (distinct products), as shown on the cart badge.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the entry for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Quantity of a product, or `None` when it is not in the cart.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> Option<u32> {
        self.get(id).map(|item| item.quantity)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Sum of all entry quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of all line totals, saturating at `Decimal::MAX`.
    ///
    /// Uses the currency of the first entry; an empty cart is zero USD.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let currency = self
            .items
            .first()
            .map_or(CurrencyCode::default(), |item| item.product.price.currency_code);

        self.items
            .iter()
            .fold(Price::zero(currency), |acc, item| acc.saturating_add(item.line_total()))
    }

    /// Add one unit of `product`.
    ///
    /// Creates a quantity-1 entry if the product is new to the cart, otherwise
    /// bumps the existing entry. The stored product is kept as first added.
    pub fn add(&mut self, product: Product) -> AddOutcome {
        match self.increment(product.id) {
            Some(quantity) => AddOutcome::Incremented(quantity),
            None => {
                self.items.push(CartItem {
                    product,
                    quantity: 1,
                });
                AddOutcome::Added
            }
        }
    }

    /// Add one unit of a product that is already in the cart.
    ///
    /// Returns the new quantity, or `None` if the product is not in the cart.
    pub fn increment(&mut self, id: ProductId) -> Option<u32> {
        let item = self.items.iter_mut().find(|item| item.id() == id)?;
        item.quantity = item.quantity.saturating_add(1);
        Some(item.quantity)
    }

    /// Take one unit of a product out of the cart.
    pub fn decrement(&mut self, id: ProductId) -> Decrement {
        let Some(index) = self.items.iter().position(|item| item.id() == id) else {
            return Decrement::NotInCart;
        };

        match self.items.get_mut(index) {
            Some(item) if item.quantity > 1 => {
                item.quantity -= 1;
                Decrement::Decremented(item.quantity)
            }
            Some(_) => Decrement::Removed(self.items.remove(index)),
            None => Decrement::NotInCart,
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        for (index, item) in items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(CartError::ZeroQuantity(item.id()));
            }
            if items.iter().skip(index + 1).any(|other| other.id() == item.id()) {
                return Err(CartError::DuplicateProduct(item.id()));
            }
        }
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
