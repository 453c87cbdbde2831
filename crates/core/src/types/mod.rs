//! Core types for Shopgrid.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{AddOutcome, Cart, CartError, CartItem, Decrement};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::Product;
