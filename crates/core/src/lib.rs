//! Shopgrid Core - Shared types library.
//!
//! This crate provides the domain types used by the Shopgrid storefront:
//! catalog products, prices, and the shopping cart.
//!
//! # Architecture
//!
//! The core crate contains only types and their pure operations - no I/O, no
//! HTTP clients, no session handling. The storefront crate loads and stores
//! these values; everything here can be tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, and the cart container

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
