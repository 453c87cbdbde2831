//! Session-scoped models for the storefront.

pub mod notification;
pub mod session;

pub use notification::Notification;
