//! Session-stored visitor state.
//!
//! The cart and pending notifications live in the visitor's session rather
//! than in any database: they are scoped to one browser and vanish when the
//! session expires or the process restarts.

use shopgrid_core::Cart;
use tower_sessions::Session;

use super::Notification;

/// Session keys for visitor data.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for notifications waiting to be shown on the next page render.
    pub const NOTIFICATIONS: &str = "notifications";
}

/// Load the visitor's cart, or an empty one if none is stored.
///
/// A stored cart that fails to decode (duplicate products, zero quantities)
/// is discarded rather than surfaced as an error.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    match session.get::<Cart>(keys::CART).await {
        Ok(cart) => Ok(cart.unwrap_or_default()),
        Err(tower_sessions::session::Error::SerdeJson(e)) => {
            tracing::warn!(error = %e, "Discarding unreadable cart from session");
            Ok(Cart::new())
        }
        Err(e) => Err(e),
    }
}

/// Store the visitor's cart.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// Queue a notification for the next page render.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
pub async fn push_notification(
    session: &Session,
    notification: Notification,
) -> Result<(), tower_sessions::session::Error> {
    let mut pending = session
        .get::<Vec<Notification>>(keys::NOTIFICATIONS)
        .await?
        .unwrap_or_default();
    pending.push(notification);
    session.insert(keys::NOTIFICATIONS, pending).await
}

/// Remove and return all queued notifications.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
pub async fn take_notifications(
    session: &Session,
) -> Result<Vec<Notification>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<Notification>>(keys::NOTIFICATIONS)
        .await?
        .unwrap_or_default())
}
