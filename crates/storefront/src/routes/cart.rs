//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Every mutation is a form POST
//! that redirects back to the page it came from (the product grid or the
//! open cart modal), so the page always re-renders from session state.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use shopgrid_core::{Cart, CartItem, Decrement, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::models::Notification;
use crate::models::session::{load_cart, push_notification, save_cart};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: i64,
    pub title: String,
    pub thumbnail: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    /// Number of entries, as shown on the "Cart (N)" badge.
    pub count: usize,
    pub total_quantity: u32,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id().as_i64(),
            title: item.product.title.clone(),
            thumbnail: item.product.thumbnail.clone(),
            quantity: item.quantity,
            price: item.product.price.to_string(),
            line_price: item.line_total().to_string(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal().to_string(),
            count: cart.len(),
            total_quantity: cart.total_quantity(),
        }
    }
}

/// Where to send the visitor after a cart change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnTo {
    /// Back to the product card in the grid.
    #[default]
    Shop,
    /// Back to the open cart modal.
    Cart,
}

impl ReturnTo {
    fn location(self, product_id: Option<ProductId>) -> String {
        match (self, product_id) {
            (Self::Shop, Some(id)) => format!("/#product-{id}"),
            (Self::Shop, None) => "/".to_string(),
            (Self::Cart, _) => "/?cart=open".to_string(),
        }
    }
}

/// Add / remove form data.
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub product_id: ProductId,
    #[serde(default)]
    pub return_to: ReturnTo,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

/// Add one unit of a product to the cart.
///
/// A product already in the cart is incremented silently. A new product is
/// fetched from the catalog, added with quantity 1, and announced with a
/// notification.
#[instrument(skip(state, session), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartLineForm>,
) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;

    if let Some(quantity) = cart.increment(form.product_id) {
        tracing::debug!(quantity, "Incremented cart entry");
    } else {
        let product = state.catalog().get_product(form.product_id).await?;
        push_notification(&session, Notification::added(&product.title)).await?;
        cart.add(product);
        tracing::info!(entries = cart.len(), "Added product to cart");
    }

    save_cart(&session, &cart).await?;

    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Added product", Some(&[("product_id", product_id.as_str())]));

    Ok(Redirect::to(&form.return_to.location(Some(form.product_id))))
}

/// Take one unit of a product out of the cart.
///
/// Removing the last unit drops the entry and queues a notification.
/// Unknown products are ignored.
#[instrument(skip(session), fields(product_id = %form.product_id))]
pub async fn remove(session: Session, Form(form): Form<CartLineForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;

    match cart.decrement(form.product_id) {
        Decrement::Decremented(quantity) => {
            tracing::debug!(quantity, "Decremented cart entry");
        }
        Decrement::Removed(item) => {
            push_notification(&session, Notification::removed(&item.product.title)).await?;
            tracing::info!(entries = cart.len(), "Removed product from cart");
        }
        Decrement::NotInCart => {
            tracing::debug!("Product not in cart, nothing to remove");
        }
    }

    save_cart(&session, &cart).await?;

    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Removed product", Some(&[("product_id", product_id.as_str())]));

    Ok(Redirect::to(&form.return_to.location(Some(form.product_id))))
}

/// Empty the cart and return to the cart modal.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    let dropped = cart.len();
    cart.clear();
    save_cart(&session, &cart).await?;

    tracing::info!(dropped, "Cleared cart");
    add_breadcrumb("cart", "Cleared cart", None);

    Ok(Redirect::to(&ReturnTo::Cart.location(None)))
}

/// Cart count badge fragment.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    Ok(CartCountTemplate { count: cart.len() })
}
