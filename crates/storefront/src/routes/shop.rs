//! Shop page: the product grid and the cart modal.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use shopgrid_core::{Cart, Product};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::Notification;
use crate::models::notification::AUTO_CLOSE_MS;
use crate::models::session::{load_cart, take_notifications};
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Number of description characters shown on a product card.
const EXCERPT_CHARS: usize = 40;

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub title: String,
    pub thumbnail: String,
    pub excerpt: String,
    pub price: String,
    /// Quantity in the cart; `None` renders the "Add to cart" button.
    pub quantity: Option<u32>,
}

impl ProductCardView {
    fn new(product: &Product, cart: &Cart) -> Self {
        Self {
            id: product.id.as_i64(),
            title: product.title.clone(),
            thumbnail: product.thumbnail.clone(),
            excerpt: format!("{}...", product.description_excerpt(EXCERPT_CHARS)),
            price: product.price.to_string(),
            quantity: cart.quantity_of(product.id),
        }
    }
}

/// Toast display data for templates.
#[derive(Debug, Clone)]
pub struct ToastView {
    pub class: &'static str,
    pub message: String,
}

impl From<Notification> for ToastView {
    fn from(notification: Notification) -> Self {
        Self {
            class: notification.kind.css_class(),
            message: notification.message,
        }
    }
}

/// Shop page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ShopQuery {
    /// `open` shows the cart modal.
    pub cart: Option<String>,
}

impl ShopQuery {
    fn shows_cart(&self) -> bool {
        self.cart.as_deref() == Some("open")
    }
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopTemplate {
    pub products: Vec<ProductCardView>,
    pub cart: CartView,
    pub show_cart: bool,
    pub toasts: Vec<ToastView>,
    pub auto_close_ms: u32,
}

/// Display the product grid.
///
/// The catalog is fetched on every render. A catalog failure is logged and
/// the grid renders empty.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ShopQuery>,
) -> Result<impl IntoResponse> {
    let products = match state.catalog().get_products().await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!(error = %e, "Error fetching products");
            Vec::new()
        }
    };

    let cart = load_cart(&session).await?;
    let toasts = take_notifications(&session)
        .await?
        .into_iter()
        .map(ToastView::from)
        .collect();

    Ok(ShopTemplate {
        products: products
            .iter()
            .map(|product| ProductCardView::new(product, &cart))
            .collect(),
        cart: CartView::from(&cart),
        show_cart: query.shows_cart(),
        toasts,
        auto_close_ms: AUTO_CLOSE_MS,
    })
}
