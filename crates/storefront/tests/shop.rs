//! End-to-end tests for the shop page and cart routes.
//!
//! Each test starts a stub catalog API on a random local port and drives the
//! storefront router in-process with `tower::ServiceExt::oneshot`, carrying
//! the session cookie between requests like a browser would.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::path::PathBuf;

use axum::{
    Json, Router,
    body::Body,
    extract::Path,
    http::{HeaderMap, Request, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use shopgrid_storefront::build_router;
use shopgrid_storefront::config::{CatalogConfig, StorefrontConfig};
use shopgrid_storefront::state::AppState;
use tower::ServiceExt;
use url::Url;

const IMAGE_ORIGIN: &str = "https://cdn.catalog.test";

fn catalog_products() -> Value {
    json!([
        {
            "id": 1,
            "title": "Essence Mascara",
            "description": "The Essence Mascara Lash Princess is a popular mascara known for its volumizing effects.",
            "price": 9.99,
            "stock": 5,
            "thumbnail": "https://cdn.catalog.test/products/1/thumbnail.png"
        },
        {
            "id": 2,
            "title": "Eyeshadow Palette",
            "description": "A versatile palette.",
            "price": 19.99,
            "thumbnail": "https://cdn.catalog.test/products/2/thumbnail.png"
        },
        {
            "id": 3,
            "title": "Powder Canister",
            "description": "Finishing powder for a matte look.",
            "price": 14.99,
            "thumbnail": "https://cdn.catalog.test/products/3/thumbnail.png"
        }
    ])
}

async fn list_products() -> Json<Value> {
    Json(json!({
        "products": catalog_products(),
        "total": 3,
        "skip": 0,
        "limit": 30
    }))
}

async fn get_product(Path(id): Path<i64>) -> axum::response::Response {
    let products = catalog_products();
    let found = products
        .as_array()
        .and_then(|all| all.iter().find(|p| p["id"] == id))
        .cloned();

    match found {
        Some(product) => Json(product).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("Product with id '{id}' not found") })),
        )
            .into_response(),
    }
}

/// Serve `app` on a random local port and return the catalog endpoint URL.
async fn serve(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/products")).unwrap()
}

async fn spawn_catalog() -> Url {
    serve(
        Router::new()
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product)),
    )
    .await
}

/// A catalog whose list endpoint answers 200 with a fixed `body`.
async fn spawn_catalog_answering(body: &'static str) -> Url {
    serve(Router::new().route(
        "/products",
        get(move || async move { ([(header::CONTENT_TYPE, "application/json")], body) }),
    ))
    .await
}

async fn spawn_broken_catalog() -> Url {
    serve(Router::new().route(
        "/products",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream down") }),
    ))
    .await
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl TestResponse {
    fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

/// A browser-like client: one router, one session cookie.
struct Visitor {
    app: Router,
    cookie: Option<String>,
}

impl Visitor {
    fn new(endpoint: Url) -> Self {
        let config = StorefrontConfig {
            catalog: CatalogConfig {
                endpoint,
                image_origin: IMAGE_ORIGIN.to_string(),
            },
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
            ..StorefrontConfig::default()
        };

        Self {
            app: build_router(AppState::new(config).unwrap()),
            cookie: None,
        }
    }

    async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default();
            if !pair.ends_with('=') {
                self.cookie = Some(pair.to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post(&mut self, uri: &str, form: &str) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
    }
}

// ============================================================================
// Shop page
// ============================================================================

#[tokio::test]
async fn shop_page_lists_catalog_products() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    let page = visitor.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Essence Mascara"));
    assert!(page.body.contains("Eyeshadow Palette"));
    assert!(page.body.contains("Powder Canister"));
    assert!(page.body.contains("$9.99"));
    assert!(
        page.body
            .contains("The Essence Mascara Lash Princess is a p...")
    );
    assert_eq!(page.body.matches("Add to cart").count(), 3);
    assert!(page.body.contains("Cart (0)"));
    assert!(!page.body.contains("cart-modal"));
}

#[tokio::test]
async fn shop_page_sets_security_and_request_id_headers() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    let page = visitor.get("/").await;
    let csp = page.headers[header::CONTENT_SECURITY_POLICY]
        .to_str()
        .unwrap();
    assert!(csp.contains(IMAGE_ORIGIN));
    assert_eq!(page.headers[header::X_FRAME_OPTIONS], "DENY");
    assert!(page.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn upstream_request_id_is_echoed() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    let response = visitor
        .send(
            Request::get("/health")
                .header("x-request-id", "edge-1234")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.headers["x-request-id"], "edge-1234");
}

#[tokio::test]
async fn catalog_failure_renders_empty_grid() {
    let mut visitor = Visitor::new(spawn_broken_catalog().await);

    let page = visitor.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(!page.body.contains("product-card__title"));
    assert!(page.body.contains("Cart (0)"));
}

#[tokio::test]
async fn undecodable_catalog_renders_empty_grid() {
    for body in [r#"{"items": []}"#, "not json"] {
        let mut visitor = Visitor::new(spawn_catalog_answering(body).await);

        let page = visitor.get("/").await;
        assert_eq!(page.status, StatusCode::OK, "body: {body}");
        assert!(!page.body.contains("product-card__title"), "body: {body}");
        assert!(page.body.contains("Cart (0)"));
    }
}

#[tokio::test]
async fn out_of_range_prices_are_left_off_the_grid() {
    let endpoint = spawn_catalog_answering(
        r#"{"products": [
            {"id": 1, "title": "Essence Mascara", "price": 9.99},
            {"id": 2, "title": "Gold Bar", "price": 5e28}
        ]}"#,
    )
    .await;
    let mut visitor = Visitor::new(endpoint);

    let page = visitor.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Essence Mascara"));
    assert!(!page.body.contains("Gold Bar"));
}

#[tokio::test]
async fn unreachable_catalog_renders_empty_grid() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint = Url::parse(&format!("http://{addr}/products")).unwrap();
    let mut visitor = Visitor::new(endpoint);

    let page = visitor.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(!page.body.contains("product-card__title"));
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn first_add_creates_quantity_one_entry_and_notifies() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    let response = visitor.post("/cart/add", "product_id=1").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/#product-1");

    let page = visitor.get("/").await;
    assert!(page.body.contains(r#"class="quantity">1<"#));
    assert!(page.body.contains("Cart (1)"));
    assert!(page.body.contains("Essence Mascara added to cart!"));
    assert_eq!(page.body.matches("Add to cart").count(), 2);

    // Notifications are shown once
    let page = visitor.get("/").await;
    assert!(!page.body.contains("added to cart!"));
}

#[tokio::test]
async fn second_add_increments_without_notification() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    visitor.post("/cart/add", "product_id=1").await;
    visitor.get("/").await;
    visitor.post("/cart/add", "product_id=1").await;

    let page = visitor.get("/").await;
    assert!(page.body.contains(r#"class="quantity">2<"#));
    assert!(page.body.contains("Cart (1)"));
    assert!(!page.body.contains("added to cart!"));
}

#[tokio::test]
async fn decrement_from_one_removes_entry_and_notifies() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    visitor.post("/cart/add", "product_id=2").await;
    visitor.get("/").await;

    let response = visitor.post("/cart/remove", "product_id=2").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let page = visitor.get("/").await;
    assert!(page.body.contains("Eyeshadow Palette removed from cart!"));
    assert!(page.body.contains("Cart (0)"));
    assert_eq!(page.body.matches("Add to cart").count(), 3);
}

#[tokio::test]
async fn decrement_above_one_keeps_entry_silently() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    visitor.post("/cart/add", "product_id=3").await;
    visitor.post("/cart/add", "product_id=3").await;
    visitor.get("/").await;
    visitor.post("/cart/remove", "product_id=3").await;

    let page = visitor.get("/").await;
    assert!(page.body.contains(r#"class="quantity">1<"#));
    assert!(!page.body.contains("removed from cart!"));
}

#[tokio::test]
async fn removing_unknown_product_is_a_noop() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    visitor.post("/cart/add", "product_id=1").await;
    let response = visitor.post("/cart/remove", "product_id=99").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let count = visitor.get("/cart/count").await;
    assert!(count.body.contains("Cart (1)"));
}

#[tokio::test]
async fn count_equals_number_of_entries() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    visitor.post("/cart/add", "product_id=1").await;
    visitor.post("/cart/add", "product_id=2").await;
    visitor.post("/cart/add", "product_id=1").await;
    visitor.post("/cart/add", "product_id=1").await;

    let count = visitor.get("/cart/count").await;
    assert_eq!(count.status, StatusCode::OK);
    assert!(count.body.contains("Cart (2)"));
}

#[tokio::test]
async fn adding_unknown_product_is_not_found() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    let response = visitor.post("/cart/add", "product_id=404").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let count = visitor.get("/cart/count").await;
    assert!(count.body.contains("Cart (0)"));
}

#[tokio::test]
async fn malformed_product_id_is_rejected() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    let response = visitor.post("/cart/add", "product_id=abc").await;
    assert!(response.status.is_client_error());
}

// ============================================================================
// Cart modal
// ============================================================================

#[tokio::test]
async fn modal_shows_shared_cart_and_hides_cart_button() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    visitor.post("/cart/add", "product_id=1").await;
    let response = visitor
        .post("/cart/add", "product_id=1&return_to=cart")
        .await;
    assert_eq!(response.location(), "/?cart=open");

    let page = visitor.get("/?cart=open").await;
    assert!(page.body.contains(r#"class="cart-modal""#));
    assert!(page.body.contains(r#"class="cart-line__quantity">2<"#));
    assert!(page.body.contains("Items: 2"));
    assert!(page.body.contains("Subtotal: $19.98"));
    assert!(!page.body.contains("Cart (1)"));

    // Grid behind the modal reads the same cart
    assert!(page.body.contains(r#"class="quantity">2<"#));
}

#[tokio::test]
async fn empty_modal_says_so() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    let page = visitor.get("/?cart=open").await;
    assert!(page.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn clear_empties_cart_and_returns_to_modal() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    visitor.post("/cart/add", "product_id=1").await;
    visitor.post("/cart/add", "product_id=2").await;

    let response = visitor.post("/cart/clear", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/?cart=open");

    let count = visitor.get("/cart/count").await;
    assert!(count.body.contains("Cart (0)"));
}

#[tokio::test]
async fn visitors_do_not_share_carts() {
    let endpoint = spawn_catalog().await;
    let mut alice = Visitor::new(endpoint);
    alice.post("/cart/add", "product_id=1").await;

    // Same app, no cookie
    let mut bob = Visitor {
        app: alice.app.clone(),
        cookie: None,
    };
    let count = bob.get("/cart/count").await;
    assert!(count.body.contains("Cart (0)"));

    let count = alice.get("/cart/count").await;
    assert!(count.body.contains("Cart (1)"));
}

// ============================================================================
// Misc
// ============================================================================

#[tokio::test]
async fn health_and_unknown_routes() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    let health = visitor.get("/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body, "ok");

    let missing = visitor.get("/checkout").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_stylesheet_is_served() {
    let mut visitor = Visitor::new(spawn_catalog().await);

    let css = visitor.get("/static/css/main.css").await;
    assert_eq!(css.status, StatusCode::OK);
    assert!(css.body.contains(".product-grid"));
}
