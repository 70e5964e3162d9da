//! Integration tests for the session-backed cart.
//!
//! Each test is one shopper: the session cookie issued by the first write is
//! replayed on every following request.

use attar_integration_tests::TestApp;
use axum::http::StatusCode;

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn test_htmx_add_returns_toast_and_trigger() {
    let mut app = TestApp::new();

    let resp = app.htmx_post("/cart/add", "id=amplifier").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("hx-trigger"), Some("cart-updated"));
    assert!(resp.body.contains("Amplifier added to cart"));
    assert!(resp.body.contains("delay:1500ms"));
    assert!(app.has_session());
}

#[tokio::test]
async fn test_add_persists_across_requests() {
    let mut app = TestApp::new();

    app.htmx_post("/cart/add", "id=amplifier").await;
    app.htmx_post("/cart/add", "id=amplifier&qty=2").await;

    let count = app.htmx_get("/cart/count").await;
    assert!(count.body.contains(">3</span>"), "{}", count.body);

    let cart = app.get("/cart").await;
    assert_eq!(cart.status, StatusCode::OK);
    assert!(cart.body.contains("₹1,499 each"));
    assert!(cart.body.contains("Total: ₹4,497"));
    assert_eq!(cart.body.matches("class=\"cart-item\"").count(), 1);
}

#[tokio::test]
async fn test_plain_add_redirects_back() {
    let mut app = TestApp::new();

    let resp = app.post_form("/cart/add", "id=amplifier&return_to=%2Fproducts").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.header("location"), Some("/products"));

    let resp = app.post_form("/cart/add", "id=amplifier").await;
    assert_eq!(resp.header("location"), Some("/cart"));

    let resp = app
        .post_form("/cart/add", "id=amplifier&return_to=https%3A%2F%2Fevil.example")
        .await;
    assert_eq!(resp.header("location"), Some("/cart"));

    let resp = app
        .post_form("/cart/add", "id=amplifier&return_to=%2F%5Cevil.example")
        .await;
    assert_eq!(resp.header("location"), Some("/cart"));
}

#[tokio::test]
async fn test_plain_add_shows_toast_on_next_page() {
    let mut app = TestApp::new();

    app.post_form("/cart/add", "id=amplifier&return_to=%2Fproducts").await;

    let page = app.get("/products").await;
    assert!(page.body.contains("Amplifier added to cart"));
    assert!(page.body.contains("hx-get=\"/toast/dismiss\""));

    // Shown once.
    let page = app.get("/products").await;
    assert!(!page.body.contains("added to cart"));
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let mut app = TestApp::new();

    let resp = app.htmx_post("/cart/add", "id=no-such-thing").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let count = app.htmx_get("/cart/count").await;
    assert!(count.body.contains(">0</span>"));
}

#[tokio::test]
async fn test_add_zero_quantity_is_rejected() {
    let mut app = TestApp::new();

    let resp = app.htmx_post("/cart/add", "id=amplifier&qty=0").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let cart = app.get("/cart").await;
    assert!(cart.body.contains("Your cart is empty."));
}

// =============================================================================
// Adjust and Remove
// =============================================================================

#[tokio::test]
async fn test_adjust_to_zero_removes_line() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "id=amplifier&qty=2").await;
    app.htmx_post("/cart/add", "id=perfumed-roll-on").await;

    let resp = app.htmx_post("/cart/adjust", "id=amplifier&delta=-1").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("hx-trigger"), Some("cart-updated"));
    assert!(resp.body.contains("Total: ₹2,498"));

    let resp = app.htmx_post("/cart/adjust", "id=amplifier&delta=-1").await;
    assert!(!resp.body.contains("data-id=\"amplifier\""));
    assert!(resp.body.contains("data-id=\"perfumed-roll-on\""));
    assert!(resp.body.contains("Total: ₹999"));

    let count = app.htmx_get("/cart/count").await;
    assert!(count.body.contains(">1</span>"));
}

#[tokio::test]
async fn test_adjust_missing_line_is_noop() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "id=amplifier").await;

    let resp = app.htmx_post("/cart/adjust", "id=eau-de-parfum&delta=1").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(!resp.body.contains("data-id=\"eau-de-parfum\""));
    assert!(resp.body.contains("Total: ₹1,499"));
}

#[tokio::test]
async fn test_zero_delta_is_rejected() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "id=amplifier").await;

    let resp = app.htmx_post("/cart/adjust", "id=amplifier&delta=0").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let count = app.htmx_get("/cart/count").await;
    assert!(count.body.contains(">1</span>"));
}

#[tokio::test]
async fn test_remove_line() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "id=amplifier&qty=3").await;

    let resp = app.htmx_post("/cart/remove", "id=amplifier").await;
    assert!(resp.body.contains("Your cart is empty."));
    assert!(resp.body.contains("Total: ₹0"));

    // Removing again leaves the empty cart as is.
    let resp = app.htmx_post("/cart/remove", "id=amplifier").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_plain_adjust_redirects_to_cart() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "id=amplifier").await;

    let resp = app.post_form("/cart/adjust", "id=amplifier&delta=1").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.header("location"), Some("/cart"));

    let cart = app.get("/cart").await;
    assert!(cart.body.contains("Total: ₹2,998"));
}

// =============================================================================
// Views
// =============================================================================

#[tokio::test]
async fn test_empty_cart_overlay() {
    let mut app = TestApp::new();

    let resp = app.htmx_get("/cart/overlay").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Your cart is empty."));
    assert!(resp.body.contains("Total: ₹0"));
    assert!(resp.body.contains("id=\"checkout-btn\""));
}

#[tokio::test]
async fn test_checkout_keeps_cart() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "id=miss-giordani").await;

    let resp = app.htmx_post("/cart/checkout", "").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(
        resp.body
            .contains("Checkout flow not implemented. Cart preserved in your session.")
    );

    let plain = app.post_form("/cart/checkout", "").await;
    assert_eq!(plain.status, StatusCode::OK);
    assert!(plain.body.contains("Cart preserved in your session."));
    assert!(plain.body.contains("₹3,499 each"));

    let count = app.htmx_get("/cart/count").await;
    assert!(count.body.contains(">1</span>"));
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let mut first = TestApp::new();
    first.htmx_post("/cart/add", "id=amplifier").await;

    let mut second = first.another_shopper();
    let count = second.htmx_get("/cart/count").await;
    assert!(count.body.contains(">0</span>"));
}
