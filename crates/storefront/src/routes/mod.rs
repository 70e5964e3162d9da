//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Home page (carousel, featured strip, catalog)
//! GET  /carousel/{index}            - Carousel fragment (HTMX)
//! GET  /health                      - Health check
//!
//! # Catalog
//! GET  /products                    - Catalog page (?filter=)
//! GET  /products/grid               - Filter controls + grid fragment (HTMX, ?filter=)
//! GET  /category/{tag}              - Dedicated category page (default filter = tag)
//! GET  /products/{id}               - Product detail page (?image=)
//! GET  /products/{id}/quick-view    - Product detail overlay fragment (HTMX, ?image=)
//!
//! # Cart
//! GET  /cart                        - Cart page
//! GET  /cart/overlay                - Cart overlay fragment (HTMX)
//! POST /cart/add                    - Add to cart (toast fragment, triggers cart-updated)
//! POST /cart/adjust                 - Change quantity (cart_items fragment)
//! POST /cart/remove                 - Remove line (cart_items fragment)
//! POST /cart/checkout               - Checkout notice, cart untouched
//! GET  /cart/count                  - Cart count badge (fragment)
//!
//! # Overlays
//! GET  /overlay/close               - Empty fragment that clears an overlay
//! GET  /toast/dismiss               - Empty fragment that removes a toast
//! ```

pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router,
    http::HeaderMap,
    response::Html,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::cart::{CartStore, SessionCartStorage, Toast};
use crate::models::take_toast_flash;
use crate::state::AppState;

/// Header htmx sets on every request it issues.
const HX_REQUEST_HEADER: &str = "hx-request";

/// Event name the cart badge listens for.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Navigation and badge data every full page renders.
#[derive(Clone)]
pub struct Chrome {
    pub cart_count: u64,
    pub categories: Vec<NavLink>,
    /// Notice carried over from a plain add-to-cart redirect.
    pub toast: Option<Toast>,
}

/// A header navigation link.
#[derive(Clone)]
pub struct NavLink {
    pub href: String,
    pub label: String,
}

/// Create the cart store for a request's session.
#[must_use]
pub fn cart_store(state: &AppState, session: Session) -> CartStore<SessionCartStorage> {
    CartStore::new(SessionCartStorage::new(session), state.ui().toast_lifetime)
}

/// Build the page chrome, reading the badge count from the cart store and
/// taking any pending add-to-cart notice.
pub async fn chrome(state: &AppState, store: &CartStore<SessionCartStorage>) -> Chrome {
    let toast = take_toast_flash(store.storage().session())
        .await
        .map(|message| Toast {
            message,
            lifetime: state.ui().toast_lifetime,
        });

    Chrome {
        cart_count: store.count().await,
        toast,
        categories: state
            .catalog()
            .categories()
            .iter()
            .map(|category| NavLink {
                href: format!("/category/{category}"),
                label: label_for(category.as_str()),
            })
            .collect(),
    }
}

/// Human label for a category tag: first letter upper-cased.
#[must_use]
pub fn label_for(tag: &str) -> String {
    let mut chars = tag.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Whether the request came from htmx rather than a plain form or link.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key(HX_REQUEST_HEADER)
}

/// Empty fragment used to clear an overlay or toast.
pub async fn empty_fragment() -> Html<&'static str> {
    Html("")
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/grid", get(products::grid))
        .route("/{id}", get(products::show))
        .route("/{id}/quick-view", get(products::quick_view))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/overlay", get(cart::overlay))
        .route("/add", post(cart::add))
        .route("/adjust", post(cart::adjust))
        .route("/remove", post(cart::remove))
        .route("/checkout", post(cart::checkout))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page and carousel
        .route("/", get(home::home))
        .route("/carousel/{index}", get(home::carousel))
        // Catalog
        .nest("/products", product_routes())
        .route("/category/{tag}", get(products::category))
        // Cart
        .nest("/cart", cart_routes())
        // Overlay housekeeping
        .route("/overlay/close", get(empty_fragment))
        .route("/toast/dismiss", get(empty_fragment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_label_for() {
        assert_eq!(label_for("fragrance"), "Fragrance");
        assert_eq!(label_for("all"), "All");
        assert_eq!(label_for(""), "");
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert(HX_REQUEST_HEADER, HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }
}
