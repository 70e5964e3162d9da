//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the shopper's session; every mutation re-renders
//! the affected fragment from the stored cart. Plain form posts are
//! redirected back so the flow works without script.

use askama::Template;
use askama_web::WebTemplate;
use attar_core::{Cart, CurrencyCode, format_amount};
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{CART_UPDATED_EVENT, Chrome, cart_store, chrome, is_htmx};
use crate::cart::Toast;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::set_toast_flash;
use crate::state::AppState;

/// Where plain form posts land when no return path is given.
const DEFAULT_RETURN_PATH: &str = "/cart";

/// Shown when the shopper presses checkout.
pub const CHECKOUT_NOTICE: &str = "Checkout flow not implemented. Cart preserved in your session.";

// =============================================================================
// Views
// =============================================================================

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub unit_price: String,
    pub qty: u32,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

fn format_price(amount: rust_decimal::Decimal) -> String {
    format_amount(CurrencyCode::INR, amount)
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView {
                    id: line.id.to_string(),
                    name: line.name.clone(),
                    unit_price: format_price(line.price),
                    qty: line.qty,
                    line_total: format_price(line.line_total()),
                })
                .collect(),
            total: format_price(cart.total()),
            item_count: cart.count(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    pub qty: Option<u32>,
    pub return_to: Option<String>,
}

/// Quantity change form data.
#[derive(Debug, Deserialize)]
pub struct AdjustCartForm {
    pub id: String,
    pub delta: i64,
    pub return_to: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
    pub return_to: Option<String>,
}

/// Only same-site absolute paths are followed; anything else goes to the cart.
///
/// Browsers read `\` as `/`, so any backslash could turn into a
/// protocol-relative `//host` and is refused.
fn return_path(return_to: Option<&str>) -> &str {
    return_to
        .filter(|path| {
            path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
        })
        .unwrap_or(DEFAULT_RETURN_PATH)
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub chrome: Chrome,
    pub cart: CartView,
    pub notice: Option<String>,
}

/// Cart overlay fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_overlay.html")]
pub struct CartOverlayTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Add-to-cart confirmation fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast.html")]
pub struct ToastTemplate {
    pub toast: Toast,
}

/// Checkout notice fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_notice.html")]
pub struct CheckoutNoticeTemplate {
    pub notice: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> CartShowTemplate {
    let store = cart_store(&state, session);
    let cart = store.load().await;

    CartShowTemplate {
        chrome: chrome(&state, &store).await,
        cart: CartView::from(&cart),
        notice: None,
    }
}

/// Cart overlay (HTMX).
#[instrument(skip(state, session))]
pub async fn overlay(State(state): State<AppState>, session: Session) -> CartOverlayTemplate {
    let cart = cart_store(&state, session).load().await;
    CartOverlayTemplate {
        cart: CartView::from(&cart),
    }
}

/// Add item to cart.
///
/// HTMX requests get the confirmation toast and a `cart-updated` trigger so
/// the badge refreshes. Plain posts carry the toast to the page they are
/// redirected to.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .find_by_id(&form.id)
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {}", form.id)))?;

    let store = cart_store(&state, session);
    let added = store
        .add(
            product.id.clone(),
            &product.name,
            product.price.amount,
            form.qty.unwrap_or(1),
        )
        .await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product.id.as_str())]),
    );
    tracing::info!(product_id = %product.id, count = added.cart.count(), "Added to cart");

    if is_htmx(&headers) {
        return Ok((
            AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
            ToastTemplate { toast: added.toast },
        )
            .into_response());
    }

    if let Err(e) = set_toast_flash(store.storage().session(), &added.toast.message).await {
        tracing::warn!(error = %e, "Failed to store toast flash");
    }

    Ok(Redirect::to(return_path(form.return_to.as_deref())).into_response())
}

/// Change a line's quantity by `delta`.
#[instrument(skip(state, session, headers))]
pub async fn adjust(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AdjustCartForm>,
) -> Result<Response> {
    if form.delta == 0 {
        return Err(AppError::BadRequest("delta must be non-zero".to_string()));
    }

    let cart = cart_store(&state, session)
        .adjust_qty(&form.id, form.delta)
        .await?;

    Ok(cart_response(&headers, &cart, form.return_to.as_deref()))
}

/// Remove a line from the cart.
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let cart = cart_store(&state, session).remove(&form.id).await?;
    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", form.id.as_str())]),
    );

    Ok(cart_response(&headers, &cart, form.return_to.as_deref()))
}

/// Re-rendered items for HTMX, otherwise a redirect back.
fn cart_response(headers: &HeaderMap, cart: &Cart, return_to: Option<&str>) -> Response {
    if is_htmx(headers) {
        (
            AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
            CartItemsTemplate {
                cart: CartView::from(cart),
            },
        )
            .into_response()
    } else {
        Redirect::to(return_path(return_to)).into_response()
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> CartCountTemplate {
    CartCountTemplate {
        count: cart_store(&state, session).count().await,
    }
}

/// Acknowledge checkout without touching the cart.
#[instrument(skip(state, session, headers))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Response {
    add_breadcrumb("cart", "Checkout requested", None);
    tracing::info!("Checkout requested, cart left in session");

    if is_htmx(&headers) {
        return CheckoutNoticeTemplate {
            notice: CHECKOUT_NOTICE.to_string(),
        }
        .into_response();
    }

    let store = cart_store(&state, session);
    let cart = store.load().await;
    CartShowTemplate {
        chrome: chrome(&state, &store).await,
        cart: CartView::from(&cart),
        notice: Some(CHECKOUT_NOTICE.to_string()),
    }
    .into_response()
}
