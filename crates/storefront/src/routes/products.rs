//! Product route handlers: catalog grid, category pages and product detail.

use askama::Template;
use askama_web::WebTemplate;
use attar_core::{CategoryFilter, Product};
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{Chrome, cart_store, chrome, label_for};
use crate::catalog::Catalog;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

// =============================================================================
// Page Context
// =============================================================================

/// Where a page's initial filter comes from.
///
/// The `?filter=` query parameter wins over the page's own default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub query_filter: Option<String>,
    pub default_filter: Option<String>,
}

/// Outcome of resolving a [`PageContext`] against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilter {
    /// Slice of the catalog to show.
    pub filter: CategoryFilter,
    /// Control to highlight. `None` when the requested tag matched no control.
    pub active: Option<CategoryFilter>,
}

impl PageContext {
    /// Build a context, treating empty values as absent.
    #[must_use]
    pub fn new(query_filter: Option<String>, default_filter: Option<String>) -> Self {
        Self {
            query_filter: query_filter.filter(|tag| !tag.is_empty()),
            default_filter: default_filter.filter(|tag| !tag.is_empty()),
        }
    }

    /// The tag the page asks for, if any.
    #[must_use]
    pub fn requested_tag(&self) -> Option<&str> {
        self.query_filter
            .as_deref()
            .or(self.default_filter.as_deref())
    }

    /// Resolve the requested tag. Unknown tags show the whole catalog with
    /// no control highlighted.
    #[must_use]
    pub fn resolve(&self, catalog: &Catalog) -> ResolvedFilter {
        let Some(tag) = self.requested_tag() else {
            return ResolvedFilter {
                filter: CategoryFilter::All,
                active: Some(CategoryFilter::All),
            };
        };

        match catalog.resolve_filter(tag) {
            Some(filter) => ResolvedFilter {
                active: Some(filter.clone()),
                filter,
            },
            None => {
                tracing::debug!(tag, "Unknown filter, showing full catalog");
                ResolvedFilter {
                    filter: CategoryFilter::All,
                    active: None,
                }
            }
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub buy_url: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.to_string(),
            image_url: product.primary_image().unwrap_or_default().to_string(),
            buy_url: product.buy_url.clone(),
        }
    }
}

/// A filter selection control.
#[derive(Clone)]
pub struct FilterControlView {
    pub tag: String,
    pub label: String,
    pub is_active: bool,
}

/// Filter controls plus the grid they drive.
///
/// Always rebuilt from scratch for the current filter.
#[derive(Clone)]
pub struct CatalogView {
    pub filters: Vec<FilterControlView>,
    pub products: Vec<ProductCardView>,
}

impl CatalogView {
    /// Render the catalog slice selected by `context`.
    #[must_use]
    pub fn new(catalog: &Catalog, context: &PageContext) -> Self {
        let resolved = context.resolve(catalog);

        let filters = std::iter::once(CategoryFilter::All)
            .chain(catalog.categories().iter().cloned().map(CategoryFilter::Only))
            .map(|filter| FilterControlView {
                tag: filter.tag().to_string(),
                label: label_for(filter.tag()),
                is_active: resolved.active.as_ref() == Some(&filter),
            })
            .collect();

        Self {
            filters,
            products: catalog
                .filter(&resolved.filter)
                .into_iter()
                .map(ProductCardView::from)
                .collect(),
        }
    }
}

/// Gallery thumbnail.
#[derive(Clone)]
pub struct ThumbnailView {
    pub index: usize,
    pub url: String,
    pub is_active: bool,
}

/// Product detail display data for templates.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub description: String,
    pub ingredients: String,
    pub buy_url: String,
    pub main_image: String,
    /// Empty unless the product has more than one image.
    pub thumbnails: Vec<ThumbnailView>,
    /// Rendered inside the overlay rather than as a page.
    pub in_modal: bool,
}

impl ProductDetailView {
    /// Render `product` with gallery image `image` as primary.
    ///
    /// A missing or out-of-range index shows the first image.
    #[must_use]
    pub fn new(product: &Product, image: Option<usize>, in_modal: bool) -> Self {
        let selected = image
            .filter(|&index| index < product.images.len())
            .unwrap_or(0);

        let thumbnails = if product.has_gallery() {
            product
                .images
                .iter()
                .enumerate()
                .map(|(index, url)| ThumbnailView {
                    index,
                    url: url.clone(),
                    is_active: index == selected,
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            ingredients: product.ingredients.clone(),
            buy_url: product.buy_url.clone(),
            main_image: product
                .images
                .get(selected)
                .cloned()
                .unwrap_or_default(),
            thumbnails,
            in_modal,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Filter query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub filter: Option<String>,
}

/// Gallery image query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct ImageQuery {
    pub image: Option<usize>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub chrome: Chrome,
    pub heading: String,
    pub catalog: CatalogView,
}

/// Filter controls and grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/catalog.html")]
pub struct CatalogTemplate {
    pub catalog: CatalogView,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub chrome: Chrome,
    pub product: ProductDetailView,
}

/// Quick view fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/quick_view.html")]
pub struct QuickViewTemplate {
    pub product: ProductDetailView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display product listing page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<FilterQuery>,
) -> ProductsIndexTemplate {
    let store = cart_store(&state, session);
    let context = PageContext::new(query.filter, None);

    ProductsIndexTemplate {
        chrome: chrome(&state, &store).await,
        heading: "Shop".to_string(),
        catalog: CatalogView::new(state.catalog(), &context),
    }
}

/// Display a category page, filtered to `tag` unless the query overrides it.
#[instrument(skip(state, session))]
pub async fn category(
    State(state): State<AppState>,
    session: Session,
    Path(tag): Path<String>,
    Query(query): Query<FilterQuery>,
) -> ProductsIndexTemplate {
    let store = cart_store(&state, session);
    let heading = label_for(&tag);
    let context = PageContext::new(query.filter, Some(tag));

    ProductsIndexTemplate {
        chrome: chrome(&state, &store).await,
        heading,
        catalog: CatalogView::new(state.catalog(), &context),
    }
}

/// Re-render filter controls and grid for a filter selection (HTMX).
#[instrument(skip(state))]
pub async fn grid(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> CatalogTemplate {
    let context = PageContext::new(query.filter, None);
    CatalogTemplate {
        catalog: CatalogView::new(state.catalog(), &context),
    }
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Query(query): Query<ImageQuery>,
) -> Result<ProductShowTemplate> {
    let product = find_product(&state, &id)?;
    let product = ProductDetailView::new(product, query.image, false);
    let store = cart_store(&state, session);

    Ok(ProductShowTemplate {
        chrome: chrome(&state, &store).await,
        product,
    })
}

/// Display quick view fragment (for HTMX).
///
/// Replaces whatever the overlay mount point held before.
#[instrument(skip(state))]
pub async fn quick_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ImageQuery>,
) -> Result<QuickViewTemplate> {
    let product = find_product(&state, &id)?;
    Ok(QuickViewTemplate {
        product: ProductDetailView::new(product, query.image, true),
    })
}

fn find_product<'a>(state: &'a AppState, id: &str) -> Result<&'a Product> {
    state
        .catalog()
        .find_by_id(id)
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {id}")))
}
