//! The fixed product catalog.
//!
//! The catalog is read once at startup, either from the JSON document
//! compiled into the binary or from `STOREFRONT_CATALOG_PATH`, validated, and
//! then shared read-only by every request. Lookups never fail; a miss is
//! `None` or an empty list.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use attar_core::{Category, CategoryFilter, Product, ProductId};
use serde::Deserialize;
use thiserror::Error;

/// Catalog compiled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../content/catalog.json");

/// Errors raised while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),
    #[error("duplicate category: {0}")]
    DuplicateCategory(Category),
    #[error("\"{}\" is reserved for the unfiltered view", CategoryFilter::ALL_TAG)]
    ReservedCategory,
    #[error("product {0} has no images")]
    MissingImages(ProductId),
    #[error("product {product} has undeclared category {category}")]
    UnknownCategory {
        product: ProductId,
        category: Category,
    },
}

/// On-disk catalog layout.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// Products in declaration order plus the filter tags shown to shoppers.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, validating ids, images and categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when a product id or category repeats, a
    /// category is named `all`, a product has no images, or a product uses an
    /// undeclared category.
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen_categories = HashSet::new();
        for category in &categories {
            if category.as_str() == CategoryFilter::ALL_TAG {
                return Err(CatalogError::ReservedCategory);
            }
            if !seen_categories.insert(category) {
                return Err(CatalogError::DuplicateCategory(category.clone()));
            }
        }

        let mut seen_ids = HashSet::new();
        for product in &products {
            if !seen_ids.insert(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
            if product.images.is_empty() {
                return Err(CatalogError::MissingImages(product.id.clone()));
            }
            if !seen_categories.contains(&product.category) {
                return Err(CatalogError::UnknownCategory {
                    product: product.id.clone(),
                    category: product.category.clone(),
                });
            }
        }

        Ok(Self {
            categories,
            products,
        })
    }

    /// Parse and validate a catalog document.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON or prices, and the
    /// validation errors from [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::new(document.categories, document.products)
    }

    /// The catalog shipped with the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded document is invalid.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Read a catalog file from disk.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, otherwise the
    /// errors from [`Catalog::from_json`].
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.products.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Load from `path` when given, otherwise use the built-in catalog.
    ///
    /// # Errors
    ///
    /// See [`Catalog::load`] and [`Catalog::builtin`].
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        path.map_or_else(Self::builtin, Self::load)
    }

    /// Find a product by id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id.as_str() == id)
    }

    /// Products in the given slice, in declaration order.
    #[must_use]
    pub fn filter(&self, filter: &CategoryFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| filter.matches(product))
            .collect()
    }

    /// Map a raw tag onto a filter control, if one exists for it.
    ///
    /// `"all"` and declared categories resolve; anything else is `None`.
    #[must_use]
    pub fn resolve_filter(&self, tag: &str) -> Option<CategoryFilter> {
        let filter = CategoryFilter::from_tag(tag);
        match &filter {
            CategoryFilter::All => Some(filter),
            CategoryFilter::Only(category) => {
                self.categories.contains(category).then_some(filter)
            }
        }
    }

    /// The first `n` products, for the home page strip.
    #[must_use]
    pub fn featured(&self, n: usize) -> Vec<&Product> {
        self.products.iter().take(n).collect()
    }

    /// Declared category tags in display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All products in declaration order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            category: Category::new(category),
            images: vec![format!("/static/images/{id}.jpg")],
            price: "₹100".parse().unwrap(),
            description: String::new(),
            ingredients: String::new(),
            buy_url: "#".to_string(),
        }
    }

    fn mixed() -> Catalog {
        Catalog::new(
            vec![Category::new("fragrance"), Category::new("skincare")],
            vec![
                product("a", "fragrance"),
                product("b", "skincare"),
                product("c", "fragrance"),
                product("d", "skincare"),
            ],
        )
        .unwrap()
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.products().len(), 5);
        assert!(
            catalog
                .products()
                .iter()
                .all(|p| p.category.as_str() == "fragrance")
        );
        assert_eq!(
            catalog.find_by_id("amplifier").map(|p| p.price.to_string()),
            Some("₹1,499".to_string())
        );
    }

    #[test]
    fn test_builtin_images_are_shipped() {
        let static_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("static");
        for product in Catalog::builtin().unwrap().products() {
            for image in &product.images {
                let relative = image.strip_prefix("/static/").unwrap();
                assert!(static_dir.join(relative).is_file(), "missing {image}");
            }
        }
    }

    #[test]
    fn test_filter_all_preserves_order() {
        let catalog = mixed();
        assert_eq!(ids(&catalog.filter(&CategoryFilter::All)), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_filter_by_tag_preserves_order() {
        let catalog = mixed();
        for tag in ["fragrance", "skincare"] {
            let filtered = catalog.filter(&CategoryFilter::from_tag(tag));
            assert!(filtered.iter().all(|p| p.category.as_str() == tag));
        }
        assert_eq!(
            ids(&catalog.filter(&CategoryFilter::from_tag("skincare"))),
            ["b", "d"]
        );
    }

    #[test]
    fn test_filter_without_matches_is_empty() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.filter(&CategoryFilter::from_tag("skincare")).is_empty());
    }

    #[test]
    fn test_find_by_id_miss() {
        assert!(mixed().find_by_id("zzz").is_none());
    }

    #[test]
    fn test_resolve_filter() {
        let catalog = mixed();
        assert_eq!(catalog.resolve_filter("all"), Some(CategoryFilter::All));
        assert_eq!(
            catalog.resolve_filter("skincare"),
            Some(CategoryFilter::from_tag("skincare"))
        );
        assert_eq!(catalog.resolve_filter("candles"), None);
    }

    #[test]
    fn test_featured_takes_prefix() {
        assert_eq!(ids(&mixed().featured(2)), ["a", "b"]);
        assert_eq!(mixed().featured(10).len(), 4);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = Catalog::new(
            vec![Category::new("fragrance")],
            vec![product("a", "fragrance"), product("a", "fragrance")],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateProduct(_)));
    }

    #[test]
    fn test_rejects_missing_images() {
        let mut p = product("a", "fragrance");
        p.images.clear();
        let err = Catalog::new(vec![Category::new("fragrance")], vec![p]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingImages(_)));
    }

    #[test]
    fn test_rejects_undeclared_and_reserved_categories() {
        let err = Catalog::new(vec![Category::new("fragrance")], vec![product("a", "candles")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCategory { .. }));

        let err = Catalog::new(vec![Category::new("all")], Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::ReservedCategory));
    }

    #[test]
    fn test_rejects_bad_price() {
        let json = r##"{"categories":["fragrance"],"products":[{"id":"a","name":"A",
            "category":"fragrance","images":["a.jpg"],"price":"free","description":"",
            "ingredients":"","buyUrl":"#"}]}"##;
        assert!(matches!(Catalog::from_json(json), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
