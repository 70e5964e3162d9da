//! Catalog product records and category filters.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::{Category, ProductId};
use super::price::Price;

/// A purchasable product.
///
/// Products are built once when the catalog loads and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    /// Image URLs in gallery order. The catalog loader rejects empty lists.
    pub images: Vec<String>,
    pub price: Price,
    pub description: String,
    /// Free-text notes and ingredients.
    pub ingredients: String,
    /// External purchase link.
    pub buy_url: String,
}

impl Product {
    /// The first gallery image, used for cards and as the default primary image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the detail view should show a thumbnail strip.
    #[must_use]
    pub fn has_gallery(&self) -> bool {
        self.images.len() > 1
    }
}

/// Which slice of the catalog a grid shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// The full catalog, unfiltered.
    #[default]
    All,
    /// Products whose category tag matches exactly.
    Only(Category),
}

impl CategoryFilter {
    /// Tag used for the unfiltered view.
    pub const ALL_TAG: &'static str = "all";

    /// Interpret a raw filter tag. `"all"` selects everything.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        if tag == Self::ALL_TAG {
            Self::All
        } else {
            Self::Only(Category::new(tag))
        }
    }

    /// The tag carried by the matching filter control.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::All => Self::ALL_TAG,
            Self::Only(category) => category.as_str(),
        }
    }

    /// Whether a product belongs in this slice.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category == *category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
