//! Core types for the Attar storefront.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, CartLine};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceParseError, format_amount};
pub use product::{CategoryFilter, Product};
