//! Attar Core - Shared domain types.
//!
//! This crate provides the types used by the storefront and its tests:
//! - `storefront` - Server-rendered shop with catalog, detail overlay and cart
//! - `integration-tests` - End-to-end tests over the storefront router
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! sessions, no HTTP. Cart arithmetic and the persisted cart layout live here
//! so they can be tested without a server.
//!
//! # Modules
//!
//! - [`types`] - Product keys, prices, catalog records and the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
