//! Attar storefront library.
//!
//! Server-rendered catalog, product overlay, hero carousel and a cart kept in
//! the shopper's session. Exposed as a library so the router can be driven
//! from integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod carousel;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

pub use app::build_router;
