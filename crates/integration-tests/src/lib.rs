//! Integration tests for the Attar storefront.
//!
//! Tests drive the real router in-process with `tower::ServiceExt::oneshot`,
//! backed by tower-sessions' `MemoryStore`. [`TestApp`] carries the session
//! cookie between requests the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p attar-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Pages, filters, product overlay, carousel
//! - `storefront_cart` - Cart mutations across requests in one session

use std::path::Path;

use attar_storefront::build_router;
use attar_storefront::catalog::Catalog;
use attar_storefront::config::StorefrontConfig;
use attar_storefront::routes::home::HeroConfig;
use attar_storefront::state::AppState;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

/// A collected response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// A header as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// The storefront router plus one shopper's cookie jar.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Router over the built-in catalog and default hero slides.
    ///
    /// # Panics
    ///
    /// Panics if the built-in catalog fails validation.
    #[must_use]
    pub fn new() -> Self {
        let catalog = Catalog::builtin().expect("built-in catalog is valid");
        Self::with_catalog(catalog)
    }

    /// Router over a specific catalog, serving the storefront's static
    /// assets.
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        let config = StorefrontConfig {
            static_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/static"),
            ..StorefrontConfig::default()
        };
        let state = AppState::new(config, catalog, HeroConfig::default());
        Self {
            router: build_router(state, MemoryStore::default()),
            cookie: None,
        }
    }

    /// Another shopper on the same router and session store.
    #[must_use]
    pub fn another_shopper(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Whether a session cookie has been issued.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    /// Plain browser `GET`.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, false).await
    }

    /// `GET` issued by htmx.
    pub async fn htmx_get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, true).await
    }

    /// Plain form `POST`.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(form), false).await
    }

    /// Form `POST` issued by htmx.
    pub async fn htmx_post(&mut self, uri: &str, form: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(form), true).await
    }

    async fn send(
        &mut self,
        method: Method,
        uri: &str,
        form: Option<&str>,
        htmx: bool,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if htmx {
            builder = builder.header("HX-Request", "true");
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                );
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };

        let request = builder.body(body).expect("valid request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
