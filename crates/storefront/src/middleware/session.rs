//! Session middleware configuration.
//!
//! The session is the shopper's persisted storage slot. The binary backs it
//! with a `SQLite` store; tests plug in tower-sessions' `MemoryStore`.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "attar_session";

/// Session expiry time in seconds (30 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Open the `SQLite` session store and create its table if needed.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub async fn create_session_store(database_url: &str) -> Result<SqliteStore, sqlx::Error> {
    // Each connection to `sqlite::memory:` opens its own database.
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
    let pool: SqlitePool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    let store = SqliteStore::new(pool);
    store.migrate().await?;
    Ok(store)
}

/// Create the session layer over any session store.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &StorefrontConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
