//! Session-related keys and one-shot values.
//!
//! The shopper's session is the storefront's only per-shopper storage.

use tower_sessions::Session;

/// Session keys.
pub mod keys {
    /// Key holding the serialized cart blob.
    pub const CART: &str = "cart";

    /// Key for the add-to-cart notice carried across a redirect.
    pub const TOAST_FLASH: &str = "toast_flash";
}

/// Store a notice for the next full page render.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_toast_flash(
    session: &Session,
    message: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::TOAST_FLASH, message).await
}

/// Take the pending notice, if any, clearing it from the session.
///
/// Sessions without a pending notice are only read, so plain browsing never
/// creates one.
pub async fn take_toast_flash(session: &Session) -> Option<String> {
    match session.get::<String>(keys::TOAST_FLASH).await {
        Ok(Some(_)) => match session.remove::<String>(keys::TOAST_FLASH).await {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to clear toast flash");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read toast flash");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_toast_flash_is_taken_once() {
        let session = session();
        set_toast_flash(&session, "Amplifier added to cart").await.unwrap();

        assert_eq!(
            take_toast_flash(&session).await.as_deref(),
            Some("Amplifier added to cart")
        );
        assert_eq!(take_toast_flash(&session).await, None);
    }

    #[tokio::test]
    async fn test_missing_toast_flash_leaves_session_untouched() {
        let session = session();
        assert_eq!(take_toast_flash(&session).await, None);
        assert!(!session.is_modified());
    }
}
