//! Storage port for the persisted cart blob.
//!
//! Implementations hold a single opaque string per shopper. They know
//! nothing about the cart layout; encoding and decoding belong to the store.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tower_sessions::Session;

use crate::models::session_keys;

/// Storage backend failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The session backend failed to load or save.
    #[error("session storage error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The backend is not usable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A single read/write slot for the serialized cart.
pub trait CartStorage: Send + Sync {
    /// Read the stored blob, `None` when nothing was written yet.
    fn read(&self) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Replace the stored blob wholesale.
    fn write(&self, blob: String) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Cart slot inside the shopper's tower-sessions session.
#[derive(Debug, Clone)]
pub struct SessionCartStorage {
    session: Session,
}

impl SessionCartStorage {
    /// Wrap a request's session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// The wrapped session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

impl CartStorage for SessionCartStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.session.get::<String>(session_keys::CART).await?)
    }

    async fn write(&self, blob: String) -> Result<(), StorageError> {
        self.session.insert(session_keys::CART, blob).await?;
        Ok(())
    }
}

/// In-process cart slot.
///
/// Clones share the same slot, so a test can keep one handle to inspect what
/// the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryCartStorage {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-filled with a blob.
    #[must_use]
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    /// Current contents of the slot.
    #[must_use]
    pub fn blob(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CartStorage for MemoryCartStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.blob())
    }

    async fn write(&self, blob: String) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(blob);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_starts_empty() {
        let storage = MemoryCartStorage::new();
        assert_eq!(storage.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_storage_clones_share_slot() {
        let storage = MemoryCartStorage::new();
        let observer = storage.clone();

        storage.write("{}".to_string()).await.unwrap();
        assert_eq!(observer.blob().as_deref(), Some("{}"));

        storage.write("{\"a\":1}".to_string()).await.unwrap();
        assert_eq!(observer.read().await.unwrap().as_deref(), Some("{\"a\":1}"));
    }

    #[tokio::test]
    async fn test_session_storage_round_trip() {
        let store = Arc::new(tower_sessions::MemoryStore::default());
        let session = Session::new(None, store, None);
        let storage = SessionCartStorage::new(session);

        assert_eq!(storage.read().await.unwrap(), None);
        storage.write("{}".to_string()).await.unwrap();
        assert_eq!(storage.read().await.unwrap().as_deref(), Some("{}"));
    }
}
