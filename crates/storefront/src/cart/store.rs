//! Cart store: read-modify-write operations over a [`CartStorage`] slot.

use std::time::Duration;

use attar_core::{Cart, ProductId};
use rust_decimal::Decimal;
use thiserror::Error;

use super::storage::{CartStorage, StorageError};

/// Errors from mutating the cart.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Adding zero units would create a line that cannot exist.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The cart could not be written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The cart could not be encoded.
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Transient confirmation shown after an add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    /// How long the notice stays on screen.
    pub lifetime: Duration,
}

impl Toast {
    /// Lifetime in whole milliseconds, for markup timers.
    #[must_use]
    pub fn lifetime_ms(&self) -> u128 {
        self.lifetime.as_millis()
    }
}

/// Result of a successful add.
#[derive(Debug, Clone)]
pub struct Added {
    /// Cart as written.
    pub cart: Cart,
    pub toast: Toast,
}

/// Owner of the persisted cart.
///
/// Holds no cart state of its own: every call loads from storage, and every
/// mutation writes the whole cart back before returning.
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    storage: S,
    toast_lifetime: Duration,
}

impl<S: CartStorage> CartStore<S> {
    /// Create a store over a storage slot.
    pub const fn new(storage: S, toast_lifetime: Duration) -> Self {
        Self {
            storage,
            toast_lifetime,
        }
    }

    /// The underlying storage slot.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the cart, substituting an empty one for missing or corrupt data.
    pub async fn load(&self) -> Cart {
        let blob = match self.storage.read().await {
            Ok(Some(blob)) => blob,
            Ok(None) => return Cart::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart, using empty cart");
                return Cart::default();
            }
        };

        Cart::from_json(&blob).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding malformed cart");
            Cart::default()
        })
    }

    /// Add `qty` units, creating the line on first add, and persist.
    ///
    /// # Errors
    ///
    /// Returns `CartStoreError::ZeroQuantity` for `qty == 0` without touching
    /// storage, or a storage/encode error if the write fails.
    pub async fn add(
        &self,
        id: ProductId,
        name: &str,
        price: Decimal,
        qty: u32,
    ) -> Result<Added, CartStoreError> {
        if qty == 0 {
            return Err(CartStoreError::ZeroQuantity);
        }

        let mut cart = self.load().await;
        tracing::debug!(product_id = %id, qty, "Adding to cart");
        cart.add(id, name, price, qty);
        self.save(&cart).await?;

        Ok(Added {
            cart,
            toast: Toast {
                message: format!("{name} added to cart"),
                lifetime: self.toast_lifetime,
            },
        })
    }

    /// Change a line's quantity by `delta`, deleting it at zero or below.
    ///
    /// Nothing is written when the line does not exist.
    ///
    /// # Errors
    ///
    /// Returns a storage/encode error if the write fails.
    pub async fn adjust_qty(&self, id: &str, delta: i64) -> Result<Cart, CartStoreError> {
        let mut cart = self.load().await;
        if !cart.adjust_qty(id, delta) {
            tracing::debug!(product_id = id, "Adjust ignored, line not in cart");
            return Ok(cart);
        }

        tracing::debug!(product_id = id, delta, count = cart.count(), "Cart quantity adjusted");
        self.save(&cart).await?;
        Ok(cart)
    }

    /// Delete a line if present.
    ///
    /// # Errors
    ///
    /// Returns a storage/encode error if the write fails.
    pub async fn remove(&self, id: &str) -> Result<Cart, CartStoreError> {
        let mut cart = self.load().await;
        if cart.remove(id) {
            tracing::debug!(product_id = id, count = cart.count(), "Cart line removed");
            self.save(&cart).await?;
        }
        Ok(cart)
    }

    /// Sum of `price * qty` over the stored cart.
    pub async fn total(&self) -> Decimal {
        self.load().await.total()
    }

    /// Sum of quantities over the stored cart.
    pub async fn count(&self) -> u64 {
        self.load().await.count()
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartStoreError> {
        let blob = cart.to_json()?;
        self.storage.write(blob).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::MemoryCartStorage;

    const TOAST: Duration = Duration::from_millis(1500);

    fn store() -> (CartStore<MemoryCartStorage>, MemoryCartStorage) {
        let storage = MemoryCartStorage::new();
        (CartStore::new(storage.clone(), TOAST), storage)
    }

    /// Storage whose writes always fail.
    struct ReadOnlyStorage;

    impl CartStorage for ReadOnlyStorage {
        async fn read(&self) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn write(&self, _blob: String) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }
    }

    /// Storage whose reads always fail.
    struct BrokenReads;

    impl CartStorage for BrokenReads {
        async fn read(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("offline".to_string()))
        }

        async fn write(&self, _blob: String) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let (store, _) = store();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_is_empty() {
        for blob in ["{", "[1,2]", "{\"p1\":{\"qty\":\"many\"}}"] {
            let store = CartStore::new(MemoryCartStorage::with_blob(blob), TOAST);
            assert!(store.load().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_load_read_failure_is_empty() {
        let store = CartStore::new(BrokenReads, TOAST);
        assert!(store.load().await.is_empty());
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_add_twice_merges_and_persists() {
        let (store, storage) = store();
        store
            .add(ProductId::new("p1"), "Widget", Decimal::new(100, 0), 1)
            .await
            .unwrap();
        let added = store
            .add(ProductId::new("p1"), "Widget", Decimal::new(100, 0), 1)
            .await
            .unwrap();

        assert_eq!(added.cart.len(), 1);
        assert_eq!(added.cart.get("p1").map(|l| l.qty), Some(2));

        let persisted = Cart::from_json(&storage.blob().unwrap()).unwrap();
        assert_eq!(persisted, added.cart);
    }

    #[tokio::test]
    async fn test_add_returns_toast() {
        let (store, _) = store();
        let added = store
            .add(ProductId::new("amplifier"), "Amplifier", Decimal::new(1499, 0), 1)
            .await
            .unwrap();

        assert_eq!(added.toast.message, "Amplifier added to cart");
        assert_eq!(added.toast.lifetime_ms(), 1500);
    }

    #[tokio::test]
    async fn test_add_zero_writes_nothing() {
        let (store, storage) = store();
        let err = store
            .add(ProductId::new("p1"), "Widget", Decimal::new(100, 0), 0)
            .await
            .unwrap_err();

        assert!(matches!(err, CartStoreError::ZeroQuantity));
        assert!(storage.blob().is_none());
    }

    #[tokio::test]
    async fn test_widget_scenario_count_and_total() {
        let (store, _) = store();
        store
            .add(ProductId::new("p1"), "Widget", Decimal::new(100, 0), 1)
            .await
            .unwrap();
        store
            .add(ProductId::new("p1"), "Widget", Decimal::new(100, 0), 2)
            .await
            .unwrap();

        assert_eq!(store.count().await, 3);
        assert_eq!(store.total().await, Decimal::new(300, 0));
    }

    #[tokio::test]
    async fn test_adjust_down_to_zero_removes_line() {
        let (store, _) = store();
        store
            .add(ProductId::new("p1"), "Widget", Decimal::new(100, 0), 2)
            .await
            .unwrap();
        store
            .add(ProductId::new("p2"), "Gadget", Decimal::new(40, 0), 1)
            .await
            .unwrap();

        let cart = store.adjust_qty("p1", -2).await.unwrap();
        assert!(cart.get("p1").is_none());
        assert_eq!(store.count().await, 1);
        assert_eq!(store.total().await, Decimal::new(40, 0));
    }

    #[tokio::test]
    async fn test_adjust_missing_does_not_write() {
        let (store, storage) = store();
        let cart = store.adjust_qty("ghost", 1).await.unwrap();
        assert!(cart.is_empty());
        assert!(storage.blob().is_none());
    }

    #[tokio::test]
    async fn test_remove_present_and_absent() {
        let (store, storage) = store();
        store
            .add(ProductId::new("p1"), "Widget", Decimal::new(100, 0), 3)
            .await
            .unwrap();

        let cart = store.remove("p1").await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(storage.blob().as_deref(), Some("{}"));

        let cart = store.remove("p1").await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_overwritten_on_next_add() {
        let storage = MemoryCartStorage::with_blob("garbage");
        let store = CartStore::new(storage.clone(), TOAST);
        store
            .add(ProductId::new("p1"), "Widget", Decimal::new(100, 0), 1)
            .await
            .unwrap();

        let persisted = Cart::from_json(&storage.blob().unwrap()).unwrap();
        assert_eq!(persisted.count(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let store = CartStore::new(ReadOnlyStorage, TOAST);
        let err = store
            .add(ProductId::new("p1"), "Widget", Decimal::new(100, 0), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CartStoreError::Storage(_)));
    }
}
