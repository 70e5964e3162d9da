//! The shopper's cart: storage port and the store that owns it.
//!
//! [`CartStore`] is the only writer of the persisted cart. Every mutation is
//! a full read-modify-write against a [`CartStorage`] slot holding the cart
//! as one JSON string, so the next request always sees the latest write.

pub mod storage;
pub mod store;

pub use storage::{CartStorage, MemoryCartStorage, SessionCartStorage, StorageError};
pub use store::{Added, CartStore, CartStoreError, Toast};
