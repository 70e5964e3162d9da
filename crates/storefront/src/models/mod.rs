//! Session-stored models for the storefront.

pub mod session;

pub use session::keys as session_keys;
pub use session::{set_toast_flash, take_toast_flash};
