//! Business logic services for the catalog API.
//!
//! # Services
//!
//! - `accounts` - Customer signup and Argon2id password hashing
//! - `media` - Local filesystem storage for uploads
//! - `thumbnail` - Best-effort thumbnail derivation for product images

pub mod accounts;
pub mod media;
pub mod thumbnail;

pub use accounts::AccountError;
pub use media::{MediaError, MediaStorage};
pub use thumbnail::{ThumbnailError, ThumbnailSpec};
