//! Catalog Core - shared domain types.
//!
//! This crate provides the types used by every part of the catalog backend:
//! - `api` - REST service for products, variants, collections, users
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. The `postgres` feature adds `sqlx` encode/decode impls so the
//! same types can be bound and read directly by repositories.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, validated email addresses, and choice enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
