//! Core types for the catalog.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod choice;
pub mod email;
pub mod id;

pub use choice::{Gender, OrderStatus, ProductCondition};
pub use email::{Email, EmailError};
pub use id::*;
