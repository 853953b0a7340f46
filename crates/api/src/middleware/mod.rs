//! HTTP middleware for the catalog API.
//!
//! - `request_id` - Request correlation via `x-request-id`

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
