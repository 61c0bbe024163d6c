//! Request Error Module
//!
//! This module defines the error taxonomy surfaced at the request boundary.
//! Every domain error is recovered here and converted into a structured JSON
//! response; nothing in this taxonomy is allowed to crash the serving process.
//!
//! # Architecture
//!
//! - **`types`** - The `ApiError` enum, constructors, kind/status mapping
//! - **`conversion`** - `IntoResponse` implementation for Axum handlers
//!
//! # Taxonomy
//!
//! | Kind              | Status | Meaning                                        |
//! |-------------------|--------|------------------------------------------------|
//! | `unauthenticated` | 401    | No or invalid bearer token                     |
//! | `forbidden`       | 403    | Authenticated but not permitted                |
//! | `not_found`       | 404    | Resource id does not resolve                   |
//! | `validation`      | 400    | Field value outside its declared domain        |
//! | `conflict`        | 409    | Uniqueness violated (duplicate email, member)  |
//! | `invariant`       | 400    | Domain invariant refused the mutation          |
//! | `internal`        | 500    | Unexpected persistence or serialization error  |
//!
//! `forbidden` and `not_found` are deliberately distinct: a denial on an
//! existing-but-inaccessible resource is observably different from a denial
//! on a missing one.

pub mod conversion;
pub mod types;

pub use types::{is_unique_violation, ApiError};
