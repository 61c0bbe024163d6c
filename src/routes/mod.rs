//! Routes Module
//!
//! HTTP route configuration.
//!
//! - **`api_routes`** - The public and bearer-protected API route tables
//! - **`router`** - Assembly of the full application router

pub mod api_routes;
pub mod router;

pub use router::create_router;
