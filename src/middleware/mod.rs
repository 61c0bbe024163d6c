//! Middleware Module
//!
//! Request-processing middleware. Currently only bearer-token
//! authentication for the protected API surface.

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
