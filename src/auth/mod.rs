//! Authentication Module
//!
//! User accounts and session identity. Passwords are hashed with bcrypt and
//! sessions are stateless JWT bearer tokens with a 30-day expiry.
//!
//! # Architecture
//!
//! - **`users`** - The user record and its database operations
//! - **`sessions`** - JWT token generation and verification
//! - **`handlers`** - register / login / me / profile HTTP handlers
//!
//! Authorization is NOT decided here: a verified token only yields a stable
//! user id. What that user may do to a project, ticket, or comment is
//! decided per-request by the `authz` engine.

pub mod handlers;
pub mod sessions;
pub mod users;

pub use handlers::{get_me, login, register, update_profile};
