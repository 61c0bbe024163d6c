//! Authentication Handlers
//!
//! HTTP handlers for account registration, login, and the identity-scoped
//! `me` / `profile` endpoints.

pub mod login;
pub mod me;
pub mod register;
pub mod types;

pub use login::login;
pub use me::{get_me, update_profile};
pub use register::register;
