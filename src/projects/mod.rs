//! Projects Module
//!
//! Projects and their membership roster - the membership & role ledger.
//! A project has exactly one immutable owner and an ordered roster of
//! `(user, role)` entries; the owner is materialized into the roster with
//! role `Admin` at creation time and can never be removed.
//!
//! # Architecture
//!
//! - **`db`** - Project records and the atomic roster operations
//! - **`handlers`** - Project CRUD and member management HTTP handlers
//! - **`types`** - Request/response types
//!
//! # Consistency
//!
//! The roster is the sole source of truth for "may this user act on this
//! project", and it is a shared mutable collection under concurrent
//! requests. Member addition and removal are therefore single-row
//! `INSERT .. ON CONFLICT DO NOTHING` / `DELETE` statements - two racing
//! membership changes both land, and a lost update is impossible.

pub mod db;
pub mod handlers;
pub mod types;

pub use handlers::{
    add_member, create_project, delete_project, get_project, list_projects, remove_member,
    update_project,
};
