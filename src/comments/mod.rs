//! Comments Module
//!
//! Comments on tickets. Author and parent ticket are immutable; creation
//! and listing require membership of the ticket's project (resolved
//! comment -> ticket -> project), deletion is author-only.

pub mod db;
pub mod handlers;
pub mod types;

pub use handlers::{add_comment, delete_comment, list_by_ticket};
