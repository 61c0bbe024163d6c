//! Bugline - Collaborative Issue-Tracking Backend
//!
//! Bugline is a collaborative bug/issue-tracking backend built with Rust.
//! Users form projects with role-scoped membership, file and mutate tickets
//! inside a project, comment on tickets, and observe ticket changes from
//! other collaborators in near real time over Server-Sent Events.
//!
//! # Overview
//!
//! This library provides the full server-side functionality:
//! - Axum HTTP server with JWT bearer authentication
//! - Per-project membership roster with a closed role model
//! - A pure authorization engine consulted before every mutation
//! - Ticket and comment lifecycle with attachment management
//! - Per-project real-time event channels (ticket created/updated/deleted)
//! - PostgreSQL persistence via sqlx with embedded migrations
//!
//! # Module Structure
//!
//! The library is organized into focused modules:
//!
//! - **`auth`** - User accounts, password hashing, JWT session tokens
//! - **`authz`** - Pure authorization engine: roles, capabilities, decisions
//! - **`projects`** - Projects and the membership & role ledger
//! - **`tickets`** - Tickets and their attachment sequence
//! - **`comments`** - Comments on tickets
//! - **`realtime`** - Per-project event channels and SSE subscriptions
//! - **`middleware`** - Bearer-token authentication middleware
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`server`** - Server initialization, state, configuration
//! - **`error`** - The request-level error taxonomy
//!
//! # Concurrency
//!
//! Every inbound request runs as an independent tokio task; no lock is held
//! across a database await point. Shared mutable collections (the membership
//! roster, a ticket's attachments) are mutated through single-row SQL
//! statements so that two racing requests can never overwrite each other's
//! change with a stale whole-collection write-back.

pub mod auth;
pub mod authz;
pub mod comments;
pub mod error;
pub mod middleware;
pub mod projects;
pub mod realtime;
pub mod routes;
pub mod server;
pub mod tickets;
