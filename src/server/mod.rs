//! Server Module
//!
//! Server initialization and shared application state.
//!
//! # Architecture
//!
//! - **`config`** - Environment configuration and database connection
//! - **`state`** - The `AppState` container and `FromRef` extractions
//! - **`init`** - Application assembly (pool, channels, router, tasks)

pub mod config;
pub mod init;
pub mod state;

pub use state::AppState;
