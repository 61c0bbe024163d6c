/**
 * Application State Management
 *
 * The `AppState` struct is the central state container handed to the
 * router. It holds the database pool and the per-project event channel
 * registry; handlers receive both by explicit injection through Axum
 * state extraction - there is no ambient global reached from inside a
 * handler.
 *
 * # Thread Safety
 *
 * Both fields are cheap to clone and internally synchronized: `PgPool`
 * is a shared connection pool, and `ProjectChannels` wraps its registry
 * in `Arc<Mutex<..>>`.
 */

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::realtime::ProjectChannels;

/// Application state for the Axum router
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool (the resource store)
    pub pool: PgPool,
    /// Per-project real-time event channels (the event bus)
    pub channels: ProjectChannels,
}

/// Allow handlers that only touch the store to extract `State<PgPool>`
impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}

/// Allow the subscription handler to extract `State<ProjectChannels>`
impl FromRef<AppState> for ProjectChannels {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.channels.clone()
    }
}
