/**
 * Server Initialization
 *
 * Assembly of the running application: database pool, event channel
 * registry, router, and the periodic channel cleanup task.
 */

use axum::Router;
use sqlx::PgPool;

use crate::realtime::ProjectChannels;
use crate::routes::router::create_router;
use crate::server::config::{connect_database, ServerConfig};
use crate::server::state::AppState;

/// Interval for reaping subscriber-free event channels
const CHANNEL_CLEANUP_INTERVAL_SECS: u64 = 300;

/// Create the Axum application from configuration
///
/// Connects to the database (running migrations) and assembles the
/// router. Fails if the database is unreachable - persistence is not
/// optional for this service.
pub async fn create_app(config: &ServerConfig) -> Result<Router, sqlx::Error> {
    let pool = connect_database(&config.database_url).await?;
    Ok(build_app(pool))
}

/// Assemble the application around an existing pool
///
/// Split out from [`create_app`] so tests can inject their own pool.
pub fn build_app(pool: PgPool) -> Router {
    let channels = ProjectChannels::new();

    let app_state = AppState {
        pool,
        channels: channels.clone(),
    };

    let app = create_router(app_state);

    // A project's channel outlives its last subscriber until this reaps it.
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(
            CHANNEL_CLEANUP_INTERVAL_SECS,
        ));
        loop {
            interval.tick().await;
            channels.cleanup_idle();
            tracing::debug!("Cleaned up idle project channels");
        }
    });

    tracing::info!("Router configured");

    app
}
