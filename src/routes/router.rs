/**
 * Router Configuration
 *
 * Assembly of the full application router:
 *
 * 1. Service banner at `/`
 * 2. Public and bearer-protected API routes
 * 3. Real-time SSE subscriptions at `/realtime/{project_id}`
 * 4. Static file service for the uploads directory
 * 5. Fallback handler (404)
 *
 * The real-time route sits outside the authentication layer: joining a
 * project channel presents only the project id, mirroring the inherited
 * subscribe-time behavior (see DESIGN.md).
 */

use axum::{http::StatusCode, routing::get, Router};
use tower_http::services::ServeDir;

use crate::realtime::subscription::subscribe_project;
use crate::routes::api_routes::{protected_api_routes, public_api_routes};
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Bugline API is running..." }))
        .route("/realtime/{project_id}", get(subscribe_project))
        .merge(public_api_routes())
        .merge(protected_api_routes(app_state.clone()))
        .nest_service("/uploads", ServeDir::new("uploads"))
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
        .with_state(app_state)
}
