/**
 * API Route Tables
 *
 * Route configuration for the JSON API, split into the public surface
 * (register, login) and the bearer-protected surface (everything else).
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/register` - User registration (public)
 * - `POST /api/auth/login` - User login (public)
 * - `GET /api/auth/me` - Current user
 * - `PUT /api/auth/profile` - Profile update
 *
 * ## Projects
 * - `POST /api/projects` - Create project
 * - `GET /api/projects` - List caller's projects
 * - `GET/PUT/DELETE /api/projects/{id}` - Read / update / delete
 * - `POST /api/projects/{id}/members` - Add team member
 * - `DELETE /api/projects/{id}/members/{user_id}` - Remove team member
 *
 * ## Tickets
 * - `POST /api/tickets` - Create ticket
 * - `GET /api/tickets/project/{project_id}` - List project tickets
 * - `PUT/DELETE /api/tickets/{id}` - Update / delete
 * - `POST /api/tickets/{id}/attachments` - Add attachments (max 5)
 * - `DELETE /api/tickets/{id}/attachments/{attachment_id}` - Remove one
 *
 * ## Comments
 * - `POST /api/comments` - Add comment
 * - `GET /api/comments/ticket/{ticket_id}` - List ticket comments
 * - `DELETE /api/comments/{id}` - Delete comment
 */

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::auth::handlers::{get_me, login, register, update_profile};
use crate::comments::handlers as comments;
use crate::middleware::auth::auth_middleware;
use crate::projects::handlers as projects;
use crate::server::state::AppState;
use crate::tickets::handlers as tickets;

/// Routes reachable without a bearer token
pub fn public_api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Routes behind the authentication middleware
///
/// A missing or invalid token is rejected with `unauthenticated` before
/// any handler runs.
pub fn protected_api_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        // Identity
        .route("/api/auth/me", get(get_me))
        .route("/api/auth/profile", put(update_profile))
        // Projects and membership
        .route(
            "/api/projects",
            post(projects::create_project).get(projects::list_projects),
        )
        .route(
            "/api/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/api/projects/{id}/members", post(projects::add_member))
        .route(
            "/api/projects/{id}/members/{user_id}",
            delete(projects::remove_member),
        )
        // Tickets and attachments
        .route("/api/tickets", post(tickets::create_ticket))
        .route(
            "/api/tickets/project/{project_id}",
            get(tickets::list_by_project),
        )
        .route(
            "/api/tickets/{id}",
            put(tickets::update_ticket).delete(tickets::delete_ticket),
        )
        .route("/api/tickets/{id}/attachments", post(tickets::add_attachments))
        .route(
            "/api/tickets/{id}/attachments/{attachment_id}",
            delete(tickets::remove_attachment),
        )
        // Comments
        .route("/api/comments", post(comments::add_comment))
        .route(
            "/api/comments/ticket/{ticket_id}",
            get(comments::list_by_ticket),
        )
        .route("/api/comments/{id}", delete(comments::delete_comment))
        .route_layer(middleware::from_fn_with_state(app_state, auth_middleware))
}
