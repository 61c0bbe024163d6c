/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies JWT tokens from the
 * Authorization header and provides the user identity to handlers.
 *
 * A missing or invalid token is `unauthenticated` (401) - never
 * `forbidden`, which is reserved for authorization denials on a verified
 * identity.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::sessions::verify_token;
use crate::auth::users::get_user_by_id;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Authenticated identity extracted from a verified JWT token
///
/// The raw token is retained because profile updates echo the presented
/// token back to the caller instead of minting a new one.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

/// Authentication middleware
///
/// 1. Extracts the JWT from the Authorization header (`Bearer <token>`)
/// 2. Verifies the token signature and expiry
/// 3. Confirms the user still exists in the store
/// 4. Attaches `AuthenticatedUser` to request extensions for handlers
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            ApiError::unauthenticated("Not authorized, no token")
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        ApiError::unauthenticated("Not authorized, no token")
    })?;

    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {e}");
        ApiError::unauthenticated("Not authorized, token failed")
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|e| ApiError::internal(format!("invalid user id in token: {e}")))?;

    // The token may outlive the account; re-check the store.
    let user = get_user_by_id(&app_state.pool, user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for unknown user {user_id}");
            ApiError::unauthenticated("Not authorized, token failed")
        })?;

    let token = token.to_string();
    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        token,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Used as a handler parameter on routes behind `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                ApiError::unauthenticated("Not authorized, no token")
            })?;

        Ok(AuthUser(user))
    }
}
