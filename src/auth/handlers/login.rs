/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Return token and user info
 *
 * # Security
 *
 * Unknown email and wrong password both return the same `unauthenticated`
 * error so the endpoint cannot be used to enumerate accounts.
 */

use axum::{extract::State, response::Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::auth::sessions::create_token;
use crate::auth::users::get_user_by_email;
use crate::error::ApiError;

/// Authenticate a user and issue a bearer token
///
/// # Errors
///
/// * `unauthenticated` - unknown email or wrong password
pub async fn login(
    State(pool): State<PgPool>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = get_user_by_email(&pool, &request.email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login failed: unknown email {}", request.email);
            ApiError::unauthenticated("Invalid email or password")
        })?;

    let valid = verify(&request.password, &user.password_hash)
        .map_err(|e| ApiError::internal(format!("password verification error: {e}")))?;

    if !valid {
        tracing::warn!("Login failed: wrong password for {}", user.email);
        return Err(ApiError::unauthenticated("Invalid email or password"));
    }

    let token = create_token(user.id, user.email.clone())
        .map_err(|e| ApiError::internal(format!("failed to create token: {e}")))?;

    tracing::info!("User logged in: {}", user.email);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    }))
}
