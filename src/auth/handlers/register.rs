/**
 * Registration Handler
 *
 * POST /api/auth/register
 *
 * # Security
 *
 * - Passwords are hashed with bcrypt before storage
 * - A duplicate email is rejected with a `conflict` error
 * - The response carries a fresh 30-day JWT so the client is
 *   authenticated immediately
 */

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::PgPool;

use crate::auth::handlers::types::{AuthResponse, RegisterRequest, UserResponse};
use crate::auth::sessions::create_token;
use crate::auth::users::{create_user, get_user_by_email};
use crate::error::{is_unique_violation, ApiError};

/// Register a new user
///
/// # Errors
///
/// * `validation` - name, email, or password is empty
/// * `conflict` - a user with this email already exists
pub async fn register(
    State(pool): State<PgPool>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let name = request.name.trim();
    let email = request.email.trim();

    if name.is_empty() {
        return Err(ApiError::validation("Please provide a name"));
    }
    if email.is_empty() {
        return Err(ApiError::validation("Please provide an email"));
    }
    if request.password.is_empty() {
        return Err(ApiError::validation("Please provide a password"));
    }

    if get_user_by_email(&pool, email).await?.is_some() {
        return Err(ApiError::conflict("User already exists"));
    }

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::internal(format!("failed to hash password: {e}")))?;

    // A racing registration can still lose to the unique constraint.
    let user = match create_user(&pool, name, email, &password_hash).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("User already exists"));
        }
        Err(e) => return Err(e.into()),
    };

    let token = create_token(user.id, user.email.clone())
        .map_err(|e| ApiError::internal(format!("failed to create token: {e}")))?;

    tracing::info!("User registered: {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse::from(&user),
        }),
    ))
}
