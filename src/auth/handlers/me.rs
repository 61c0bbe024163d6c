/**
 * Identity-Scoped Handlers
 *
 * GET /api/auth/me and PUT /api/auth/profile. Both operate on the identity
 * carried by the bearer token; no project-level authorization is involved.
 */

use axum::{extract::State, response::Json};
use sqlx::PgPool;

use crate::auth::handlers::types::{AuthResponse, UpdateProfileRequest, UserResponse};
use crate::auth::users::{get_user_by_email, get_user_by_id, update_profile as update_profile_db};
use crate::error::{is_unique_violation, ApiError};
use crate::middleware::auth::AuthUser;

/// Get the currently authenticated user
pub async fn get_me(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = get_user_by_id(&pool, auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(UserResponse::from(&user)))
}

/// Update the authenticated user's profile
///
/// Absent fields are left unchanged. A changed email must remain unique.
/// The response echoes the bearer token the caller presented; no new token
/// is minted on profile change.
///
/// # Errors
///
/// * `conflict` - the requested email belongs to another account
pub async fn update_profile(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = get_user_by_id(&pool, auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if let Some(new_email) = request.email.as_deref() {
        if !new_email.eq_ignore_ascii_case(&user.email) {
            if get_user_by_email(&pool, new_email).await?.is_some() {
                return Err(ApiError::conflict("Email already in use"));
            }
        }
    }

    let updated = match update_profile_db(
        &pool,
        user.id,
        request.name.as_deref(),
        request.email.as_deref(),
    )
    .await
    {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("Email already in use"));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Profile updated for {}", updated.id);

    Ok(Json(AuthResponse {
        token: auth.token,
        user: UserResponse::from(&updated),
    }))
}
