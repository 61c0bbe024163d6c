/**
 * Comment Handlers
 *
 * HTTP handlers for comments. Creation and listing resolve the parent
 * ticket to its project and require membership there; deletion is
 * author-only and does not consult the roster.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::authz::{authorize_comment_create, authorize_comment_delete, authorize_comment_read};
use crate::comments::db;
use crate::comments::types::{CommentResponse, CreateCommentRequest};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::projects::db::{get_project, load_roster};
use crate::tickets::db::get_ticket;

/// Add a comment to a ticket (project members only)
pub async fn add_comment(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(ApiError::validation("Please provide comment text"));
    }

    let ticket = get_ticket(&pool, request.ticket_id)
        .await?
        .ok_or(ApiError::NotFound("Ticket"))?;

    let project = get_project(&pool, ticket.project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    let roster = load_roster(&pool, &project).await?;
    authorize_comment_create(&roster, auth.user_id)?;

    let comment = db::create_comment(&pool, text, auth.user_id, ticket.id).await?;

    let with_author = db::get_comment_with_author(&pool, comment.id)
        .await?
        .ok_or(ApiError::NotFound("Comment"))?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(with_author))))
}

/// List a ticket's comments, newest first (project members only)
pub async fn list_by_ticket(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let ticket = get_ticket(&pool, ticket_id)
        .await?
        .ok_or(ApiError::NotFound("Ticket"))?;

    let project = get_project(&pool, ticket.project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    let roster = load_roster(&pool, &project).await?;
    authorize_comment_read(&roster, auth.user_id)?;

    let comments = db::list_by_ticket(&pool, ticket_id).await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

/// Delete a comment (author only)
pub async fn delete_comment(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let comment = db::get_comment(&pool, id)
        .await?
        .ok_or(ApiError::NotFound("Comment"))?;

    authorize_comment_delete(comment.user_id, auth.user_id)?;

    db::delete_comment(&pool, id).await?;

    Ok(Json(serde_json::json!({ "message": "Comment removed" })))
}
