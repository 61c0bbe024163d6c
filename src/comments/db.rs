/**
 * Comment Model and Database Operations
 */

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    /// Immutable: the author
    pub user_id: Uuid,
    /// Immutable: the parent ticket
    pub ticket_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A comment joined with its author's name, for responses
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub text: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub ticket_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Create a comment on a ticket
pub async fn create_comment(
    pool: &PgPool,
    text: &str,
    user_id: Uuid,
    ticket_id: Uuid,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, text, user_id, ticket_id, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, text, user_id, ticket_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(text)
    .bind(user_id)
    .bind(ticket_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// Get a comment by id
pub async fn get_comment(pool: &PgPool, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, text, user_id, ticket_id, created_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Get a comment joined with its author's name
pub async fn get_comment_with_author(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<CommentWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, CommentWithAuthor>(
        r#"
        SELECT c.id, c.text, c.user_id, u.name AS user_name, c.ticket_id, c.created_at
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// List a ticket's comments with author names, newest first
pub async fn list_by_ticket(
    pool: &PgPool,
    ticket_id: Uuid,
) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, CommentWithAuthor>(
        r#"
        SELECT c.id, c.text, c.user_id, u.name AS user_name, c.ticket_id, c.created_at
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.ticket_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(ticket_id)
    .fetch_all(pool)
    .await
}

/// Delete a comment
pub async fn delete_comment(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
