/**
 * Ticket Model and Database Operations
 *
 * Tickets are plain rows; the attachment sequence is row-per-element so
 * appending and removing attachments are single-row statements, immune to
 * the lost-update race of a whole-collection write-back.
 */

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::tickets::types::{AttachmentUpload, TicketPriority, TicketStatus};

/// Ticket record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    /// Immutable after creation
    pub project_id: Uuid,
    pub assignee_id: Option<Uuid>,
    /// Immutable: the creator
    pub reporter_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attachment record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Attachment {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub filename: String,
    pub storage_path: String,
    pub mime_type: String,
    pub size: i64,
    pub url: String,
    pub added_at: DateTime<Utc>,
}

/// Fields for ticket creation
#[derive(Debug)]
pub struct NewTicket<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub project_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub reporter_id: Uuid,
}

const TICKET_COLUMNS: &str =
    "id, title, description, status, priority, project_id, assignee_id, reporter_id, created_at, updated_at";

/// Create a ticket
pub async fn create_ticket(pool: &PgPool, new: NewTicket<'_>) -> Result<Ticket, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, Ticket>(&format!(
        r#"
        INSERT INTO tickets (id, title, description, status, priority, project_id, assignee_id, reporter_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {TICKET_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(new.title)
    .bind(new.description)
    .bind(new.status)
    .bind(new.priority)
    .bind(new.project_id)
    .bind(new.assignee_id)
    .bind(new.reporter_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Get a ticket by id
pub async fn get_ticket(pool: &PgPool, id: Uuid) -> Result<Option<Ticket>, sqlx::Error> {
    sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// List a project's tickets, newest first
pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Ticket>, sqlx::Error> {
    sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets WHERE project_id = $1 ORDER BY created_at DESC"
    ))
    .bind(project_id)
    .fetch_all(pool)
    .await
}

/// Persist a mutated ticket
///
/// Writes every mutable field from the in-memory state; the handler
/// applied the partial update to a freshly loaded row.
pub async fn update_ticket(pool: &PgPool, ticket: &Ticket) -> Result<Ticket, sqlx::Error> {
    sqlx::query_as::<_, Ticket>(&format!(
        r#"
        UPDATE tickets
        SET title = $2, description = $3, status = $4, priority = $5, assignee_id = $6, updated_at = $7
        WHERE id = $1
        RETURNING {TICKET_COLUMNS}
        "#
    ))
    .bind(ticket.id)
    .bind(&ticket.title)
    .bind(&ticket.description)
    .bind(ticket.status)
    .bind(ticket.priority)
    .bind(ticket.assignee_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// Delete a ticket; attachments and comments cascade
pub async fn delete_ticket(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tickets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// A ticket's attachments in append order
pub async fn list_attachments(
    pool: &PgPool,
    ticket_id: Uuid,
) -> Result<Vec<Attachment>, sqlx::Error> {
    sqlx::query_as::<_, Attachment>(
        r#"
        SELECT id, ticket_id, filename, storage_path, mime_type, size, url, added_at
        FROM attachments
        WHERE ticket_id = $1
        ORDER BY added_at, id
        "#,
    )
    .bind(ticket_id)
    .fetch_all(pool)
    .await
}

/// Attachments for a batch of tickets, grouped by ticket id
pub async fn attachments_for_tickets(
    pool: &PgPool,
    ticket_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Attachment>>, sqlx::Error> {
    if ticket_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, Attachment>(
        r#"
        SELECT id, ticket_id, filename, storage_path, mime_type, size, url, added_at
        FROM attachments
        WHERE ticket_id = ANY($1)
        ORDER BY added_at, id
        "#,
    )
    .bind(ticket_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<Attachment>> = HashMap::new();
    for row in rows {
        grouped.entry(row.ticket_id).or_default().push(row);
    }
    Ok(grouped)
}

/// Append uploaded-file descriptors to a ticket, in request order
pub async fn add_attachments(
    pool: &PgPool,
    ticket_id: Uuid,
    uploads: &[AttachmentUpload],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    for (i, upload) in uploads.iter().enumerate() {
        // Distinct timestamps within one batch keep request order stable.
        let added_at = now + chrono::Duration::microseconds(i as i64);

        sqlx::query(
            r#"
            INSERT INTO attachments (id, ticket_id, filename, storage_path, mime_type, size, url, added_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(ticket_id)
        .bind(&upload.filename)
        .bind(&upload.storage_path)
        .bind(&upload.mime_type)
        .bind(upload.size)
        .bind(&upload.url)
        .bind(added_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

/// Remove one attachment by id. Removal of an id that is no longer
/// present is a tolerated no-op.
pub async fn remove_attachment(
    pool: &PgPool,
    ticket_id: Uuid,
    attachment_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM attachments
        WHERE id = $1 AND ticket_id = $2
        "#,
    )
    .bind(attachment_id)
    .bind(ticket_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
