/**
 * Ticket Handlers
 *
 * HTTP handlers for the ticket lifecycle and attachment management. Each
 * write sequences: load fresh state (404 if absent), consult the
 * authorization engine against the parent project's roster (403 if
 * denied), apply the transition, persist, and - for ticket
 * create/update/delete - publish the event to the project's channel.
 *
 * Publication happens after the mutation is durable and its failure is
 * never reported to the caller: the mutation's success is independent of
 * fan-out delivery.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::authz::{authorize_ticket, TicketAction};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::projects::db::{get_project, load_roster};
use crate::realtime::TicketEvent;
use crate::server::state::AppState;
use crate::tickets::db;
use crate::tickets::types::{
    AddAttachmentsRequest, CreateTicketRequest, TicketResponse, UpdateTicketRequest,
};

/// Upper bound on uploaded files per attachment request
const MAX_ATTACHMENTS_PER_REQUEST: usize = 5;

/// Load a ticket's full response shape (ticket plus attachments)
async fn ticket_response(
    state: &AppState,
    ticket: db::Ticket,
) -> Result<TicketResponse, ApiError> {
    let attachments = db::list_attachments(&state.pool, ticket.id).await?;
    Ok(TicketResponse::from_parts(ticket, attachments))
}

/// Create a ticket in a project (members only)
pub async fn create_ticket(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Json(request): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<TicketResponse>), ApiError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::validation("Please provide a ticket title"));
    }

    let project = get_project(&state.pool, request.project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    let roster = load_roster(&state.pool, &project).await?;
    authorize_ticket(&roster, auth.user_id, TicketAction::Create)?;

    let ticket = db::create_ticket(
        &state.pool,
        db::NewTicket {
            title,
            description: request.description.as_deref().unwrap_or(""),
            status: request.status.unwrap_or_default(),
            priority: request.priority.unwrap_or_default(),
            project_id: project.id,
            assignee_id: request.assignee,
            reporter_id: auth.user_id,
        },
    )
    .await?;

    tracing::info!("Ticket {} created in project {}", ticket.id, project.id);

    let response = ticket_response(&state, ticket).await?;
    state
        .channels
        .publish(project.id, TicketEvent::Created(response.clone()));

    Ok((StatusCode::CREATED, Json(response)))
}

/// List a project's tickets, newest first (members only)
pub async fn list_by_project(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<TicketResponse>>, ApiError> {
    let project = get_project(&state.pool, project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    let roster = load_roster(&state.pool, &project).await?;
    authorize_ticket(&roster, auth.user_id, TicketAction::List)?;

    let tickets = db::list_by_project(&state.pool, project_id).await?;
    let ids: Vec<Uuid> = tickets.iter().map(|t| t.id).collect();
    let mut attachments = db::attachments_for_tickets(&state.pool, &ids).await?;

    let responses = tickets
        .into_iter()
        .map(|ticket| {
            let atts = attachments.remove(&ticket.id).unwrap_or_default();
            TicketResponse::from_parts(ticket, atts)
        })
        .collect();

    Ok(Json(responses))
}

/// Update a ticket's fields (members only)
///
/// Unspecified fields are left unchanged; project and reporter are
/// immutable and not part of the request shape.
pub async fn update_ticket(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTicketRequest>,
) -> Result<Json<TicketResponse>, ApiError> {
    let mut ticket = db::get_ticket(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Ticket"))?;

    let project = get_project(&state.pool, ticket.project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    let roster = load_roster(&state.pool, &project).await?;
    authorize_ticket(&roster, auth.user_id, TicketAction::Update)?;

    if let Some(title) = request.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::validation("Please provide a ticket title"));
        }
        ticket.title = title;
    }
    if let Some(description) = request.description {
        ticket.description = description;
    }
    if let Some(status) = request.status {
        ticket.status = status;
    }
    if let Some(priority) = request.priority {
        ticket.priority = priority;
    }
    if let Some(assignee) = request.assignee {
        ticket.assignee_id = assignee;
    }

    let updated = db::update_ticket(&state.pool, &ticket).await?;

    let response = ticket_response(&state, updated).await?;
    state
        .channels
        .publish(project.id, TicketEvent::Updated(response.clone()));

    Ok(Json(response))
}

/// Delete a ticket (reporter or project owner only)
pub async fn delete_ticket(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ticket = db::get_ticket(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Ticket"))?;

    let project = get_project(&state.pool, ticket.project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    let roster = load_roster(&state.pool, &project).await?;
    authorize_ticket(
        &roster,
        auth.user_id,
        TicketAction::Delete {
            reporter: ticket.reporter_id,
        },
    )?;

    db::delete_ticket(&state.pool, id).await?;

    tracing::info!("Ticket {} deleted from project {}", id, project.id);

    state.channels.publish(project.id, TicketEvent::Deleted(id));

    Ok(Json(serde_json::json!({ "message": "Ticket removed" })))
}

/// Append uploaded-file descriptors to a ticket (members only)
///
/// # Errors
///
/// * `validation` - empty upload set, or more than 5 files in one request
pub async fn add_attachments(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AddAttachmentsRequest>,
) -> Result<Json<TicketResponse>, ApiError> {
    if request.attachments.is_empty() {
        return Err(ApiError::validation("No files uploaded"));
    }
    if request.attachments.len() > MAX_ATTACHMENTS_PER_REQUEST {
        return Err(ApiError::validation(format!(
            "At most {MAX_ATTACHMENTS_PER_REQUEST} attachments may be uploaded per request"
        )));
    }

    let ticket = db::get_ticket(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Ticket"))?;

    let project = get_project(&state.pool, ticket.project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    let roster = load_roster(&state.pool, &project).await?;
    authorize_ticket(&roster, auth.user_id, TicketAction::AddAttachments)?;

    db::add_attachments(&state.pool, ticket.id, &request.attachments).await?;

    Ok(Json(ticket_response(&state, ticket).await?))
}

/// Remove one attachment from a ticket (role-gated)
///
/// Removal of an id that is already absent is a tolerated no-op: the
/// resulting state is the requested one either way.
pub async fn remove_attachment(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path((id, attachment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TicketResponse>, ApiError> {
    let ticket = db::get_ticket(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Ticket"))?;

    let project = get_project(&state.pool, ticket.project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    let roster = load_roster(&state.pool, &project).await?;
    authorize_ticket(&roster, auth.user_id, TicketAction::RemoveAttachment)?;

    let removed = db::remove_attachment(&state.pool, ticket.id, attachment_id).await?;
    if !removed {
        tracing::debug!("Attachment {attachment_id} already absent from ticket {id}");
    }

    Ok(Json(ticket_response(&state, ticket).await?))
}
