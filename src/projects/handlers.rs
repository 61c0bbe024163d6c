/**
 * Project Handlers
 *
 * HTTP handlers for project CRUD and member management. Every write
 * follows the same sequence: load fresh state (404 if absent), consult
 * the authorization engine (403 if denied), apply the transition,
 * persist.
 *
 * Project mutations are not ticket-scoped, so none of them publish
 * real-time events.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::users::{get_user_by_email, get_user_by_id};
use crate::authz::{authorize_project, ProjectAction, Role};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::projects::db;
use crate::projects::types::{
    AddMemberRequest, CreateProjectRequest, MemberResponse, ProjectListItem, ProjectResponse,
    UpdateProjectRequest, UserSummary,
};

/// Assemble the full response shape: project plus owner and roster
async fn project_response(
    pool: &PgPool,
    project: &db::Project,
) -> Result<ProjectResponse, ApiError> {
    let owner = get_user_by_id(pool, project.owner_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let members = db::list_members(pool, project.id).await?;

    Ok(ProjectResponse {
        id: project.id,
        name: project.name.clone(),
        description: project.description.clone(),
        owner: UserSummary {
            id: owner.id,
            name: owner.name,
            email: owner.email,
        },
        team_members: members.into_iter().map(MemberResponse::from).collect(),
        created_at: project.created_at,
    })
}

/// Create a project; the creator becomes its owner
pub async fn create_project(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Please provide a project name"));
    }

    let description = request.description.unwrap_or_default();
    let project = db::create_project(&pool, name, description.trim(), auth.user_id).await?;

    tracing::info!("Project {} created by {}", project.id, auth.user_id);

    let response = project_response(&pool, &project).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// List all projects the caller belongs to
pub async fn list_projects(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
) -> Result<Json<Vec<ProjectListItem>>, ApiError> {
    let projects = db::list_projects_for_user(&pool, auth.user_id).await?;
    Ok(Json(projects.into_iter().map(ProjectListItem::from).collect()))
}

/// Get a single project (members only)
pub async fn get_project(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = db::get_project(&pool, id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    let roster = db::load_roster(&pool, &project).await?;
    authorize_project(&roster, auth.user_id, ProjectAction::Read)?;

    Ok(Json(project_response(&pool, &project).await?))
}

/// Update a project's name/description (owner only)
pub async fn update_project(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = db::get_project(&pool, id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    let roster = db::load_roster(&pool, &project).await?;
    authorize_project(&roster, auth.user_id, ProjectAction::Update)?;

    if let Some(name) = request.name.as_deref() {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Please provide a project name"));
        }
    }

    let updated = db::update_project(
        &pool,
        id,
        request.name.as_deref().map(str::trim),
        request.description.as_deref(),
    )
    .await?;

    Ok(Json(project_response(&pool, &updated).await?))
}

/// Delete a project (owner only)
pub async fn delete_project(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let project = db::get_project(&pool, id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    let roster = db::load_roster(&pool, &project).await?;
    authorize_project(&roster, auth.user_id, ProjectAction::Delete)?;

    db::delete_project(&pool, id).await?;

    tracing::info!("Project {} deleted by {}", id, auth.user_id);

    Ok(Json(serde_json::json!({ "message": "Project removed" })))
}

/// Add a team member by email (owner only)
///
/// # Errors
///
/// * `not_found` - no user with this email
/// * `invariant` - the target is the project owner (membership is implicit)
/// * `conflict` - the target already has a roster entry
pub async fn add_member(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AddMemberRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = db::get_project(&pool, id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    let roster = db::load_roster(&pool, &project).await?;
    authorize_project(&roster, auth.user_id, ProjectAction::ManageMembers)?;

    let target = get_user_by_email(&pool, &request.email)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if target.id == project.owner_id {
        return Err(ApiError::invariant("User is the project owner"));
    }

    let role = request.role.unwrap_or(Role::Developer);
    let inserted = db::add_member(&pool, id, target.id, role).await?;
    if !inserted {
        return Err(ApiError::conflict("User is already a member of this project"));
    }

    tracing::info!("User {} added to project {} as {}", target.id, id, role);

    Ok(Json(project_response(&pool, &project).await?))
}

/// Remove a team member (owner only)
///
/// # Errors
///
/// * `invariant` - the target is the owner, or has no roster entry
pub async fn remove_member(
    State(pool): State<PgPool>,
    AuthUser(auth): AuthUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = db::get_project(&pool, id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    let roster = db::load_roster(&pool, &project).await?;
    authorize_project(&roster, auth.user_id, ProjectAction::ManageMembers)?;

    if user_id == project.owner_id {
        return Err(ApiError::invariant(
            "Cannot remove the project owner from the team",
        ));
    }

    let removed = db::remove_member(&pool, id, user_id).await?;
    if !removed {
        return Err(ApiError::invariant("User is not a member of this project"));
    }

    tracing::info!("User {} removed from project {}", user_id, id);

    Ok(Json(project_response(&pool, &project).await?))
}
