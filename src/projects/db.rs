/**
 * Project Model and Roster Operations
 *
 * Database operations for projects and the membership ledger. Roster
 * mutations are atomic set operations (add-if-absent, remove-if-present)
 * applied directly by the store - never a load-splice-write-back of the
 * whole member list - so concurrent membership changes cannot overwrite
 * each other.
 */

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::authz::{Role, Roster, RosterEntry};

/// Project record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Immutable after creation
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A roster entry joined with the member's user record, for responses
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberRow {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// A project joined with its owner's user record, for listings
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectWithOwner {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub owner_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct RosterRow {
    user_id: Uuid,
    role: Role,
}

/// Create a project and seed its roster with the owner as Admin
///
/// Both rows are written in one transaction so no project is ever visible
/// without its owner's membership entry.
pub async fn create_project(
    pool: &PgPool,
    name: &str,
    description: &str,
    owner_id: Uuid,
) -> Result<Project, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let project = sqlx::query_as::<_, Project>(
        r#"
        INSERT INTO projects (id, name, description, owner_id, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, description, owner_id, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(owner_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO project_members (project_id, user_id, role, added_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(Role::Admin)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(project)
}

/// Get a project by id
pub async fn get_project(pool: &PgPool, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        r#"
        SELECT id, name, description, owner_id, created_at
        FROM projects
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// List all projects where the user is on the roster, newest first
pub async fn list_projects_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ProjectWithOwner>, sqlx::Error> {
    sqlx::query_as::<_, ProjectWithOwner>(
        r#"
        SELECT p.id, p.name, p.description, p.owner_id,
               u.name AS owner_name, u.email AS owner_email,
               p.created_at
        FROM projects p
        JOIN project_members m ON m.project_id = p.id
        JOIN users u ON u.id = p.owner_id
        WHERE m.user_id = $1
        ORDER BY p.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Update a project's fields; `None` leaves the field unchanged
pub async fn update_project(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        r#"
        UPDATE projects
        SET name = COALESCE($2, name),
            description = COALESCE($3, description)
        WHERE id = $1
        RETURNING id, name, description, owner_id, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
}

/// Delete a project; tickets, comments, and roster rows cascade
pub async fn delete_project(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Load the project's roster for authorization decisions
///
/// Always called inside the request that uses the decision, so the engine
/// never evaluates against stale membership state.
pub async fn load_roster(pool: &PgPool, project: &Project) -> Result<Roster, sqlx::Error> {
    let rows = sqlx::query_as::<_, RosterRow>(
        r#"
        SELECT user_id, role
        FROM project_members
        WHERE project_id = $1
        ORDER BY added_at
        "#,
    )
    .bind(project.id)
    .fetch_all(pool)
    .await?;

    let entries = rows
        .into_iter()
        .map(|row| RosterEntry {
            user_id: row.user_id,
            role: row.role,
        })
        .collect();

    Ok(Roster::new(project.owner_id, entries))
}

/// List roster entries joined with user records, in roster order
pub async fn list_members(pool: &PgPool, project_id: Uuid) -> Result<Vec<MemberRow>, sqlx::Error> {
    sqlx::query_as::<_, MemberRow>(
        r#"
        SELECT m.user_id, u.name, u.email, m.role
        FROM project_members m
        JOIN users u ON u.id = m.user_id
        WHERE m.project_id = $1
        ORDER BY m.added_at
        "#,
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

/// Add a member if absent. Returns false when the user already had an entry.
///
/// The insert is the atomicity boundary: two racing adds for different
/// users both land, and two racing adds for the same user resolve to one
/// row plus one `false`.
pub async fn add_member(
    pool: &PgPool,
    project_id: Uuid,
    user_id: Uuid,
    role: Role,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO project_members (project_id, user_id, role, added_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (project_id, user_id) DO NOTHING
        "#,
    )
    .bind(project_id)
    .bind(user_id)
    .bind(role)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Remove a member if present. Returns false when no entry existed.
pub async fn remove_member(
    pool: &PgPool,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM project_members
        WHERE project_id = $1 AND user_id = $2
        "#,
    )
    .bind(project_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
