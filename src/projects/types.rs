/**
 * Project Handler Types
 *
 * Request and response types for the project endpoints. Responses use the
 * camelCase wire format of the public API.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authz::Role;
use crate::projects::db::{MemberRow, ProjectWithOwner};

/// Create-project request
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial project update; absent fields are left unchanged
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Add-member request. The target is identified by email.
#[derive(Deserialize, Serialize, Debug)]
pub struct AddMemberRequest {
    pub email: String,
    /// Defaults to Developer when omitted
    #[serde(default)]
    pub role: Option<Role>,
}

/// A user reference embedded in project responses
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// One roster entry in a project response
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MemberResponse {
    pub user: UserSummary,
    pub role: Role,
}

/// Full project representation with owner and roster
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner: UserSummary,
    pub team_members: Vec<MemberResponse>,
    pub created_at: DateTime<Utc>,
}

/// Slim project representation used by the listing endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListItem {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner: UserSummary,
    pub created_at: DateTime<Utc>,
}

impl From<MemberRow> for MemberResponse {
    fn from(row: MemberRow) -> Self {
        Self {
            user: UserSummary {
                id: row.user_id,
                name: row.name,
                email: row.email,
            },
            role: row.role,
        }
    }
}

impl From<ProjectWithOwner> for ProjectListItem {
    fn from(row: ProjectWithOwner) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            owner: UserSummary {
                id: row.owner_id,
                name: row.owner_name,
                email: row.owner_email,
            },
            created_at: row.created_at,
        }
    }
}
