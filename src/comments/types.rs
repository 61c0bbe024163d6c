/**
 * Comment Handler Types
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comments::db::CommentWithAuthor;

/// Create-comment request
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub text: String,
    pub ticket_id: Uuid,
}

/// The comment author reference embedded in responses
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CommentAuthor {
    pub id: Uuid,
    pub name: String,
}

/// Comment representation
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub text: String,
    pub user: CommentAuthor,
    pub ticket: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(row: CommentWithAuthor) -> Self {
        Self {
            id: row.id,
            text: row.text,
            user: CommentAuthor {
                id: row.user_id,
                name: row.user_name,
            },
            ticket: row.ticket_id,
            created_at: row.created_at,
        }
    }
}
