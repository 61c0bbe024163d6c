/**
 * Ticket Types
 *
 * The closed status and priority enums, and the request/response types of
 * the ticket endpoints. The enums are validated at the serde boundary: a
 * value outside the set fails request deserialization and can never reach
 * the store.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::tickets::db::{Attachment, Ticket};

/// Ticket workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Highest,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::ToDo => "To Do",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Done => "Done",
        }
    }
}

impl Default for TicketStatus {
    fn default() -> Self {
        TicketStatus::ToDo
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "To Do" => Ok(TicketStatus::ToDo),
            "In Progress" => Ok(TicketStatus::InProgress),
            "Done" => Ok(TicketStatus::Done),
            other => Err(format!("unknown ticket status: {other}")),
        }
    }
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Medium => "Medium",
            TicketPriority::High => "High",
            TicketPriority::Highest => "Highest",
        }
    }
}

impl Default for TicketPriority {
    fn default() -> Self {
        TicketPriority::Medium
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(TicketPriority::Low),
            "Medium" => Ok(TicketPriority::Medium),
            "High" => Ok(TicketPriority::High),
            "Highest" => Ok(TicketPriority::Highest),
            other => Err(format!("unknown ticket priority: {other}")),
        }
    }
}

// Status and priority are stored as TEXT; delegate to the string impls.
macro_rules! text_column {
    ($ty:ty) => {
        impl sqlx::Type<sqlx::Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <&str as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                <$ty>::from_str(s).map_err(Into::into)
            }
        }
    };
}

text_column!(TicketStatus);
text_column!(TicketPriority);

/// Create-ticket request
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default)]
    pub assignee: Option<Uuid>,
    pub project_id: Uuid,
}

/// Partial ticket update
///
/// Absent fields are left unchanged. `assignee` distinguishes "absent"
/// (unchanged) from an explicit `null` (cleared).
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee: Option<Option<Uuid>>,
}

/// Distinguish a missing field from an explicit null
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// One uploaded-file descriptor, already materialized by the blob store
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentUpload {
    pub filename: String,
    pub storage_path: String,
    pub mime_type: String,
    pub size: i64,
    pub url: String,
}

/// Attachment-add request; at most 5 files per request
#[derive(Deserialize, Serialize, Debug)]
pub struct AddAttachmentsRequest {
    pub attachments: Vec<AttachmentUpload>,
}

/// One attachment in a ticket response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentResponse {
    pub id: Uuid,
    pub filename: String,
    pub storage_path: String,
    pub mime_type: String,
    pub size: i64,
    pub url: String,
}

/// Full ticket representation, as returned by handlers and carried in
/// real-time events
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub project: Uuid,
    pub assignee: Option<Uuid>,
    pub reporter: Uuid,
    pub attachments: Vec<AttachmentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Attachment> for AttachmentResponse {
    fn from(att: Attachment) -> Self {
        Self {
            id: att.id,
            filename: att.filename,
            storage_path: att.storage_path,
            mime_type: att.mime_type,
            size: att.size,
            url: att.url,
        }
    }
}

impl TicketResponse {
    pub fn from_parts(ticket: Ticket, attachments: Vec<Attachment>) -> Self {
        Self {
            id: ticket.id,
            title: ticket.title,
            description: ticket.description,
            status: ticket.status,
            priority: ticket.priority,
            project: ticket.project_id,
            assignee: ticket.assignee_id,
            reporter: ticket.reporter_id,
            attachments: attachments
                .into_iter()
                .map(AttachmentResponse::from)
                .collect(),
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TicketStatus::ToDo).unwrap(),
            "\"To Do\""
        );
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(serde_json::to_string(&TicketStatus::Done).unwrap(), "\"Done\"");
    }

    #[test]
    fn test_out_of_set_status_rejected() {
        let result: Result<UpdateTicketRequest, _> =
            serde_json::from_str(r#"{"status": "Archived"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_set_priority_rejected() {
        let result: Result<UpdateTicketRequest, _> =
            serde_json::from_str(r#"{"priority": "Urgent"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TicketStatus::default(), TicketStatus::ToDo);
        assert_eq!(TicketPriority::default(), TicketPriority::Medium);
    }

    #[test]
    fn test_update_assignee_absent_vs_null() {
        let absent: UpdateTicketRequest = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(absent.assignee, None);

        let cleared: UpdateTicketRequest = serde_json::from_str(r#"{"assignee": null}"#).unwrap();
        assert_eq!(cleared.assignee, Some(None));

        let id = Uuid::new_v4();
        let assigned: UpdateTicketRequest =
            serde_json::from_str(&format!(r#"{{"assignee": "{id}"}}"#)).unwrap();
        assert_eq!(assigned.assignee, Some(Some(id)));
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in [
            TicketStatus::ToDo,
            TicketStatus::InProgress,
            TicketStatus::Done,
        ] {
            assert_eq!(TicketStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(TicketStatus::from_str("todo").is_err());
    }
}
