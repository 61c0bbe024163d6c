//! Integration tests for the ticket lifecycle and attachment gating
//!
//! Requires a PostgreSQL test database; run with `cargo test -- --ignored`.

mod common;

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::response::Json;
use serial_test::serial;
use uuid::Uuid;

use bugline::authz::Role;
use bugline::error::ApiError;
use bugline::projects::handlers::get_project as get_project_handler;
use bugline::tickets::db::list_attachments;
use bugline::tickets::handlers::{
    add_attachments, delete_ticket, list_by_project, remove_attachment,
};
use bugline::tickets::types::{AddAttachmentsRequest, AttachmentUpload};

use common::{auth_for, seed_project, seed_ticket, seed_user, TestDatabase};

fn upload(filename: &str) -> AttachmentUpload {
    AttachmentUpload {
        filename: filename.to_string(),
        storage_path: format!("uploads/{filename}"),
        mime_type: "image/png".to_string(),
        size: 2048,
        url: format!("/uploads/{filename}"),
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn deleted_ticket_disappears_from_project_listing() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let state = db.app_state();

    let owner = seed_user(pool, "Alice", "alice@example.com").await;
    let project = seed_project(pool, &owner, &[]).await;
    let ticket = seed_ticket(pool, &project, &owner).await;

    delete_ticket(State(state.clone()), auth_for(&owner), Path(ticket.id))
        .await
        .unwrap();

    let Json(tickets) = list_by_project(State(state), auth_for(&owner), Path(project.id))
        .await
        .unwrap();
    assert!(tickets.iter().all(|t| t.id != ticket.id));
    assert!(tickets.is_empty());
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn only_reporter_or_owner_deletes_a_ticket() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let state = db.app_state();

    let owner = seed_user(pool, "Alice", "alice@example.com").await;
    let reporter = seed_user(pool, "Bob", "bob@example.com").await;
    let other = seed_user(pool, "Carol", "carol@example.com").await;
    let project = seed_project(
        pool,
        &owner,
        &[(&reporter, Role::Developer), (&other, Role::Developer)],
    )
    .await;
    let ticket = seed_ticket(pool, &project, &reporter).await;

    let denied = delete_ticket(State(state.clone()), auth_for(&other), Path(ticket.id)).await;
    assert_matches!(denied, Err(ApiError::Forbidden(_)));

    delete_ticket(State(state), auth_for(&reporter), Path(ticket.id))
        .await
        .unwrap();
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn attachment_removal_is_role_gated() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let state = db.app_state();

    let owner = seed_user(pool, "Alice", "alice@example.com").await;
    let developer = seed_user(pool, "Bob", "bob@example.com").await;
    let viewer = seed_user(pool, "Carol", "carol@example.com").await;
    let project = seed_project(
        pool,
        &owner,
        &[(&developer, Role::Developer), (&viewer, Role::Viewer)],
    )
    .await;
    let ticket = seed_ticket(pool, &project, &owner).await;

    add_attachments(
        State(state.clone()),
        auth_for(&developer),
        Path(ticket.id),
        Json(AddAttachmentsRequest {
            attachments: vec![upload("trace.png"), upload("log.txt")],
        }),
    )
    .await
    .unwrap();

    let attachments = list_attachments(pool, ticket.id).await.unwrap();
    assert_eq!(attachments.len(), 2);

    // Viewer is denied by the capability table.
    let denied = remove_attachment(
        State(state.clone()),
        auth_for(&viewer),
        Path((ticket.id, attachments[0].id)),
    )
    .await;
    assert_matches!(denied, Err(ApiError::Forbidden(_)));

    // Developer passes.
    let Json(response) = remove_attachment(
        State(state),
        auth_for(&developer),
        Path((ticket.id, attachments[0].id)),
    )
    .await
    .unwrap();
    assert_eq!(response.attachments.len(), 1);
    assert_eq!(response.attachments[0].filename, "log.txt");
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn empty_and_oversized_uploads_are_rejected() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let state = db.app_state();

    let owner = seed_user(pool, "Alice", "alice@example.com").await;
    let project = seed_project(pool, &owner, &[]).await;
    let ticket = seed_ticket(pool, &project, &owner).await;

    let empty = add_attachments(
        State(state.clone()),
        auth_for(&owner),
        Path(ticket.id),
        Json(AddAttachmentsRequest {
            attachments: vec![],
        }),
    )
    .await;
    assert_matches!(empty, Err(ApiError::Validation(_)));

    let six = (0..6).map(|i| upload(&format!("file-{i}.png"))).collect();
    let oversized = add_attachments(
        State(state),
        auth_for(&owner),
        Path(ticket.id),
        Json(AddAttachmentsRequest { attachments: six }),
    )
    .await;
    assert_matches!(oversized, Err(ApiError::Validation(_)));
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn removing_an_absent_attachment_is_a_noop() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let state = db.app_state();

    let owner = seed_user(pool, "Alice", "alice@example.com").await;
    let project = seed_project(pool, &owner, &[]).await;
    let ticket = seed_ticket(pool, &project, &owner).await;

    let Json(response) = remove_attachment(
        State(state),
        auth_for(&owner),
        Path((ticket.id, Uuid::new_v4())),
    )
    .await
    .unwrap();
    assert!(response.attachments.is_empty());
}

/// A denial on an existing-but-inaccessible project is `forbidden`, not
/// `not_found`; a missing id is `not_found`.
#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn forbidden_is_distinct_from_not_found() {
    let db = TestDatabase::new().await;
    let pool = db.pool();

    let owner = seed_user(pool, "Alice", "alice@example.com").await;
    let outsider = seed_user(pool, "Dave", "dave@example.com").await;
    let project = seed_project(pool, &owner, &[]).await;

    let denied = get_project_handler(
        State(pool.clone()),
        auth_for(&outsider),
        Path(project.id),
    )
    .await;
    assert_matches!(denied, Err(ApiError::Forbidden(_)));

    let missing = get_project_handler(
        State(pool.clone()),
        auth_for(&outsider),
        Path(Uuid::new_v4()),
    )
    .await;
    assert_matches!(missing, Err(ApiError::NotFound(_)));
}
