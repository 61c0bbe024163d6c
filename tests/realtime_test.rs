//! Integration tests for the real-time event contract
//!
//! Requires a PostgreSQL test database; run with `cargo test -- --ignored`.

mod common;

use axum::extract::{Path, State};
use axum::response::Json;
use serial_test::serial;
use tokio::sync::broadcast::error::TryRecvError;

use bugline::realtime::TicketEvent;
use bugline::tickets::db::get_ticket;
use bugline::tickets::handlers::{create_ticket, delete_ticket, update_ticket};
use bugline::tickets::types::{
    CreateTicketRequest, TicketStatus, UpdateTicketRequest,
};

use common::{auth_for, seed_project, seed_ticket, seed_user, TestDatabase};

/// One successful ticket update produces exactly one `ticket-updated`
/// event on the project's channel, carrying the persisted post-update
/// state.
#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn update_publishes_exactly_one_event_with_persisted_state() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let state = db.app_state();

    let owner = seed_user(pool, "Alice", "alice@example.com").await;
    let project = seed_project(pool, &owner, &[]).await;
    let ticket = seed_ticket(pool, &project, &owner).await;

    let mut rx = state.channels.subscribe(project.id);

    let request = UpdateTicketRequest {
        status: Some(TicketStatus::InProgress),
        ..Default::default()
    };
    update_ticket(
        State(state.clone()),
        auth_for(&owner),
        Path(ticket.id),
        Json(request),
    )
    .await
    .unwrap();

    let event = rx.recv().await.unwrap();
    let payload = match event {
        TicketEvent::Updated(payload) => payload,
        other => panic!("expected ticket-updated, got {}", other.name()),
    };

    // Payload matches what the store now holds.
    let persisted = get_ticket(pool, ticket.id).await.unwrap().unwrap();
    assert_eq!(payload.id, persisted.id);
    assert_eq!(payload.status, persisted.status);
    assert_eq!(payload.status, TicketStatus::InProgress);

    // Exactly one event per mutation.
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn create_and_delete_publish_their_events() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let state = db.app_state();

    let owner = seed_user(pool, "Alice", "alice@example.com").await;
    let project = seed_project(pool, &owner, &[]).await;

    let mut rx = state.channels.subscribe(project.id);

    let (_, Json(created)) = create_ticket(
        State(state.clone()),
        auth_for(&owner),
        Json(CreateTicketRequest {
            title: "Broken build".to_string(),
            description: None,
            status: None,
            priority: None,
            assignee: None,
            project_id: project.id,
        }),
    )
    .await
    .unwrap();

    match rx.recv().await.unwrap() {
        TicketEvent::Created(payload) => assert_eq!(payload.id, created.id),
        other => panic!("expected ticket-created, got {}", other.name()),
    }

    delete_ticket(State(state.clone()), auth_for(&owner), Path(created.id))
        .await
        .unwrap();

    match rx.recv().await.unwrap() {
        TicketEvent::Deleted(id) => assert_eq!(id, created.id),
        other => panic!("expected ticket-deleted, got {}", other.name()),
    }
}

/// A subscriber on a different project's channel sees none of the traffic.
#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn events_stay_on_their_project_channel() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let state = db.app_state();

    let owner = seed_user(pool, "Alice", "alice@example.com").await;
    let project_a = seed_project(pool, &owner, &[]).await;
    let ticket = seed_ticket(pool, &project_a, &owner).await;

    let other_owner = seed_user(pool, "Bob", "bob@example.com").await;
    let project_b = seed_project(pool, &other_owner, &[]).await;

    let mut rx_b = state.channels.subscribe(project_b.id);

    update_ticket(
        State(state.clone()),
        auth_for(&owner),
        Path(ticket.id),
        Json(UpdateTicketRequest {
            title: Some("Renamed".to_string()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    assert!(matches!(rx_b.try_recv(), Err(TryRecvError::Empty)));
}
