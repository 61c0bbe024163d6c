/**
 * Real-time Subscription Handler
 *
 * Server-Sent Events handler for `GET /realtime/{project_id}`. Opening the
 * stream joins the caller to that project's channel; dropping the
 * connection leaves it.
 *
 * # Server-Sent Events (SSE)
 *
 * SSE gives a one-way stream from server to client, which is all the
 * event contract needs. Each pushed event uses the event kind as the SSE
 * event name (`ticket-created`, `ticket-updated`, `ticket-deleted`) and
 * the serialized ticket state (or deleted id) as the data line.
 *
 * # Join Semantics
 *
 * Joining performs no membership check: any connected client that knows a
 * project id can subscribe to its channel, decoupled from the membership
 * check enforced on HTTP reads. This mirrors the inherited behavior of
 * the system; see DESIGN.md for the discussion of this gap.
 *
 * # Connection Management
 *
 * - Connections are kept alive with the SSE keep-alive mechanism
 * - A lagged subscriber skips ahead; the connection is not dropped
 * - Disconnect drops the receiver, removing the client from the channel
 */

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream;
use uuid::Uuid;

use crate::realtime::broadcast::ProjectChannels;

/// Handle a real-time subscription (GET /realtime/{project_id})
pub async fn subscribe_project(
    State(channels): State<ProjectChannels>,
    Path(project_id): Path<Uuid>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, axum::Error>>> {
    tracing::info!("[Realtime] Client joining project {project_id}");

    let rx = channels.subscribe(project_id);

    let stream = stream::unfold(rx, move |mut rx| async move {
        // Loop until an event can be delivered or the channel closes.
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let data = match event.payload() {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::error!("[Realtime] Failed to serialize event: {e}");
                            continue;
                        }
                    };

                    let sse_event = Event::default().event(event.name()).data(data);
                    return Some((Ok(sse_event), rx));
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] Subscriber lagged, skipped {skipped} events");
                    continue;
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    tracing::debug!("[Realtime] Channel closed, ending stream");
                    return None;
                }
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
