/**
 * Ticket Events
 *
 * The three event kinds published after a successful ticket mutation.
 * Created/updated events carry the full post-mutation ticket state; the
 * deleted event carries only the deleted ticket's id.
 */

use uuid::Uuid;

use crate::tickets::types::TicketResponse;

/// A ticket change event on a project channel
#[derive(Debug, Clone)]
pub enum TicketEvent {
    Created(TicketResponse),
    Updated(TicketResponse),
    Deleted(Uuid),
}

impl TicketEvent {
    /// Wire name of the event, used as the SSE event field
    pub fn name(&self) -> &'static str {
        match self {
            TicketEvent::Created(_) => "ticket-created",
            TicketEvent::Updated(_) => "ticket-updated",
            TicketEvent::Deleted(_) => "ticket-deleted",
        }
    }

    /// Serialize the event payload for the wire
    pub fn payload(&self) -> Result<String, serde_json::Error> {
        match self {
            TicketEvent::Created(ticket) | TicketEvent::Updated(ticket) => {
                serde_json::to_string(ticket)
            }
            TicketEvent::Deleted(id) => serde_json::to_string(id),
        }
    }
}
