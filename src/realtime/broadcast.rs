/**
 * Per-Project Event Broadcasting
 *
 * Events are broadcast using `tokio::sync::broadcast`. Each project gets
 * its own channel so subscribers never see another project's traffic.
 * Channels are created lazily on first subscription or publish and are
 * reaped by a periodic cleanup once they have no subscribers left.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::realtime::event::TicketEvent;

/// Capacity of each per-project channel
///
/// A slow subscriber that falls more than this many events behind lags
/// (skips ahead) rather than blocking publishers.
const CHANNEL_CAPACITY: usize = 256;

/// Registry of per-project broadcast channels
///
/// Cloning is cheap; all clones share the same registry. The mutation
/// coordinator holds one handle (via `AppState`) and publishes through it
/// explicitly - there is no ambient global bus.
#[derive(Clone)]
pub struct ProjectChannels {
    channels: Arc<Mutex<HashMap<Uuid, broadcast::Sender<TicketEvent>>>>,
}

impl ProjectChannels {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Subscribe to a project's channel, creating it if needed
    pub fn subscribe(&self, project_id: Uuid) -> broadcast::Receiver<TicketEvent> {
        let mut channels = self.channels.lock().expect("channel registry poisoned");
        channels
            .entry(project_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish an event to a project's channel
    ///
    /// Returns the number of subscribers that received the event. A
    /// missing channel or an empty one is not an error: the originating
    /// mutation already succeeded and fan-out is best-effort.
    pub fn publish(&self, project_id: Uuid, event: TicketEvent) -> usize {
        let sender = {
            let channels = self.channels.lock().expect("channel registry poisoned");
            channels.get(&project_id).cloned()
        };

        let Some(sender) = sender else {
            tracing::debug!("[Realtime] No channel for project {project_id}, dropping event");
            return 0;
        };

        match sender.send(event) {
            Ok(subscriber_count) => {
                tracing::debug!(
                    "[Realtime] Event broadcast to {subscriber_count} subscribers of project {project_id}"
                );
                subscriber_count
            }
            Err(_) => {
                tracing::debug!("[Realtime] No subscribers on project {project_id}");
                0
            }
        }
    }

    /// Drop channels with no remaining subscribers
    pub fn cleanup_idle(&self) {
        self.channels
            .lock()
            .expect("channel registry poisoned")
            .retain(|_, sender| sender.receiver_count() > 0);
    }

    /// Subscriber count for a project's channel
    pub fn subscriber_count(&self, project_id: Uuid) -> usize {
        self.channels
            .lock()
            .expect("channel registry poisoned")
            .get(&project_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for ProjectChannels {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_with_no_channel_is_noop() {
        let channels = ProjectChannels::new();
        let delivered = channels.publish(Uuid::new_v4(), TicketEvent::Deleted(Uuid::new_v4()));
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_exactly_one_event_per_publish() {
        let channels = ProjectChannels::new();
        let project = Uuid::new_v4();
        let ticket = Uuid::new_v4();

        let mut rx = channels.subscribe(project);
        let delivered = channels.publish(project, TicketEvent::Deleted(ticket));
        assert_eq!(delivered, 1);

        let event = rx.recv().await.unwrap();
        match event {
            TicketEvent::Deleted(id) => assert_eq!(id, ticket),
            other => panic!("unexpected event: {:?}", other.name()),
        }

        // Nothing else is pending.
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_channels_are_isolated_per_project() {
        let channels = ProjectChannels::new();
        let project_a = Uuid::new_v4();
        let project_b = Uuid::new_v4();

        let mut rx_a = channels.subscribe(project_a);
        let mut rx_b = channels.subscribe(project_b);

        channels.publish(project_a, TicketEvent::Deleted(Uuid::new_v4()));

        assert!(rx_a.try_recv().is_ok());
        assert!(matches!(
            rx_b.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_all_subscribers_receive_the_event() {
        let channels = ProjectChannels::new();
        let project = Uuid::new_v4();

        let mut rx1 = channels.subscribe(project);
        let mut rx2 = channels.subscribe(project);
        let mut rx3 = channels.subscribe(project);

        let delivered = channels.publish(project, TicketEvent::Deleted(Uuid::new_v4()));
        assert_eq!(delivered, 3);

        for rx in [&mut rx1, &mut rx2, &mut rx3] {
            assert!(rx.try_recv().is_ok());
        }
    }

    #[tokio::test]
    async fn test_cleanup_reaps_idle_channels() {
        let channels = ProjectChannels::new();
        let project = Uuid::new_v4();

        let rx = channels.subscribe(project);
        assert_eq!(channels.subscriber_count(project), 1);

        drop(rx);
        channels.cleanup_idle();
        assert_eq!(channels.subscriber_count(project), 0);

        // Publishing after cleanup is still a harmless no-op.
        assert_eq!(
            channels.publish(project, TicketEvent::Deleted(Uuid::new_v4())),
            0
        );
    }
}
