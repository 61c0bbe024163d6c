//! Real-time Event Module
//!
//! Per-project event channels that push ticket changes to connected
//! clients over Server-Sent Events.
//!
//! # Architecture
//!
//! - **`event`** - The typed ticket events and their wire names
//! - **`broadcast`** - The per-project channel registry
//! - **`subscription`** - The SSE subscription handler
//!
//! # Delivery Contract
//!
//! Delivery is best-effort and at-most-once. Events are ordered only by
//! publish order within this process. Channel membership is in-memory and
//! not persisted: a client that disconnects and reconnects has no way to
//! recover events missed during the gap.
//!
//! Publishing is decoupled from the originating mutation - a publish
//! failure (or an empty channel) never fails or rolls back the mutation
//! that produced the event.

pub mod broadcast;
pub mod event;
pub mod subscription;

pub use broadcast::ProjectChannels;
pub use event::TicketEvent;
