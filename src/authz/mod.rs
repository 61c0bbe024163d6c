//! Authorization Engine
//!
//! A pure decision layer consulted before every mutation. Given the actor,
//! the freshly loaded resource state, and the requested action, it returns
//! allow or a `Forbidden` error. It performs no I/O of its own.
//!
//! # Architecture
//!
//! - **`role`** - The closed `Role` enum and its capability table
//! - **`engine`** - The membership roster view and the decision functions
//!
//! # Decision Matrix
//!
//! | Resource | Action                | Rule                                   |
//! |----------|-----------------------|----------------------------------------|
//! | Project  | read                  | actor is a member                      |
//! | Project  | update / delete       | actor is the owner                     |
//! | Project  | add / remove member   | actor is the owner                     |
//! | Ticket   | create / list / update| actor is a member                      |
//! | Ticket   | delete                | actor is the reporter or the owner     |
//! | Ticket   | attachment add        | actor is a member                      |
//! | Ticket   | attachment remove     | actor's role may `RemoveAttachment`    |
//! | Comment  | create / list         | actor is a member of the parent project|
//! | Comment  | delete                | actor is the author                    |
//!
//! Ticket mutation is open to any member (including `Viewer`) while
//! attachment removal is role-gated. That asymmetry is inherited behavior
//! and is preserved exactly.

pub mod engine;
pub mod role;

pub use engine::{
    authorize_comment_create, authorize_comment_delete, authorize_comment_read, authorize_project,
    authorize_ticket, ProjectAction, Roster, RosterEntry, TicketAction,
};
pub use role::{Capability, Role};
