/**
 * Authorization Decisions
 *
 * Pure decision functions over a freshly loaded membership roster. Handlers
 * load the roster inside the same request that performs the mutation, so a
 * decision is never made against cached or stale membership state.
 *
 * Every denial is `ApiError::Forbidden`, which is distinct from `NotFound`:
 * the caller resolves resource existence before consulting this engine.
 */

use uuid::Uuid;

use crate::authz::role::{Capability, Role};
use crate::error::ApiError;

/// One roster entry: a member and their per-project role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterEntry {
    pub user_id: Uuid,
    pub role: Role,
}

/// The membership roster of a single project, as loaded for one request
///
/// The owner's entry is materialized into the roster at project creation
/// with role `Admin` and can never be removed, so `role_of(owner)` is
/// always `Some(Admin)` for a well-formed roster.
#[derive(Debug, Clone)]
pub struct Roster {
    pub owner: Uuid,
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(owner: Uuid, entries: Vec<RosterEntry>) -> Self {
        Self { owner, entries }
    }

    /// Membership ledger contract: is the user on this project's roster?
    pub fn is_member(&self, user: Uuid) -> bool {
        self.entries.iter().any(|entry| entry.user_id == user)
    }

    /// Membership ledger contract: the user's role, if any
    pub fn role_of(&self, user: Uuid) -> Option<Role> {
        self.entries
            .iter()
            .find(|entry| entry.user_id == user)
            .map(|entry| entry.role)
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }
}

/// Project-scoped actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAction {
    Read,
    Update,
    Delete,
    ManageMembers,
}

/// Ticket-scoped actions
///
/// `Delete` carries the ticket's reporter because deletion is permitted to
/// the reporter as well as the project owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketAction {
    Create,
    List,
    Update,
    Delete { reporter: Uuid },
    AddAttachments,
    RemoveAttachment,
}

/// Decide a project-scoped action
pub fn authorize_project(
    roster: &Roster,
    actor: Uuid,
    action: ProjectAction,
) -> Result<(), ApiError> {
    match action {
        ProjectAction::Read => require_member(roster, actor, "Not authorized to view this project"),
        ProjectAction::Update => {
            require_owner(roster, actor, "Not authorized to update this project")
        }
        ProjectAction::Delete => {
            require_owner(roster, actor, "Not authorized to delete this project")
        }
        ProjectAction::ManageMembers => require_owner(
            roster,
            actor,
            "Not authorized to manage team for this project",
        ),
    }
}

/// Decide a ticket-scoped action against the parent project's roster
pub fn authorize_ticket(roster: &Roster, actor: Uuid, action: TicketAction) -> Result<(), ApiError> {
    match action {
        TicketAction::Create => require_member(
            roster,
            actor,
            "Not authorized to create tickets in this project",
        ),
        TicketAction::List => require_member(
            roster,
            actor,
            "Not authorized to view tickets for this project",
        ),
        TicketAction::Update => require_member(roster, actor, "Not authorized to update this ticket"),
        TicketAction::Delete { reporter } => {
            if actor == reporter || actor == roster.owner {
                Ok(())
            } else {
                Err(ApiError::forbidden("Not authorized to delete this ticket"))
            }
        }
        TicketAction::AddAttachments => require_member(
            roster,
            actor,
            "Not authorized to add attachments to this ticket",
        ),
        TicketAction::RemoveAttachment => {
            // Non-members fall through to Viewer, which the table denies.
            let role = roster.role_of(actor).unwrap_or(Role::Viewer);
            if role.allows(Capability::RemoveAttachment) {
                Ok(())
            } else {
                Err(ApiError::forbidden("Not authorized to remove attachments"))
            }
        }
    }
}

/// Comment creation: the actor must be able to read the parent ticket,
/// which resolves comment -> ticket -> project membership
pub fn authorize_comment_create(roster: &Roster, actor: Uuid) -> Result<(), ApiError> {
    require_member(roster, actor, "Not authorized to comment on this ticket")
}

/// Comment listing follows the same membership rule as creation
pub fn authorize_comment_read(roster: &Roster, actor: Uuid) -> Result<(), ApiError> {
    require_member(
        roster,
        actor,
        "Not authorized to view comments for this ticket",
    )
}

/// Comment deletion is author-only; membership is not consulted
pub fn authorize_comment_delete(author: Uuid, actor: Uuid) -> Result<(), ApiError> {
    if actor == author {
        Ok(())
    } else {
        Err(ApiError::forbidden("Not authorized to delete this comment"))
    }
}

fn require_member(roster: &Roster, actor: Uuid, denial: &str) -> Result<(), ApiError> {
    if roster.is_member(actor) {
        Ok(())
    } else {
        Err(ApiError::forbidden(denial))
    }
}

fn require_owner(roster: &Roster, actor: Uuid, denial: &str) -> Result<(), ApiError> {
    if actor == roster.owner {
        Ok(())
    } else {
        Err(ApiError::forbidden(denial))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn roster_with(owner: Uuid, members: &[(Uuid, Role)]) -> Roster {
        let mut entries = vec![RosterEntry {
            user_id: owner,
            role: Role::Admin,
        }];
        entries.extend(members.iter().map(|(user_id, role)| RosterEntry {
            user_id: *user_id,
            role: *role,
        }));
        Roster::new(owner, entries)
    }

    #[test]
    fn test_owner_is_always_admin() {
        let owner = Uuid::new_v4();
        let roster = roster_with(owner, &[]);
        assert_eq!(roster.role_of(owner), Some(Role::Admin));
        assert!(roster.is_member(owner));
    }

    #[test]
    fn test_non_member_denied_everything() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let roster = roster_with(owner, &[]);

        for action in [
            ProjectAction::Read,
            ProjectAction::Update,
            ProjectAction::Delete,
            ProjectAction::ManageMembers,
        ] {
            assert_matches!(
                authorize_project(&roster, stranger, action),
                Err(ApiError::Forbidden(_))
            );
        }
        for action in [
            TicketAction::Create,
            TicketAction::List,
            TicketAction::Update,
            TicketAction::AddAttachments,
            TicketAction::RemoveAttachment,
        ] {
            assert_matches!(
                authorize_ticket(&roster, stranger, action),
                Err(ApiError::Forbidden(_))
            );
        }
        assert_matches!(
            authorize_comment_create(&roster, stranger),
            Err(ApiError::Forbidden(_))
        );
        assert_matches!(
            authorize_comment_read(&roster, stranger),
            Err(ApiError::Forbidden(_))
        );
    }

    #[test]
    fn test_any_member_may_read_and_mutate_tickets() {
        let owner = Uuid::new_v4();
        let viewer = Uuid::new_v4();
        let roster = roster_with(owner, &[(viewer, Role::Viewer)]);

        assert!(authorize_project(&roster, viewer, ProjectAction::Read).is_ok());
        assert!(authorize_ticket(&roster, viewer, TicketAction::Create).is_ok());
        assert!(authorize_ticket(&roster, viewer, TicketAction::List).is_ok());
        assert!(authorize_ticket(&roster, viewer, TicketAction::Update).is_ok());
        assert!(authorize_ticket(&roster, viewer, TicketAction::AddAttachments).is_ok());
    }

    #[test]
    fn test_only_owner_mutates_project() {
        let owner = Uuid::new_v4();
        let admin = Uuid::new_v4();
        // Even a non-owner Admin cannot update, delete, or manage the team.
        let roster = roster_with(owner, &[(admin, Role::Admin)]);

        for action in [
            ProjectAction::Update,
            ProjectAction::Delete,
            ProjectAction::ManageMembers,
        ] {
            assert!(authorize_project(&roster, owner, action).is_ok());
            assert_matches!(
                authorize_project(&roster, admin, action),
                Err(ApiError::Forbidden(_))
            );
        }
    }

    #[test]
    fn test_attachment_removal_role_gate() {
        let owner = Uuid::new_v4();
        let developer = Uuid::new_v4();
        let viewer = Uuid::new_v4();
        let roster = roster_with(owner, &[(developer, Role::Developer), (viewer, Role::Viewer)]);

        assert!(authorize_ticket(&roster, developer, TicketAction::RemoveAttachment).is_ok());
        assert!(authorize_ticket(&roster, owner, TicketAction::RemoveAttachment).is_ok());
        assert_matches!(
            authorize_ticket(&roster, viewer, TicketAction::RemoveAttachment),
            Err(ApiError::Forbidden(_))
        );
    }

    #[test]
    fn test_ticket_delete_reporter_or_owner() {
        let owner = Uuid::new_v4();
        let reporter = Uuid::new_v4();
        let other = Uuid::new_v4();
        let roster = roster_with(
            owner,
            &[(reporter, Role::Developer), (other, Role::Developer)],
        );

        let action = TicketAction::Delete { reporter };
        assert!(authorize_ticket(&roster, reporter, action).is_ok());
        assert!(authorize_ticket(&roster, owner, action).is_ok());
        assert_matches!(
            authorize_ticket(&roster, other, action),
            Err(ApiError::Forbidden(_))
        );
    }

    #[test]
    fn test_comment_delete_author_only() {
        let author = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(authorize_comment_delete(author, author).is_ok());
        assert_matches!(
            authorize_comment_delete(author, other),
            Err(ApiError::Forbidden(_))
        );
    }
}
