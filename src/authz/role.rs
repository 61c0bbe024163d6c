/**
 * Project Roles and Capabilities
 *
 * Roles are scoped per-project, never global. The set is closed: a value
 * outside it fails request deserialization and can never reach the store.
 *
 * Role-gated actions are expressed through the capability table in
 * `Role::allows` rather than ad-hoc role comparisons, so adding or auditing
 * a permission is a table edit.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-project membership role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Developer,
    Viewer,
}

/// Role-gated actions
///
/// Membership- and identity-based rules (member-only reads, owner-only
/// project mutation, reporter-or-owner ticket deletion) live in the engine;
/// a capability exists only where the rule depends on the member's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    RemoveAttachment,
}

impl Role {
    /// The wire and storage representation of this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Developer => "Developer",
            Role::Viewer => "Viewer",
        }
    }

    /// Capability table: which roles may perform a role-gated action
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::RemoveAttachment => {
                matches!(self, Role::Admin | Role::Manager | Role::Developer)
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Manager" => Ok(Role::Manager),
            "Developer" => Ok(Role::Developer),
            "Viewer" => Ok(Role::Viewer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

// Roles are stored as TEXT; encode/decode delegate to the string impls so no
// database-side enum type is required.
impl sqlx::Type<sqlx::Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Role::from_str(s).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Manager, Role::Developer, Role::Viewer] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(Role::from_str("Owner").is_err());
        assert!(Role::from_str("admin").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Role::Developer).unwrap();
        assert_eq!(json, "\"Developer\"");

        let role: Role = serde_json::from_str("\"Viewer\"").unwrap();
        assert_eq!(role, Role::Viewer);

        assert!(serde_json::from_str::<Role>("\"Intern\"").is_err());
    }

    #[test]
    fn test_remove_attachment_capability_table() {
        assert!(Role::Admin.allows(Capability::RemoveAttachment));
        assert!(Role::Manager.allows(Capability::RemoveAttachment));
        assert!(Role::Developer.allows(Capability::RemoveAttachment));
        assert!(!Role::Viewer.allows(Capability::RemoveAttachment));
    }
}
