use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EntityScope, RoleId, UserId};

/// Unique identifier for a permission record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(i64);

impl PermissionId {
    /// Creates a permission identifier from a stored value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PermissionId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// The single record a permission is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PermissionOwner {
    /// Permission granted to every member of a role.
    Role(RoleId),
    /// Permission granted directly to a user.
    User(UserId),
}

impl PermissionOwner {
    /// Returns the owning role, if role-owned.
    #[must_use]
    pub fn role_id(&self) -> Option<RoleId> {
        match self {
            Self::Role(role_id) => Some(*role_id),
            Self::User(_) => None,
        }
    }

    /// Returns the owning user, if user-owned.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Role(_) => None,
            Self::User(user_id) => Some(*user_id),
        }
    }
}

impl std::fmt::Display for PermissionOwner {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Role(role_id) => write!(formatter, "role '{role_id}'"),
            Self::User(user_id) => write!(formatter, "user '{user_id}'"),
        }
    }
}

/// Named grant attached to a role or a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    /// Stable permission identifier.
    pub id: PermissionId,
    /// Opaque permission name.
    pub name: String,
    /// Marks copies made from a parent role.
    pub inherited: bool,
    /// External entity the grant is limited to, if any.
    pub scope: Option<EntityScope>,
    /// Record the grant belongs to.
    pub owner: PermissionOwner,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
