use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::EntityScope;

/// Unique identifier for a role record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(i64);

impl RoleId {
    /// Creates a role identifier from a stored value.
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

impl std::fmt::Display for RoleId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Node of the role tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Stable role identifier.
    pub id: RoleId,
    /// Human-readable role name.
    pub name: String,
    /// Parent role, absent only for the root.
    pub parent_id: Option<RoleId>,
    /// External entity the role is bound to, if any.
    pub scope: Option<EntityScope>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub modified_at: DateTime<Utc>,
}

impl Role {
    /// Returns whether this role is the root of the tree.
    ///
    /// This is the only root predicate used across the workspace.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
