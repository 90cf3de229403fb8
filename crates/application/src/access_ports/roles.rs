use async_trait::async_trait;

use rolegate_core::AppResult;
use rolegate_domain::{EntityScope, Page, Pagination, Role, RoleId};

/// Row to insert into the role tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Role name.
    pub name: String,
    /// Parent role, absent only for the root bootstrap.
    pub parent_id: Option<RoleId>,
    /// External entity the role is bound to.
    pub scope: Option<EntityScope>,
}

/// Changes applied to an existing role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleChanges {
    /// New role name.
    pub name: Option<String>,
    /// New parent. Setting it replaces the role's inherited permissions.
    pub parent_id: Option<RoleId>,
}

/// Filter for role listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleQuery {
    /// Only children of this role.
    pub parent_id: Option<RoleId>,
    /// Case-insensitive substring match on the role name.
    pub search: Option<String>,
    /// Requested window.
    pub pagination: Pagination,
}

/// Repository port for the role tree.
///
/// Every mutating method is a single atomic unit against the backing store.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Finds a role by id.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Finds the role without a parent.
    async fn find_root_role(&self) -> AppResult<Option<Role>>;

    /// Lists roles matching the query together with the total match count.
    async fn list_roles(&self, query: RoleQuery) -> AppResult<Page<Role>>;

    /// Counts the direct children of a role.
    async fn count_children(&self, role_id: RoleId) -> AppResult<u64>;

    /// Inserts a role and copies its parent's permissions into it as
    /// inherited permissions.
    async fn insert_role(&self, role: NewRole) -> AppResult<Role>;

    /// Renames and/or reparents a role. Reparenting strips the role's
    /// inherited permissions and copies the new parent's permissions.
    ///
    /// The new parent is checked against the tree inside the same write:
    /// moving the root fails with `RoleRootCannotBeDeleted`, and a parent
    /// that is the role itself or one of its descendants fails with
    /// `RoleCannotBeItsParent`.
    async fn update_role(&self, role_id: RoleId, changes: RoleChanges) -> AppResult<Role>;

    /// Deletes a role with every permission it owns and detaches its members.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Copies every permission owned by `from` into `to` as inherited.
    /// Returns the number of copies made.
    async fn copy_permissions(&self, from: RoleId, to: RoleId) -> AppResult<u64>;

    /// Deletes the inherited permissions owned by a role.
    /// Returns the number of permissions removed.
    async fn remove_inherited_permissions(&self, role_id: RoleId) -> AppResult<u64>;
}
