use async_trait::async_trait;

use rolegate_core::AppResult;
use rolegate_domain::{
    EntityScope, Page, Pagination, Permission, PermissionId, PermissionOwner, RoleId, UserId,
};

/// Row to insert into the permission store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPermission {
    /// Opaque permission name.
    pub name: String,
    /// Record the permission is attached to.
    pub owner: PermissionOwner,
    /// External entity the grant is limited to.
    pub scope: Option<EntityScope>,
    /// Marks copies made from a parent role.
    pub inherited: bool,
}

/// Filter shared by permission listings and counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionFilter {
    /// Only permissions owned by this role.
    pub role_id: Option<RoleId>,
    /// Only permissions owned directly by this user.
    pub user_id: Option<UserId>,
    /// Only inherited copies.
    pub inherited_only: bool,
    /// Case-insensitive substring match on the permission name.
    pub search: Option<String>,
}

impl PermissionFilter {
    /// Returns whether a permission passes this filter.
    #[must_use]
    pub fn accepts(&self, permission: &Permission) -> bool {
        if let Some(role_id) = self.role_id
            && permission.owner.role_id() != Some(role_id)
        {
            return false;
        }
        if let Some(user_id) = self.user_id
            && permission.owner.user_id() != Some(user_id)
        {
            return false;
        }
        if self.inherited_only && !permission.inherited {
            return false;
        }
        match self.search.as_deref() {
            Some(search) => permission
                .name
                .to_lowercase()
                .contains(&search.to_lowercase()),
            None => true,
        }
    }
}

/// Filtered and paginated permission listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionQuery {
    /// Row filter.
    pub filter: PermissionFilter,
    /// Requested window.
    pub pagination: Pagination,
}

/// Permission reachable by a subject, paired with its owning role's scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGrant {
    /// The stored permission.
    pub permission: Permission,
    /// Scope of the owning role when the permission is role-owned.
    pub role_scope: Option<EntityScope>,
}

/// Repository port for permission records.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Finds a permission by id.
    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>>;

    /// Inserts a permission attached to its owner.
    async fn insert_permission(&self, permission: NewPermission) -> AppResult<Permission>;

    /// Deletes one permission.
    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()>;

    /// Lists permissions matching the query together with the total count.
    async fn list_permissions(&self, query: PermissionQuery) -> AppResult<Page<Permission>>;

    /// Counts permissions matching the filter.
    async fn count_permissions(&self, filter: &PermissionFilter) -> AppResult<u64>;

    /// Lists permissions named `name` owned by the user or by any role the
    /// user belongs to.
    async fn list_user_grants(
        &self,
        user_id: UserId,
        name: &str,
    ) -> AppResult<Vec<PermissionGrant>>;

    /// Lists permissions named `name` owned by exactly this role.
    async fn list_role_grants(
        &self,
        role_id: RoleId,
        name: &str,
    ) -> AppResult<Vec<PermissionGrant>>;
}
