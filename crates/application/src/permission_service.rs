use std::sync::Arc;

use rolegate_core::{AppError, AppResult, NonEmptyString};
use rolegate_domain::{EntityScope, Page, Permission, PermissionId, PermissionOwner};
use tracing::info;

use crate::{
    NewPermission, PermissionFilter, PermissionQuery, PermissionRepository, RoleRepository,
    UserRepository,
};

/// Input payload for attaching a permission to a role or user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPermissionInput {
    /// Role or user receiving the permission.
    pub owner: PermissionOwner,
    /// Opaque permission name.
    pub name: String,
    /// External entity identifier the permission is limited to.
    pub entity_id: Option<String>,
    /// External entity type the permission is limited to.
    pub entity_type: Option<String>,
}

/// Application service for direct permission administration.
///
/// Permissions added here are never marked as inherited. Existing child
/// roles keep their current copies until they are resynced.
#[derive(Clone)]
pub struct PermissionService {
    permission_repository: Arc<dyn PermissionRepository>,
    role_repository: Arc<dyn RoleRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl PermissionService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        permission_repository: Arc<dyn PermissionRepository>,
        role_repository: Arc<dyn RoleRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            permission_repository,
            role_repository,
            user_repository,
        }
    }

    /// Attaches a permission to an existing role or user.
    pub async fn add_permission(&self, input: AddPermissionInput) -> AppResult<Permission> {
        let name = NonEmptyString::for_field("permission name", input.name)?;
        let scope = EntityScope::from_parts(input.entity_id, input.entity_type)?;
        self.require_owner(input.owner).await?;

        let permission = self
            .permission_repository
            .insert_permission(NewPermission {
                name: name.into(),
                owner: input.owner,
                scope,
                inherited: false,
            })
            .await?;

        info!(
            permission_id = %permission.id,
            owner = %permission.owner,
            name = %permission.name,
            "permission added"
        );
        Ok(permission)
    }

    /// Removes one permission.
    pub async fn remove_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.get(permission_id).await?;
        self.permission_repository
            .delete_permission(permission_id)
            .await?;

        info!(permission_id = %permission_id, "permission removed");
        Ok(())
    }

    /// Returns one permission.
    pub async fn get(&self, permission_id: PermissionId) -> AppResult<Permission> {
        self.permission_repository
            .find_permission(permission_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("permission '{permission_id}' was not found")))
    }

    /// Lists permissions.
    pub async fn list(&self, query: PermissionQuery) -> AppResult<Page<Permission>> {
        self.permission_repository.list_permissions(query).await
    }

    /// Counts permissions.
    pub async fn count(&self, filter: &PermissionFilter) -> AppResult<u64> {
        self.permission_repository.count_permissions(filter).await
    }

    async fn require_owner(&self, owner: PermissionOwner) -> AppResult<()> {
        let exists = match owner {
            PermissionOwner::Role(role_id) => {
                self.role_repository.find_role(role_id).await?.is_some()
            }
            PermissionOwner::User(user_id) => {
                self.user_repository.find_by_id(user_id).await?.is_some()
            }
        };

        if !exists {
            return Err(AppError::NotFound(format!("{owner} was not found")));
        }

        Ok(())
    }
}
