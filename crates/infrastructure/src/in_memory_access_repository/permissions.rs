use async_trait::async_trait;

use rolegate_application::{
    NewPermission, PermissionFilter, PermissionGrant, PermissionQuery, PermissionRepository,
};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Page, Permission, PermissionId, PermissionOwner, RoleId, UserId};

use super::{InMemoryAccessRepository, page_of};

#[async_trait]
impl PermissionRepository for InMemoryAccessRepository {
    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self
            .state
            .read()
            .await
            .permissions
            .get(&permission_id)
            .cloned())
    }

    async fn insert_permission(&self, permission: NewPermission) -> AppResult<Permission> {
        let mut state = self.state.write().await;

        let owner_exists = match permission.owner {
            PermissionOwner::Role(role_id) => state.roles.contains_key(&role_id),
            PermissionOwner::User(user_id) => state.users.contains_key(&user_id),
        };
        if !owner_exists {
            return Err(AppError::NotFound(format!(
                "{} was not found",
                permission.owner
            )));
        }

        Ok(state.insert_permission(
            permission.name,
            permission.owner,
            permission.scope,
            permission.inherited,
        ))
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.state
            .write()
            .await
            .permissions
            .remove(&permission_id)
            .map(|_| ())
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{permission_id}' was not found"))
            })
    }

    async fn list_permissions(&self, query: PermissionQuery) -> AppResult<Page<Permission>> {
        let state = self.state.read().await;
        let matching: Vec<Permission> = state
            .permissions
            .values()
            .filter(|permission| query.filter.accepts(permission))
            .cloned()
            .collect();

        Ok(page_of(matching, &query.pagination))
    }

    async fn count_permissions(&self, filter: &PermissionFilter) -> AppResult<u64> {
        Ok(self
            .state
            .read()
            .await
            .permissions
            .values()
            .filter(|permission| filter.accepts(permission))
            .count() as u64)
    }

    async fn list_user_grants(
        &self,
        user_id: UserId,
        name: &str,
    ) -> AppResult<Vec<PermissionGrant>> {
        let state = self.state.read().await;

        Ok(state
            .permissions
            .values()
            .filter(|permission| permission.name == name)
            .filter(|permission| match permission.owner {
                PermissionOwner::User(owner_id) => owner_id == user_id,
                PermissionOwner::Role(role_id) => state.memberships.contains(&(user_id, role_id)),
            })
            .map(|permission| state.grant(permission))
            .collect())
    }

    async fn list_role_grants(
        &self,
        role_id: RoleId,
        name: &str,
    ) -> AppResult<Vec<PermissionGrant>> {
        let state = self.state.read().await;

        Ok(state
            .permissions
            .values()
            .filter(|permission| {
                permission.name == name && permission.owner == PermissionOwner::Role(role_id)
            })
            .map(|permission| state.grant(permission))
            .collect())
    }
}
