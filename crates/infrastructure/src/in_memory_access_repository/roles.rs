use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;

use rolegate_application::{NewRole, RoleChanges, RoleQuery, RoleRepository};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Page, PermissionOwner, Role, RoleId};

use super::{InMemoryAccessRepository, contains_ignore_case, page_of};

#[async_trait]
impl RoleRepository for InMemoryAccessRepository {
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&role_id).cloned())
    }

    async fn find_root_role(&self) -> AppResult<Option<Role>> {
        Ok(self
            .state
            .read()
            .await
            .roles
            .values()
            .find(|role| role.is_root())
            .cloned())
    }

    async fn list_roles(&self, query: RoleQuery) -> AppResult<Page<Role>> {
        let state = self.state.read().await;
        let matching: Vec<Role> = state
            .roles
            .values()
            .filter(|role| query.parent_id.is_none() || role.parent_id == query.parent_id)
            .filter(|role| contains_ignore_case(&role.name, query.search.as_deref()))
            .cloned()
            .collect();

        Ok(page_of(matching, &query.pagination))
    }

    async fn count_children(&self, role_id: RoleId) -> AppResult<u64> {
        Ok(self
            .state
            .read()
            .await
            .roles
            .values()
            .filter(|role| role.parent_id == Some(role_id))
            .count() as u64)
    }

    async fn insert_role(&self, role: NewRole) -> AppResult<Role> {
        let mut state = self.state.write().await;

        match role.parent_id {
            Some(parent_id) if !state.roles.contains_key(&parent_id) => {
                return Err(AppError::NotFound(format!(
                    "parent role '{parent_id}' was not found"
                )));
            }
            None if state.roles.values().any(Role::is_root) => {
                return Err(AppError::Conflict("a root role already exists".to_owned()));
            }
            _ => {}
        }

        let now = Utc::now();
        let created = Role {
            id: state.next_role_id(),
            name: role.name,
            parent_id: role.parent_id,
            scope: role.scope,
            created_at: now,
            modified_at: now,
        };
        state.roles.insert(created.id, created.clone());

        if let Some(parent_id) = created.parent_id {
            state.copy_role_permissions(parent_id, created.id);
        }

        Ok(created)
    }

    async fn update_role(&self, role_id: RoleId, changes: RoleChanges) -> AppResult<Role> {
        let mut state = self.state.write().await;

        if let Some(parent_id) = changes.parent_id
            && !state.roles.contains_key(&parent_id)
        {
            return Err(AppError::NotFound(format!(
                "parent role '{parent_id}' was not found"
            )));
        }

        if let Some(parent_id) = changes.parent_id {
            ensure_parent_allowed(&state.roles, role_id, parent_id)?;
        }

        let role = state
            .roles
            .get_mut(&role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        if let Some(name) = changes.name {
            role.name = name;
        }
        if let Some(parent_id) = changes.parent_id {
            role.parent_id = Some(parent_id);
        }
        role.modified_at = Utc::now();
        let updated = role.clone();

        if let Some(parent_id) = changes.parent_id {
            state.strip_inherited_permissions(role_id);
            state.copy_role_permissions(parent_id, role_id);
        }

        Ok(updated)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;

        if !state.roles.contains_key(&role_id) {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }
        if state
            .roles
            .values()
            .any(|role| role.parent_id == Some(role_id))
        {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' still has child roles"
            )));
        }

        state.remove_owned_permissions(PermissionOwner::Role(role_id));
        state
            .memberships
            .retain(|(_, member_role_id)| *member_role_id != role_id);
        state.roles.remove(&role_id);

        Ok(())
    }

    async fn copy_permissions(&self, from: RoleId, to: RoleId) -> AppResult<u64> {
        let mut state = self.state.write().await;

        for role_id in [from, to] {
            if !state.roles.contains_key(&role_id) {
                return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
            }
        }

        Ok(state.copy_role_permissions(from, to))
    }

    async fn remove_inherited_permissions(&self, role_id: RoleId) -> AppResult<u64> {
        Ok(self
            .state
            .write()
            .await
            .strip_inherited_permissions(role_id))
    }
}

/// Rejects a parent that would move the root or close a cycle.
fn ensure_parent_allowed(
    roles: &BTreeMap<RoleId, Role>,
    role_id: RoleId,
    parent_id: RoleId,
) -> AppResult<()> {
    let role = roles
        .get(&role_id)
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
    if role.is_root() {
        return Err(AppError::RoleRootCannotBeDeleted(format!(
            "root role '{}' cannot be assigned a parent",
            role.name
        )));
    }

    let mut visited = BTreeSet::new();
    let mut cursor = Some(parent_id);
    while let Some(ancestor_id) = cursor {
        if ancestor_id == role_id {
            return Err(AppError::RoleCannotBeItsParent(format!(
                "role '{}' cannot be moved under role '{parent_id}'",
                role.name
            )));
        }
        if !visited.insert(ancestor_id) {
            return Err(AppError::Internal(format!(
                "role tree contains a cycle at role '{ancestor_id}'"
            )));
        }
        cursor = roles.get(&ancestor_id).and_then(|ancestor| ancestor.parent_id);
    }

    Ok(())
}
