//! Role tree administration and inherited permission upkeep.
//!
//! Every structural check runs before the repository is asked to write, so a
//! rejected transition leaves the store untouched. The repository executes
//! each accepted transition as one atomic unit and repeats the tree checks
//! inside it, since the tree may have moved since they were first read.

use std::collections::HashSet;
use std::sync::Arc;

use rolegate_core::{AppError, AppResult, NonEmptyString};
use rolegate_domain::{EntityScope, Page, Role, RoleId};
use tracing::info;

use crate::{NewRole, RoleChanges, RoleQuery, RoleRepository};

/// Input payload for creating a child role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Role name.
    pub name: String,
    /// Parent role. Required for every role except the root.
    pub parent_id: Option<RoleId>,
    /// External entity identifier the role is bound to.
    pub entity_id: Option<String>,
    /// External entity type the role is bound to.
    pub entity_type: Option<String>,
}

/// Input payload for updating a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New role name.
    pub name: Option<String>,
    /// New parent role.
    pub parent_id: Option<RoleId>,
}

/// Application service for the role tree.
#[derive(Clone)]
pub struct RoleService {
    repository: Arc<dyn RoleRepository>,
}

impl RoleService {
    /// Creates a new service from a role repository.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self { repository }
    }

    /// Creates the root role when the tree is empty and returns the root.
    ///
    /// Calling this again after the root exists returns the existing root.
    pub async fn bootstrap_root(&self, name: &str) -> AppResult<Role> {
        if let Some(root) = self.repository.find_root_role().await? {
            return Ok(root);
        }

        let name = NonEmptyString::for_field("role name", name)?;
        let root = self
            .repository
            .insert_role(NewRole {
                name: name.into(),
                parent_id: None,
                scope: None,
            })
            .await?;

        info!(role_id = %root.id, name = %root.name, "root role created");
        Ok(root)
    }

    /// Returns the root role.
    pub async fn root(&self) -> AppResult<Role> {
        self.repository
            .find_root_role()
            .await?
            .ok_or_else(|| AppError::NotFound("root role does not exist".to_owned()))
    }

    /// Returns one role.
    pub async fn get(&self, role_id: RoleId) -> AppResult<Role> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
    }

    /// Lists roles.
    pub async fn list(&self, query: RoleQuery) -> AppResult<Page<Role>> {
        self.repository.list_roles(query).await
    }

    /// Creates a role under an existing parent. The parent's permissions are
    /// copied into the new role as inherited permissions.
    pub async fn add_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        let name = NonEmptyString::for_field("role name", input.name)?;
        let parent_id = input.parent_id.ok_or(AppError::RoleRequiresParent)?;
        let scope = EntityScope::from_parts(input.entity_id, input.entity_type)?;
        self.get(parent_id).await?;

        let role = self
            .repository
            .insert_role(NewRole {
                name: name.into(),
                parent_id: Some(parent_id),
                scope,
            })
            .await?;

        info!(role_id = %role.id, parent_id = %parent_id, "role created");
        Ok(role)
    }

    /// Renames and/or moves a role.
    ///
    /// Moving under a different parent replaces the role's inherited
    /// permissions with copies of the new parent's permissions. Naming the
    /// current parent leaves permissions untouched.
    pub async fn update_role(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role> {
        let role = self.get(role_id).await?;

        let name = input
            .name
            .map(|name| NonEmptyString::for_field("role name", name).map(String::from))
            .transpose()?;

        let parent_id = match input.parent_id {
            Some(parent_id) if role.parent_id != Some(parent_id) => {
                self.validate_reparent(&role, parent_id).await?;
                Some(parent_id)
            }
            _ => None,
        };

        if name.is_none() && parent_id.is_none() {
            return Ok(role);
        }

        let updated = self
            .repository
            .update_role(role_id, RoleChanges { name, parent_id })
            .await?;

        info!(role_id = %role_id, parent_id = ?updated.parent_id, "role updated");
        Ok(updated)
    }

    /// Moves a role under a new parent, replacing its inherited permissions.
    pub async fn reparent_role(&self, role_id: RoleId, new_parent_id: RoleId) -> AppResult<Role> {
        let role = self.get(role_id).await?;
        self.validate_reparent(&role, new_parent_id).await?;

        let updated = self
            .repository
            .update_role(
                role_id,
                RoleChanges {
                    name: None,
                    parent_id: Some(new_parent_id),
                },
            )
            .await?;

        info!(role_id = %role_id, parent_id = %new_parent_id, "role reparented");
        Ok(updated)
    }

    /// Deletes a role together with every permission it owns.
    ///
    /// The root and roles that still have children cannot be deleted.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let role = self.get(role_id).await?;
        if role.is_root() {
            return Err(AppError::RoleRootCannotBeDeleted(format!(
                "role '{}' is the root role",
                role.name
            )));
        }

        let children = self.repository.count_children(role_id).await?;
        if children > 0 {
            return Err(AppError::Conflict(format!(
                "role '{}' still has {children} child role(s)",
                role.name
            )));
        }

        self.repository.delete_role(role_id).await?;
        info!(role_id = %role_id, "role deleted");
        Ok(())
    }

    /// Copies every permission of `from` into `to` as inherited permissions.
    pub async fn copy_permissions(&self, from: RoleId, to: RoleId) -> AppResult<u64> {
        if from == to {
            return Err(AppError::Validation(format!(
                "role '{from}' cannot copy permissions onto itself"
            )));
        }
        self.get(from).await?;
        self.get(to).await?;

        self.repository.copy_permissions(from, to).await
    }

    /// Removes every inherited permission of a role.
    pub async fn remove_inherited_permissions(&self, role_id: RoleId) -> AppResult<u64> {
        self.get(role_id).await?;
        self.repository.remove_inherited_permissions(role_id).await
    }

    /// Replaces a role's inherited permissions with fresh copies of its
    /// current parent's permissions.
    pub async fn resync_inherited_permissions(&self, role_id: RoleId) -> AppResult<Role> {
        let role = self.get(role_id).await?;
        let Some(parent_id) = role.parent_id else {
            return Err(AppError::Validation(format!(
                "root role '{}' has no parent to inherit from",
                role.name
            )));
        };

        self.repository
            .update_role(
                role_id,
                RoleChanges {
                    name: None,
                    parent_id: Some(parent_id),
                },
            )
            .await
    }

    async fn validate_reparent(&self, role: &Role, new_parent_id: RoleId) -> AppResult<()> {
        if role.is_root() {
            return Err(AppError::RoleRootCannotBeDeleted(format!(
                "root role '{}' cannot be assigned a parent",
                role.name
            )));
        }

        if new_parent_id == role.id {
            return Err(AppError::RoleCannotBeItsParent(format!(
                "role '{}' cannot be its own parent",
                role.name
            )));
        }

        let new_parent = self.get(new_parent_id).await?;

        // Walk up from the new parent; meeting the role means it would
        // become its own ancestor.
        let mut visited = HashSet::new();
        let mut cursor = Some(new_parent.clone());
        while let Some(ancestor) = cursor {
            if ancestor.id == role.id {
                return Err(AppError::RoleCannotBeItsParent(format!(
                    "role '{}' cannot be moved under its descendant '{}'",
                    role.name, new_parent.name
                )));
            }
            if !visited.insert(ancestor.id) {
                return Err(AppError::Internal(format!(
                    "role tree contains a cycle at role '{}'",
                    ancestor.id
                )));
            }

            cursor = match ancestor.parent_id {
                Some(parent_id) => self.repository.find_role(parent_id).await?,
                None => None,
            };
        }

        Ok(())
    }
}
