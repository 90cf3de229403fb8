//! In-memory implementation of the role, permission and user ports.
//!
//! All records live behind a single lock. Every mutation takes the write lock
//! once and finishes before releasing it, so composite transitions such as a
//! reparent are never observed half-applied.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use tokio::sync::RwLock;

use rolegate_application::PermissionGrant;
use rolegate_domain::{
    EntityScope, Page, Pagination, Permission, PermissionId, PermissionOwner, Role, RoleId, User,
    UserId,
};

mod permissions;
mod roles;
mod users;

/// In-memory access control store.
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    state: RwLock<AccessState>,
}

impl InMemoryAccessRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Default)]
struct AccessState {
    roles: BTreeMap<RoleId, Role>,
    permissions: BTreeMap<PermissionId, Permission>,
    users: BTreeMap<UserId, User>,
    memberships: BTreeSet<(UserId, RoleId)>,
    last_role_id: i64,
    last_permission_id: i64,
    last_user_id: i64,
}

impl AccessState {
    fn next_role_id(&mut self) -> RoleId {
        self.last_role_id += 1;
        RoleId::new(self.last_role_id)
    }

    fn next_permission_id(&mut self) -> PermissionId {
        self.last_permission_id += 1;
        PermissionId::new(self.last_permission_id)
    }

    fn next_user_id(&mut self) -> UserId {
        self.last_user_id += 1;
        UserId::new(self.last_user_id)
    }

    fn insert_permission(
        &mut self,
        name: String,
        owner: PermissionOwner,
        scope: Option<EntityScope>,
        inherited: bool,
    ) -> Permission {
        let permission = Permission {
            id: self.next_permission_id(),
            name,
            inherited,
            scope,
            owner,
            created_at: Utc::now(),
        };
        self.permissions.insert(permission.id, permission.clone());
        permission
    }

    fn copy_role_permissions(&mut self, from: RoleId, to: RoleId) -> u64 {
        let sources: Vec<(String, Option<EntityScope>)> = self
            .permissions
            .values()
            .filter(|permission| permission.owner == PermissionOwner::Role(from))
            .map(|permission| (permission.name.clone(), permission.scope.clone()))
            .collect();

        let copied = sources.len() as u64;
        for (name, scope) in sources {
            self.insert_permission(name, PermissionOwner::Role(to), scope, true);
        }
        copied
    }

    fn strip_inherited_permissions(&mut self, role_id: RoleId) -> u64 {
        let before = self.permissions.len();
        self.permissions.retain(|_, permission| {
            !(permission.inherited && permission.owner == PermissionOwner::Role(role_id))
        });
        (before - self.permissions.len()) as u64
    }

    fn remove_owned_permissions(&mut self, owner: PermissionOwner) {
        self.permissions
            .retain(|_, permission| permission.owner != owner);
    }

    fn grant(&self, permission: &Permission) -> PermissionGrant {
        let role_scope = permission
            .owner
            .role_id()
            .and_then(|role_id| self.roles.get(&role_id))
            .and_then(|role| role.scope.clone());

        PermissionGrant {
            permission: permission.clone(),
            role_scope,
        }
    }
}

fn page_of<T: Clone>(matching: Vec<T>, pagination: &Pagination) -> Page<T> {
    Page {
        total: matching.len() as u64,
        items: pagination.apply(&matching),
    }
}

fn contains_ignore_case(value: &str, search: Option<&str>) -> bool {
    search.is_none_or(|search| value.to_lowercase().contains(&search.to_lowercase()))
}


#[cfg(test)]
mod scenarios;
