//! Port fakes shared by the service tests.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use rolegate_core::{AppError, AppResult};
use rolegate_domain::{
    EntityScope, Page, Permission, PermissionId, PermissionOwner, Role, RoleId, User, UserId,
};

use crate::{
    NewPermission, NewRole, PasswordHasher, PermissionFilter, PermissionGrant, PermissionQuery,
    PermissionRepository, RoleChanges, RoleQuery, RoleRepository, UserQuery, UserRepository,
};

pub(crate) fn scope(entity_id: &str, entity_type: &str) -> EntityScope {
    EntityScope::new(entity_id, entity_type).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn role(id: i64, parent_id: Option<i64>) -> Role {
    Role {
        id: RoleId::new(id),
        name: format!("role_{id}"),
        parent_id: parent_id.map(RoleId::new),
        scope: None,
        created_at: Utc::now(),
        modified_at: Utc::now(),
    }
}

pub(crate) fn grant(
    owner: PermissionOwner,
    name: &str,
    scope: Option<EntityScope>,
    role_scope: Option<EntityScope>,
) -> PermissionGrant {
    PermissionGrant {
        permission: Permission {
            id: PermissionId::new(1),
            name: name.to_owned(),
            inherited: false,
            scope,
            owner,
            created_at: Utc::now(),
        },
        role_scope,
    }
}

#[derive(Default)]
pub(crate) struct FakePermissionRepository {
    user_grants: HashMap<(UserId, String), Vec<PermissionGrant>>,
    role_grants: HashMap<(RoleId, String), Vec<PermissionGrant>>,
    failing_names: HashSet<String>,
    pub(crate) lookups: Mutex<Vec<String>>,
    pub(crate) stored: Mutex<Vec<Permission>>,
}

impl FakePermissionRepository {
    pub(crate) fn with_user_grant(mut self, user_id: UserId, grant: PermissionGrant) -> Self {
        self.user_grants
            .entry((user_id, grant.permission.name.clone()))
            .or_default()
            .push(grant);
        self
    }

    pub(crate) fn with_role_grant(mut self, role_id: RoleId, grant: PermissionGrant) -> Self {
        self.role_grants
            .entry((role_id, grant.permission.name.clone()))
            .or_default()
            .push(grant);
        self
    }

    pub(crate) fn failing_on(mut self, name: &str) -> Self {
        self.failing_names.insert(name.to_owned());
        self
    }

    async fn record_lookup(&self, name: &str) -> AppResult<()> {
        self.lookups.lock().await.push(name.to_owned());
        if self.failing_names.contains(name) {
            return Err(AppError::Internal(format!(
                "simulated lookup failure for '{name}'"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for FakePermissionRepository {
    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self
            .stored
            .lock()
            .await
            .iter()
            .find(|permission| permission.id == permission_id)
            .cloned())
    }

    async fn insert_permission(&self, permission: NewPermission) -> AppResult<Permission> {
        let mut stored = self.stored.lock().await;
        let created = Permission {
            id: PermissionId::new(stored.len() as i64 + 1),
            name: permission.name,
            inherited: permission.inherited,
            scope: permission.scope,
            owner: permission.owner,
            created_at: Utc::now(),
        };
        stored.push(created.clone());
        Ok(created)
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.stored
            .lock()
            .await
            .retain(|permission| permission.id != permission_id);
        Ok(())
    }

    async fn list_permissions(&self, query: PermissionQuery) -> AppResult<Page<Permission>> {
        let matching: Vec<Permission> = self
            .stored
            .lock()
            .await
            .iter()
            .filter(|permission| query.filter.accepts(permission))
            .cloned()
            .collect();

        Ok(Page {
            total: matching.len() as u64,
            items: query.pagination.apply(&matching),
        })
    }

    async fn count_permissions(&self, filter: &PermissionFilter) -> AppResult<u64> {
        Ok(self
            .stored
            .lock()
            .await
            .iter()
            .filter(|permission| filter.accepts(permission))
            .count() as u64)
    }

    async fn list_user_grants(
        &self,
        user_id: UserId,
        name: &str,
    ) -> AppResult<Vec<PermissionGrant>> {
        self.record_lookup(name).await?;
        Ok(self
            .user_grants
            .get(&(user_id, name.to_owned()))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_role_grants(
        &self,
        role_id: RoleId,
        name: &str,
    ) -> AppResult<Vec<PermissionGrant>> {
        self.record_lookup(name).await?;
        Ok(self
            .role_grants
            .get(&(role_id, name.to_owned()))
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub(crate) struct FakeRoleRepository {
    roles: Mutex<BTreeMap<RoleId, Role>>,
    pub(crate) writes: Mutex<Vec<String>>,
}

impl FakeRoleRepository {
    pub(crate) fn with_roles(roles: Vec<Role>) -> Self {
        Self {
            roles: Mutex::new(roles.into_iter().map(|role| (role.id, role)).collect()),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub(crate) async fn write_log(&self) -> Vec<String> {
        self.writes.lock().await.clone()
    }

    async fn record(&self, write: String) {
        self.writes.lock().await.push(write);
    }
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.roles.lock().await.get(&role_id).cloned())
    }

    async fn find_root_role(&self) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .values()
            .find(|role| role.is_root())
            .cloned())
    }

    async fn list_roles(&self, query: RoleQuery) -> AppResult<Page<Role>> {
        let matching: Vec<Role> = self
            .roles
            .lock()
            .await
            .values()
            .filter(|role| query.parent_id.is_none() || role.parent_id == query.parent_id)
            .cloned()
            .collect();

        Ok(Page {
            total: matching.len() as u64,
            items: query.pagination.apply(&matching),
        })
    }

    async fn count_children(&self, role_id: RoleId) -> AppResult<u64> {
        Ok(self
            .roles
            .lock()
            .await
            .values()
            .filter(|role| role.parent_id == Some(role_id))
            .count() as u64)
    }

    async fn insert_role(&self, role: NewRole) -> AppResult<Role> {
        let mut roles = self.roles.lock().await;
        let next_id = roles.keys().last().map_or(1, |id| id.as_i64() + 1);
        let created = Role {
            id: RoleId::new(next_id),
            name: role.name,
            parent_id: role.parent_id,
            scope: role.scope,
            created_at: Utc::now(),
            modified_at: Utc::now(),
        };
        roles.insert(created.id, created.clone());
        drop(roles);

        self.record(format!("insert_role:{next_id}")).await;
        Ok(created)
    }

    async fn update_role(&self, role_id: RoleId, changes: RoleChanges) -> AppResult<Role> {
        let mut roles = self.roles.lock().await;
        let role = roles
            .get_mut(&role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
        if let Some(name) = changes.name {
            role.name = name;
        }
        if let Some(parent_id) = changes.parent_id {
            role.parent_id = Some(parent_id);
        }
        let updated = role.clone();
        drop(roles);

        self.record(format!("update_role:{role_id}")).await;
        Ok(updated)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.roles.lock().await.remove(&role_id);
        self.record(format!("delete_role:{role_id}")).await;
        Ok(())
    }

    async fn copy_permissions(&self, from: RoleId, to: RoleId) -> AppResult<u64> {
        self.record(format!("copy_permissions:{from}->{to}")).await;
        Ok(0)
    }

    async fn remove_inherited_permissions(&self, role_id: RoleId) -> AppResult<u64> {
        self.record(format!("remove_inherited_permissions:{role_id}"))
            .await;
        Ok(0)
    }
}

#[derive(Default)]
pub(crate) struct FakeUserRepository {
    users: Mutex<Vec<User>>,
    pub(crate) memberships: Mutex<Vec<(UserId, RoleId)>>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.id == user_id)
            .cloned())
    }

    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.login == login)
            .cloned())
    }

    async fn create_user(&self, login: &str, password_hash: &str) -> AppResult<User> {
        let mut users = self.users.lock().await;
        let created = User {
            id: UserId::new(users.len() as i64 + 1),
            login: login.to_owned(),
            password_hash: password_hash.to_owned(),
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        if let Some(user) = self
            .users
            .lock()
            .await
            .iter_mut()
            .find(|user| user.id == user_id)
        {
            user.password_hash = password_hash.to_owned();
        }
        Ok(())
    }

    async fn list_users(&self, query: UserQuery) -> AppResult<Page<User>> {
        let users = self.users.lock().await.clone();
        Ok(Page {
            total: users.len() as u64,
            items: query.pagination.apply(&users),
        })
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.users.lock().await.retain(|user| user.id != user_id);
        self.memberships
            .lock()
            .await
            .retain(|(member_id, _)| *member_id != user_id);
        Ok(())
    }

    async fn add_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut memberships = self.memberships.lock().await;
        if !memberships.contains(&(user_id, role_id)) {
            memberships.push((user_id, role_id));
        }
        Ok(())
    }

    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut memberships = self.memberships.lock().await;
        let before = memberships.len();
        memberships.retain(|membership| *membership != (user_id, role_id));
        if memberships.len() == before {
            return Err(AppError::NotFound(format!(
                "user '{user_id}' is not a member of role '{role_id}'"
            )));
        }
        Ok(())
    }

    async fn list_user_roles(&self, _user_id: UserId) -> AppResult<Vec<Role>> {
        Ok(Vec::new())
    }
}

pub(crate) struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}
