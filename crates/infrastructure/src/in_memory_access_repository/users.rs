use async_trait::async_trait;
use chrono::Utc;

use rolegate_application::{UserQuery, UserRepository};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Page, PermissionOwner, Role, RoleId, User, UserId};

use super::{InMemoryAccessRepository, contains_ignore_case, page_of};

#[async_trait]
impl UserRepository for InMemoryAccessRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|user| user.login == login)
            .cloned())
    }

    async fn create_user(&self, login: &str, password_hash: &str) -> AppResult<User> {
        let mut state = self.state.write().await;

        if state.users.values().any(|user| user.login == login) {
            return Err(AppError::Conflict(format!(
                "login '{login}' is already taken"
            )));
        }

        let user = User {
            id: state.next_user_id(),
            login: login.to_owned(),
            password_hash: password_hash.to_owned(),
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))?;

        user.password_hash = password_hash.to_owned();
        Ok(())
    }

    async fn list_users(&self, query: UserQuery) -> AppResult<Page<User>> {
        let state = self.state.read().await;
        let matching: Vec<User> = state
            .users
            .values()
            .filter(|user| contains_ignore_case(&user.login, query.search.as_deref()))
            .cloned()
            .collect();

        Ok(page_of(matching, &query.pagination))
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state.users.remove(&user_id).is_none() {
            return Err(AppError::NotFound(format!("user '{user_id}' was not found")));
        }
        state.remove_owned_permissions(PermissionOwner::User(user_id));
        state
            .memberships
            .retain(|(member_id, _)| *member_id != user_id);

        Ok(())
    }

    async fn add_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&user_id) || !state.roles.contains_key(&role_id) {
            return Err(AppError::NotFound(format!(
                "user '{user_id}' or role '{role_id}' was not found"
            )));
        }

        state.memberships.insert((user_id, role_id));
        Ok(())
    }

    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        if !self
            .state
            .write()
            .await
            .memberships
            .remove(&(user_id, role_id))
        {
            return Err(AppError::NotFound(format!(
                "user '{user_id}' is not a member of role '{role_id}'"
            )));
        }

        Ok(())
    }

    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;

        Ok(state
            .memberships
            .iter()
            .filter(|(member_id, _)| *member_id == user_id)
            .filter_map(|(_, role_id)| state.roles.get(role_id).cloned())
            .collect())
    }
}
