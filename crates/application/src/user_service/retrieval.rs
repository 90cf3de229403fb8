use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Page, User, UserId};
use tracing::info;

use crate::UserQuery;

use super::UserService;

impl UserService {
    /// Returns a user by id.
    pub async fn get(&self, user_id: UserId) -> AppResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))
    }

    /// Returns a user by login, if it exists.
    pub async fn get_by_login(&self, login: &str) -> AppResult<Option<User>> {
        self.user_repository.find_by_login(login.trim()).await
    }

    /// Lists users.
    pub async fn list(&self, query: UserQuery) -> AppResult<Page<User>> {
        self.user_repository.list_users(query).await
    }

    /// Deletes a user with its direct permissions. Role memberships are
    /// detached, the roles themselves are kept.
    pub async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.get(user_id).await?;
        self.user_repository.delete_user(user_id).await?;

        info!(user_id = %user_id, "user deleted");
        Ok(())
    }
}
