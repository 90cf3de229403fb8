//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use rolegate_application::{UserQuery, UserRepository};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Page, Role, RoleId, User, UserId};

use crate::postgres_rows::{RoleRow, UserRow};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

mod account;
mod lookup;
mod membership;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        self.find_by_id_impl(user_id).await
    }

    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>> {
        self.find_by_login_impl(login).await
    }

    async fn create_user(&self, login: &str, password_hash: &str) -> AppResult<User> {
        self.create_user_impl(login, password_hash).await
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        self.update_password_impl(user_id, password_hash).await
    }

    async fn list_users(&self, query: UserQuery) -> AppResult<Page<User>> {
        self.list_users_impl(query).await
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.delete_user_impl(user_id).await
    }

    async fn add_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.add_role_impl(user_id, role_id).await
    }

    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.remove_role_impl(user_id, role_id).await
    }

    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        self.list_user_roles_impl(user_id).await
    }
}
