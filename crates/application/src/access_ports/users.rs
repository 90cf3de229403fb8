use async_trait::async_trait;

use rolegate_core::AppResult;
use rolegate_domain::{Page, Pagination, Role, RoleId, User, UserId};

/// Filter for user listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    /// Case-insensitive substring match on the login.
    pub search: Option<String>,
    /// Requested window.
    pub pagination: Pagination,
}

/// Repository port for user persistence and role membership.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by id.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>>;

    /// Finds a user by login.
    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>>;

    /// Creates a user. Fails with a conflict when the login is taken.
    async fn create_user(&self, login: &str, password_hash: &str) -> AppResult<User>;

    /// Replaces the stored password hash.
    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()>;

    /// Lists users matching the query together with the total count.
    async fn list_users(&self, query: UserQuery) -> AppResult<Page<User>>;

    /// Deletes a user with its direct permissions and detaches its roles.
    async fn delete_user(&self, user_id: UserId) -> AppResult<()>;

    /// Adds the user to a role. Existing memberships are left as-is.
    async fn add_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Removes the user from a role. Fails when the user is not a member.
    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Lists the roles the user belongs to.
    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>>;
}

/// Port for password hashing operations. Keeps the application layer free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
