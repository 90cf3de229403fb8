use rolegate_core::{AppError, AppResult};
use rolegate_domain::{User, validate_login, validate_password};
use tracing::info;

use super::UserService;

impl UserService {
    /// Registers a user with a login and password.
    pub async fn register(&self, login: &str, password: &str) -> AppResult<User> {
        let login = validate_login(login)?;
        validate_password(password)?;

        if self.user_repository.find_by_login(&login).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "login '{login}' is already taken"
            )));
        }

        let password_hash = self.password_hasher.hash_password(password)?;
        let user = self
            .user_repository
            .create_user(&login, &password_hash)
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}
