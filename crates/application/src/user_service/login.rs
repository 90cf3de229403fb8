use rolegate_core::{AppError, AppResult};
use rolegate_domain::User;

use super::UserService;

impl UserService {
    /// Verifies a login and password pair and returns the matching user.
    pub async fn login(&self, login: &str, password: &str) -> AppResult<User> {
        let user = self.user_repository.find_by_login(login.trim()).await?;

        let Some(user) = user else {
            // Hash anyway so unknown logins cost as much as wrong passwords.
            // Only the time spent matters, so the result is ignored.
            let _dummy_hash = self.password_hasher.hash_password(password);
            return Err(AppError::IncorrectCredentials);
        };

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            return Err(AppError::IncorrectCredentials);
        }

        Ok(user)
    }
}
