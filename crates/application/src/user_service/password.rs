use rolegate_core::{AppError, AppResult};
use rolegate_domain::{UserId, validate_password};

use super::UserService;

impl UserService {
    /// Changes the password of a user after checking the current one.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.get(user_id).await?;

        let current_valid = self
            .password_hasher
            .verify_password(current_password, &user.password_hash)?;

        if !current_valid {
            return Err(AppError::IncorrectCredentials);
        }

        validate_password(new_password)?;

        let new_hash = self.password_hasher.hash_password(new_password)?;
        self.user_repository
            .update_password(user_id, &new_hash)
            .await
    }
}
