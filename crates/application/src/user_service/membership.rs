use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Role, RoleId, UserId};
use tracing::info;

use super::UserService;

impl UserService {
    /// Makes a user a member of a role.
    pub async fn assign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.get(user_id).await?;
        self.require_role(role_id).await?;

        self.user_repository.add_role(user_id, role_id).await?;
        info!(user_id = %user_id, role_id = %role_id, "role assigned");
        Ok(())
    }

    /// Removes a user from a role.
    pub async fn unassign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.get(user_id).await?;
        self.require_role(role_id).await?;

        self.user_repository.remove_role(user_id, role_id).await?;
        info!(user_id = %user_id, role_id = %role_id, "role unassigned");
        Ok(())
    }

    /// Lists the roles a user belongs to.
    pub async fn list_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        self.get(user_id).await?;
        self.user_repository.list_user_roles(user_id).await
    }

    async fn require_role(&self, role_id: RoleId) -> AppResult<()> {
        self.role_repository
            .find_role(role_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
    }
}
