use rolegate_core::Principal;
use rolegate_domain::JoinType;

use crate::admin_permission::AdminPermission;
use crate::error::ApiResult;
use crate::state::AppState;

pub mod access;
pub mod health;
pub mod permissions;
pub mod roles;
pub mod users;

#[cfg(test)]
mod tests;

async fn require_admin(
    state: &AppState,
    principal: Option<&Principal>,
    permission: AdminPermission,
) -> ApiResult<()> {
    state
        .access_decision_service
        .require_access(principal, &[permission.as_str()], JoinType::And)
        .await?;

    Ok(())
}
