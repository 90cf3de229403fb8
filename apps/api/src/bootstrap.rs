use std::collections::BTreeSet;

use rolegate_application::{AddPermissionInput, PermissionFilter, PermissionQuery};
use rolegate_core::AppResult;
use rolegate_domain::{MAX_PAGE_LIMIT, Pagination, PermissionOwner, User};
use tracing::info;

use crate::admin_permission::AdminPermission;
use crate::api_config::BootstrapAdmin;
use crate::state::AppState;

/// Creates the root role and, when configured, an administrator holding every
/// administration permission directly.
///
/// Safe to run on every start: existing records are reused.
pub async fn bootstrap_access(
    state: &AppState,
    root_role_name: &str,
    admin: Option<&BootstrapAdmin>,
) -> AppResult<()> {
    let root = state.role_service.bootstrap_root(root_role_name).await?;
    info!(role_id = %root.id, name = %root.name, "root role ready");

    if let Some(admin) = admin {
        let user = ensure_admin_user(state, admin).await?;
        grant_admin_permissions(state, &user).await?;
    }

    Ok(())
}

async fn ensure_admin_user(state: &AppState, admin: &BootstrapAdmin) -> AppResult<User> {
    if let Some(user) = state.user_service.get_by_login(admin.login.as_str()).await? {
        return Ok(user);
    }

    let user = state
        .user_service
        .register(admin.login.as_str(), admin.password.as_str())
        .await?;
    info!(user_id = %user.id, login = %user.login, "bootstrap administrator created");

    Ok(user)
}

async fn grant_admin_permissions(state: &AppState, user: &User) -> AppResult<()> {
    let held = state
        .permission_service
        .list(PermissionQuery {
            filter: PermissionFilter {
                user_id: Some(user.id),
                ..PermissionFilter::default()
            },
            pagination: Pagination::new(Some(MAX_PAGE_LIMIT), None, false),
        })
        .await?
        .items
        .into_iter()
        .filter(|permission| permission.scope.is_none())
        .map(|permission| permission.name)
        .collect::<BTreeSet<_>>();

    for permission in AdminPermission::ALL {
        if held.contains(permission.as_str()) {
            continue;
        }

        state
            .permission_service
            .add_permission(AddPermissionInput {
                owner: PermissionOwner::User(user.id),
                name: permission.as_str().to_owned(),
                entity_id: None,
                entity_type: None,
            })
            .await?;
        info!(
            user_id = %user.id,
            permission = permission.as_str(),
            "administration permission granted"
        );
    }

    Ok(())
}
