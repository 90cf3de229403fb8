use std::sync::Arc;

use rolegate_core::AppResult;
use rolegate_domain::{EntityScope, RoleId, UserId};

use crate::{PermissionGrant, PermissionRepository};

/// Answers whether a user or a role holds a named, optionally scoped permission.
#[derive(Clone)]
pub struct PermissionResolver {
    repository: Arc<dyn PermissionRepository>,
}

impl PermissionResolver {
    /// Creates a resolver over a permission repository.
    #[must_use]
    pub fn new(repository: Arc<dyn PermissionRepository>) -> Self {
        Self { repository }
    }

    /// Returns whether the user holds the permission directly or through one
    /// of its roles.
    pub async fn check_user(
        &self,
        user_id: UserId,
        name: &str,
        scope: Option<&EntityScope>,
    ) -> AppResult<bool> {
        let grants = self.repository.list_user_grants(user_id, name).await?;
        Ok(grants.iter().any(|grant| grant_satisfies(grant, scope)))
    }

    /// Returns whether the role itself owns the permission. Parent and child
    /// roles are not consulted.
    pub async fn check_role(
        &self,
        role_id: RoleId,
        name: &str,
        scope: Option<&EntityScope>,
    ) -> AppResult<bool> {
        let grants = self.repository.list_role_grants(role_id, name).await?;
        Ok(grants.iter().any(|grant| grant_satisfies(grant, scope)))
    }
}

/// A role-owned grant is only usable when the role's own scope and the
/// permission's scope both pass against the request.
fn grant_satisfies(grant: &PermissionGrant, requested: Option<&EntityScope>) -> bool {
    EntityScope::matches_request(grant.permission.scope.as_ref(), requested)
        && EntityScope::matches_request(grant.role_scope.as_ref(), requested)
}
