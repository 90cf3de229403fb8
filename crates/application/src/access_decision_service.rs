use std::sync::Arc;

use rolegate_core::{AppError, AppResult, Principal};
use rolegate_domain::{EntityScope, JoinType, RoleId, UserId};
use tracing::warn;

use crate::{PermissionResolver, RoleRepository};

/// Identity a single permission check is evaluated against.
#[derive(Debug, Clone, Copy)]
enum AccessSubject {
    User(UserId),
    Root(RoleId),
}

/// Combines named permission checks into one access decision.
///
/// Checks never fail: store errors are logged and count as a denied check.
#[derive(Clone)]
pub struct AccessDecisionService {
    resolver: PermissionResolver,
    role_repository: Arc<dyn RoleRepository>,
}

impl AccessDecisionService {
    /// Creates a decision service from a resolver and the role store used to
    /// find the root role for unauthenticated callers.
    #[must_use]
    pub fn new(resolver: PermissionResolver, role_repository: Arc<dyn RoleRepository>) -> Self {
        Self {
            resolver,
            role_repository,
        }
    }

    /// Decides whether the caller holds the required permissions.
    ///
    /// With no required permissions the decision only reflects whether a
    /// principal is present. Unauthenticated callers are checked against the
    /// root role.
    pub async fn check_access<S>(
        &self,
        principal: Option<&Principal>,
        required_permissions: &[S],
        join_type: JoinType,
    ) -> bool
    where
        S: AsRef<str> + Sync,
    {
        self.evaluate(principal, required_permissions, join_type, None)
            .await
    }

    /// Same decision as [`Self::check_access`], with every check limited to
    /// one external entity.
    pub async fn check_entity_access<S>(
        &self,
        principal: Option<&Principal>,
        required_permissions: &[S],
        join_type: JoinType,
        scope: &EntityScope,
    ) -> bool
    where
        S: AsRef<str> + Sync,
    {
        self.evaluate(principal, required_permissions, join_type, Some(scope))
            .await
    }

    /// Fails with `Unauthorized` or `Forbidden` when access is denied.
    pub async fn require_access<S>(
        &self,
        principal: Option<&Principal>,
        required_permissions: &[S],
        join_type: JoinType,
    ) -> AppResult<()>
    where
        S: AsRef<str> + Sync,
    {
        if self
            .check_access(principal, required_permissions, join_type)
            .await
        {
            return Ok(());
        }

        let names = required_permissions
            .iter()
            .map(|name| format!("'{}'", name.as_ref()))
            .collect::<Vec<_>>()
            .join(&format!(" {} ", join_type.as_str()));

        match principal {
            None => Err(AppError::Unauthorized(format!(
                "authentication required for {names}"
            ))),
            Some(principal) => Err(AppError::Forbidden(format!(
                "user '{}' is missing permission {names}",
                principal.login()
            ))),
        }
    }

    async fn evaluate<S>(
        &self,
        principal: Option<&Principal>,
        required_permissions: &[S],
        join_type: JoinType,
        scope: Option<&EntityScope>,
    ) -> bool
    where
        S: AsRef<str> + Sync,
    {
        if required_permissions.is_empty() {
            return principal.is_some();
        }

        let subject = match principal {
            Some(principal) => AccessSubject::User(UserId::new(principal.user_id())),
            None => match self.resolve_root().await {
                Some(root_id) => AccessSubject::Root(root_id),
                None => return false,
            },
        };

        let mut is_valid = false;
        for name in required_permissions {
            is_valid = self.check_one(subject, name.as_ref(), scope).await;
            if join_type.short_circuits_on(is_valid) {
                break;
            }
        }

        is_valid
    }

    async fn check_one(
        &self,
        subject: AccessSubject,
        name: &str,
        scope: Option<&EntityScope>,
    ) -> bool {
        let result = match subject {
            AccessSubject::User(user_id) => self.resolver.check_user(user_id, name, scope).await,
            AccessSubject::Root(role_id) => self.resolver.check_role(role_id, name, scope).await,
        };

        result.unwrap_or_else(|error| {
            warn!(?subject, permission = name, %error, "permission check failed");
            false
        })
    }

    async fn resolve_root(&self) -> Option<RoleId> {
        match self.role_repository.find_root_role().await {
            Ok(Some(root)) => Some(root.id),
            Ok(None) => {
                warn!("no root role exists; unauthenticated access denied");
                None
            }
            Err(error) => {
                warn!(%error, "failed to resolve root role");
                None
            }
        }
    }
}
