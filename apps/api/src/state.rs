use rolegate_application::{AccessDecisionService, PermissionService, RoleService, UserService};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub role_service: RoleService,
    pub permission_service: PermissionService,
    pub user_service: UserService,
    pub access_decision_service: AccessDecisionService,
    /// Present when the postgres backend is configured.
    pub postgres_pool: Option<PgPool>,
}
