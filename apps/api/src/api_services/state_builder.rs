use std::sync::Arc;

use rolegate_application::{
    AccessDecisionService, PermissionRepository, PermissionResolver, PermissionService,
    RoleRepository, RoleService, UserRepository, UserService,
};
use rolegate_infrastructure::{
    Argon2PasswordHasher, InMemoryAccessRepository, PostgresPermissionRepository,
    PostgresRoleRepository, PostgresUserRepository,
};
use sqlx::PgPool;

use crate::state::AppState;

struct RepositorySet {
    role_repository: Arc<dyn RoleRepository>,
    permission_repository: Arc<dyn PermissionRepository>,
    user_repository: Arc<dyn UserRepository>,
}

pub fn build_postgres_state(pool: PgPool) -> AppState {
    let repositories = RepositorySet {
        role_repository: Arc::new(PostgresRoleRepository::new(pool.clone())),
        permission_repository: Arc::new(PostgresPermissionRepository::new(pool.clone())),
        user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
    };

    build_app_state(repositories, Some(pool))
}

pub fn build_memory_state() -> AppState {
    let repository = Arc::new(InMemoryAccessRepository::new());
    let repositories = RepositorySet {
        role_repository: repository.clone(),
        permission_repository: repository.clone(),
        user_repository: repository,
    };

    build_app_state(repositories, None)
}

fn build_app_state(repositories: RepositorySet, postgres_pool: Option<PgPool>) -> AppState {
    let password_hasher = Arc::new(Argon2PasswordHasher::new());
    let resolver = PermissionResolver::new(repositories.permission_repository.clone());

    AppState {
        role_service: RoleService::new(repositories.role_repository.clone()),
        permission_service: PermissionService::new(
            repositories.permission_repository,
            repositories.role_repository.clone(),
            repositories.user_repository.clone(),
        ),
        user_service: UserService::new(
            repositories.user_repository,
            repositories.role_repository.clone(),
            password_hasher,
        ),
        access_decision_service: AccessDecisionService::new(
            resolver,
            repositories.role_repository,
        ),
        postgres_pool,
    }
}
