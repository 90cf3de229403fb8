//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_access_repository;
mod postgres_permission_repository;
mod postgres_role_repository;
mod postgres_rows;
mod postgres_user_repository;

pub use argon2_password_hasher::{
    Argon2PasswordHasher, DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM,
};
pub use in_memory_access_repository::InMemoryAccessRepository;
pub use postgres_permission_repository::PostgresPermissionRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_user_repository::PostgresUserRepository;

/// Embedded SQL migrations for the PostgreSQL adapters.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
