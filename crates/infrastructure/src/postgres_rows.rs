//! Row mappings and error helpers shared by the PostgreSQL adapters.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};

use rolegate_core::{AppError, AppResult};
use rolegate_domain::{
    EntityScope, Permission, PermissionId, PermissionOwner, Role, RoleId, User, UserId,
};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, FromRow)]
pub(crate) struct RoleRow {
    id: i64,
    name: String,
    parent_id: Option<i64>,
    entity_id: Option<String>,
    entity_type: Option<String>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl TryFrom<RoleRow> for Role {
    type Error = AppError;

    fn try_from(row: RoleRow) -> AppResult<Self> {
        let role_id = row.id;
        let scope = EntityScope::from_parts(row.entity_id, row.entity_type).map_err(|error| {
            AppError::Internal(format!("failed to decode scope of role '{role_id}': {error}"))
        })?;

        Ok(Self {
            id: RoleId::new(role_id),
            name: row.name,
            parent_id: row.parent_id.map(RoleId::new),
            scope,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PermissionRow {
    id: i64,
    name: String,
    inherited: bool,
    entity_id: Option<String>,
    entity_type: Option<String>,
    role_id: Option<i64>,
    user_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PermissionRow> for Permission {
    type Error = AppError;

    fn try_from(row: PermissionRow) -> AppResult<Self> {
        let permission_id = row.id;
        let owner = match (row.role_id, row.user_id) {
            (Some(role_id), None) => PermissionOwner::Role(RoleId::new(role_id)),
            (None, Some(user_id)) => PermissionOwner::User(UserId::new(user_id)),
            _ => {
                return Err(AppError::Internal(format!(
                    "permission '{permission_id}' must have exactly one owner"
                )));
            }
        };

        let scope = EntityScope::from_parts(row.entity_id, row.entity_type).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode scope of permission '{permission_id}': {error}"
            ))
        })?;

        Ok(Self {
            id: PermissionId::new(permission_id),
            name: row.name,
            inherited: row.inherited,
            scope,
            owner,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    id: i64,
    login: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            login: row.login,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

/// Converts a count column into the unsigned count used by the ports.
pub(crate) fn count_from_row(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Converts a window bound into a bind parameter.
pub(crate) fn bound_to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Maps unique violations to `Conflict` and anything else to `Internal`.
pub(crate) fn conflict_or_internal(error: sqlx::Error, operation: &str, conflict: &str) -> AppError {
    if database_code(&error).as_deref() == Some(UNIQUE_VIOLATION) {
        return AppError::Conflict(conflict.to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

/// Maps unique violations to `Conflict`, foreign key violations to `NotFound`
/// and anything else to `Internal`.
pub(crate) fn constraint_violation_or_internal(
    error: sqlx::Error,
    operation: &str,
    conflict: &str,
    missing: &str,
) -> AppError {
    match database_code(&error).as_deref() {
        Some(UNIQUE_VIOLATION) => AppError::Conflict(conflict.to_owned()),
        Some(FOREIGN_KEY_VIOLATION) => AppError::NotFound(missing.to_owned()),
        _ => AppError::Internal(format!("failed to {operation}: {error}")),
    }
}

/// Maps foreign key violations to `NotFound` and anything else to `Internal`.
pub(crate) fn missing_reference_or_internal(
    error: sqlx::Error,
    operation: &str,
    missing: &str,
) -> AppError {
    if database_code(&error).as_deref() == Some(FOREIGN_KEY_VIOLATION) {
        return AppError::NotFound(missing.to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

fn database_code(error: &sqlx::Error) -> Option<String> {
    match error {
        sqlx::Error::Database(database_error) => {
            database_error.code().map(|code| code.into_owned())
        }
        _ => None,
    }
}

/// Copies every permission owned by `from` into `to` as inherited copies.
pub(crate) async fn copy_role_permissions(
    connection: &mut PgConnection,
    from: RoleId,
    to: RoleId,
) -> AppResult<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO permissions (name, inherited, entity_id, entity_type, role_id)
        SELECT name, true, entity_id, entity_type, $2
        FROM permissions
        WHERE role_id = $1
        ORDER BY id
        "#,
    )
    .bind(from.as_i64())
    .bind(to.as_i64())
    .execute(connection)
    .await
    .map_err(|error| AppError::Internal(format!("failed to copy role permissions: {error}")))?;

    Ok(result.rows_affected())
}

/// Deletes the inherited permissions of a role.
pub(crate) async fn strip_inherited_permissions(
    connection: &mut PgConnection,
    role_id: RoleId,
) -> AppResult<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM permissions
        WHERE role_id = $1 AND inherited
        "#,
    )
    .bind(role_id.as_i64())
    .execute(connection)
    .await
    .map_err(|error| {
        AppError::Internal(format!("failed to remove inherited permissions: {error}"))
    })?;

    Ok(result.rows_affected())
}
