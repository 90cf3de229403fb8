use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::debug;

use rolegate_application::{NewRole, RoleChanges, RoleQuery, RoleRepository};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Page, Role, RoleId};

use crate::postgres_rows::{
    RoleRow, bound_to_i64, constraint_violation_or_internal, copy_role_permissions,
    count_from_row, missing_reference_or_internal, strip_inherited_permissions,
};

/// PostgreSQL-backed repository for the role tree.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, parent_id, entity_id, entity_type, created_at, modified_at
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?;

        row.map(Role::try_from).transpose()
    }

    async fn find_root_role(&self) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, parent_id, entity_id, entity_type, created_at, modified_at
            FROM roles
            WHERE parent_id IS NULL
            ORDER BY id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find root role: {error}")))?;

        row.map(Role::try_from).transpose()
    }

    async fn list_roles(&self, query: RoleQuery) -> AppResult<Page<Role>> {
        let parent_id = query.parent_id.map(|parent_id| parent_id.as_i64());

        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, parent_id, entity_id, entity_type, created_at, modified_at
            FROM roles
            WHERE ($1::BIGINT IS NULL OR parent_id = $1)
                AND ($2::TEXT IS NULL OR strpos(lower(name), lower($2)) > 0)
            ORDER BY CASE WHEN $3 THEN -id ELSE id END
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(parent_id)
        .bind(query.search.as_deref())
        .bind(query.pagination.descending())
        .bind(bound_to_i64(query.pagination.limit()))
        .bind(bound_to_i64(query.pagination.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM roles
            WHERE ($1::BIGINT IS NULL OR parent_id = $1)
                AND ($2::TEXT IS NULL OR strpos(lower(name), lower($2)) > 0)
            "#,
        )
        .bind(parent_id)
        .bind(query.search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count roles: {error}")))?;

        Ok(Page {
            items: rows
                .into_iter()
                .map(Role::try_from)
                .collect::<AppResult<Vec<_>>>()?,
            total: count_from_row(total),
        })
    }

    async fn count_children(&self, role_id: RoleId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM roles
            WHERE parent_id = $1
            "#,
        )
        .bind(role_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count child roles: {error}")))?;

        Ok(count_from_row(count))
    }

    async fn insert_role(&self, role: NewRole) -> AppResult<Role> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let (entity_id, entity_type) = match role.scope.as_ref() {
            Some(scope) => (Some(scope.entity_id()), Some(scope.entity_type())),
            None => (None, None),
        };

        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (name, parent_id, entity_id, entity_type)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, parent_id, entity_id, entity_type, created_at, modified_at
            "#,
        )
        .bind(role.name.as_str())
        .bind(role.parent_id.map(|parent_id| parent_id.as_i64()))
        .bind(entity_id)
        .bind(entity_type)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            constraint_violation_or_internal(
                error,
                "insert role",
                "a root role already exists",
                "parent role was not found",
            )
        })?;

        let created = Role::try_from(row)?;
        if let Some(parent_id) = created.parent_id {
            let copied = copy_role_permissions(&mut transaction, parent_id, created.id).await?;
            debug!(
                role_id = %created.id,
                parent_id = %parent_id,
                copied,
                "inherited permissions copied"
            );
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(created)
    }

    async fn update_role(&self, role_id: RoleId, changes: RoleChanges) -> AppResult<Role> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        if let Some(parent_id) = changes.parent_id {
            ensure_parent_allowed(&mut transaction, role_id, parent_id).await?;
        }

        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            UPDATE roles
            SET name = COALESCE($2, name),
                parent_id = COALESCE($3, parent_id),
                modified_at = now()
            WHERE id = $1
            RETURNING id, name, parent_id, entity_id, entity_type, created_at, modified_at
            "#,
        )
        .bind(role_id.as_i64())
        .bind(changes.name.as_deref())
        .bind(changes.parent_id.map(|parent_id| parent_id.as_i64()))
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            missing_reference_or_internal(error, "update role", "parent role was not found")
        })?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        if let Some(parent_id) = changes.parent_id {
            let stripped = strip_inherited_permissions(&mut transaction, role_id).await?;
            let copied = copy_role_permissions(&mut transaction, parent_id, role_id).await?;
            debug!(
                role_id = %role_id,
                parent_id = %parent_id,
                stripped,
                copied,
                "inherited permissions replaced"
            );
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Role::try_from(row)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query("DELETE FROM permissions WHERE role_id = $1")
            .bind(role_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete role permissions: {error}"))
            })?;

        sqlx::query("DELETE FROM user_roles WHERE role_id = $1")
            .bind(role_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to detach role members: {error}"))
            })?;

        let deleted = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                if let sqlx::Error::Database(ref database_error) = error
                    && database_error.is_foreign_key_violation()
                {
                    return AppError::Conflict(format!("role '{role_id}' still has child roles"));
                }
                AppError::Internal(format!("failed to delete role: {error}"))
            })?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }

    async fn copy_permissions(&self, from: RoleId, to: RoleId) -> AppResult<u64> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let copied = copy_role_permissions(&mut transaction, from, to).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(copied)
    }

    async fn remove_inherited_permissions(&self, role_id: RoleId) -> AppResult<u64> {
        let mut connection = self.pool.acquire().await.map_err(|error| {
            AppError::Internal(format!("failed to acquire connection: {error}"))
        })?;

        strip_inherited_permissions(&mut connection, role_id).await
    }
}

/// Serializes tree moves, then rejects a parent that would move the root or
/// close a cycle.
async fn ensure_parent_allowed(
    connection: &mut PgConnection,
    role_id: RoleId,
    parent_id: RoleId,
) -> AppResult<()> {
    // Self-conflicting mode: concurrent moves queue here while reads proceed.
    sqlx::query("LOCK TABLE roles IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut *connection)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock role tree: {error}")))?;

    let (name, current_parent_id) = sqlx::query_as::<_, (String, Option<i64>)>(
        r#"
        SELECT name, parent_id
        FROM roles
        WHERE id = $1
        "#,
    )
    .bind(role_id.as_i64())
    .fetch_optional(&mut *connection)
    .await
    .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?
    .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

    if current_parent_id.is_none() {
        return Err(AppError::RoleRootCannotBeDeleted(format!(
            "root role '{name}' cannot be assigned a parent"
        )));
    }

    let closes_cycle = sqlx::query_scalar::<_, bool>(
        r#"
        WITH RECURSIVE ancestors (id, parent_id) AS (
            SELECT id, parent_id FROM roles WHERE id = $1
            UNION
            SELECT roles.id, roles.parent_id
            FROM roles
            INNER JOIN ancestors ON roles.id = ancestors.parent_id
        )
        SELECT EXISTS (SELECT 1 FROM ancestors WHERE id = $2)
        "#,
    )
    .bind(parent_id.as_i64())
    .bind(role_id.as_i64())
    .fetch_one(&mut *connection)
    .await
    .map_err(|error| AppError::Internal(format!("failed to walk role ancestors: {error}")))?;

    if closes_cycle {
        return Err(AppError::RoleCannotBeItsParent(format!(
            "role '{name}' cannot be moved under role '{parent_id}'"
        )));
    }

    Ok(())
}
