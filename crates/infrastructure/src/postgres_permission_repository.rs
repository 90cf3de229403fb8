use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use rolegate_application::{
    NewPermission, PermissionFilter, PermissionGrant, PermissionQuery, PermissionRepository,
};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{EntityScope, Page, Permission, PermissionId, RoleId, UserId};

use crate::postgres_rows::{
    PermissionRow, bound_to_i64, count_from_row, missing_reference_or_internal,
};

/// PostgreSQL-backed repository for permission records.
#[derive(Clone)]
pub struct PostgresPermissionRepository {
    pool: PgPool,
}

impl PostgresPermissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GrantRow {
    #[sqlx(flatten)]
    permission: PermissionRow,
    role_entity_id: Option<String>,
    role_entity_type: Option<String>,
}

impl TryFrom<GrantRow> for PermissionGrant {
    type Error = AppError;

    fn try_from(row: GrantRow) -> AppResult<Self> {
        let permission = Permission::try_from(row.permission)?;
        let role_scope = EntityScope::from_parts(row.role_entity_id, row.role_entity_type)
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to decode owning role scope of permission '{}': {error}",
                    permission.id
                ))
            })?;

        Ok(Self {
            permission,
            role_scope,
        })
    }
}

#[async_trait]
impl PermissionRepository for PostgresPermissionRepository {
    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, inherited, entity_id, entity_type, role_id, user_id, created_at
            FROM permissions
            WHERE id = $1
            "#,
        )
        .bind(permission_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?;

        row.map(Permission::try_from).transpose()
    }

    async fn insert_permission(&self, permission: NewPermission) -> AppResult<Permission> {
        let (entity_id, entity_type) = match permission.scope.as_ref() {
            Some(scope) => (Some(scope.entity_id()), Some(scope.entity_type())),
            None => (None, None),
        };

        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            INSERT INTO permissions (name, inherited, entity_id, entity_type, role_id, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, inherited, entity_id, entity_type, role_id, user_id, created_at
            "#,
        )
        .bind(permission.name.as_str())
        .bind(permission.inherited)
        .bind(entity_id)
        .bind(entity_type)
        .bind(permission.owner.role_id().map(|role_id| role_id.as_i64()))
        .bind(permission.owner.user_id().map(|user_id| user_id.as_i64()))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            missing_reference_or_internal(
                error,
                "insert permission",
                &format!("{} was not found", permission.owner),
            )
        })?;

        Permission::try_from(row)
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(permission_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete permission: {error}"))
            })?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' was not found"
            )));
        }

        Ok(())
    }

    async fn list_permissions(&self, query: PermissionQuery) -> AppResult<Page<Permission>> {
        let filter = &query.filter;

        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, inherited, entity_id, entity_type, role_id, user_id, created_at
            FROM permissions
            WHERE ($1::BIGINT IS NULL OR role_id = $1)
                AND ($2::BIGINT IS NULL OR user_id = $2)
                AND (NOT $3 OR inherited)
                AND ($4::TEXT IS NULL OR strpos(lower(name), lower($4)) > 0)
            ORDER BY CASE WHEN $5 THEN -id ELSE id END
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(filter.role_id.map(|role_id| role_id.as_i64()))
        .bind(filter.user_id.map(|user_id| user_id.as_i64()))
        .bind(filter.inherited_only)
        .bind(filter.search.as_deref())
        .bind(query.pagination.descending())
        .bind(bound_to_i64(query.pagination.limit()))
        .bind(bound_to_i64(query.pagination.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        let total = self.count_permissions(filter).await?;

        Ok(Page {
            items: rows
                .into_iter()
                .map(Permission::try_from)
                .collect::<AppResult<Vec<_>>>()?,
            total,
        })
    }

    async fn count_permissions(&self, filter: &PermissionFilter) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM permissions
            WHERE ($1::BIGINT IS NULL OR role_id = $1)
                AND ($2::BIGINT IS NULL OR user_id = $2)
                AND (NOT $3 OR inherited)
                AND ($4::TEXT IS NULL OR strpos(lower(name), lower($4)) > 0)
            "#,
        )
        .bind(filter.role_id.map(|role_id| role_id.as_i64()))
        .bind(filter.user_id.map(|user_id| user_id.as_i64()))
        .bind(filter.inherited_only)
        .bind(filter.search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count permissions: {error}")))?;

        Ok(count_from_row(count))
    }

    async fn list_user_grants(
        &self,
        user_id: UserId,
        name: &str,
    ) -> AppResult<Vec<PermissionGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT
                permissions.id,
                permissions.name,
                permissions.inherited,
                permissions.entity_id,
                permissions.entity_type,
                permissions.role_id,
                permissions.user_id,
                permissions.created_at,
                roles.entity_id AS role_entity_id,
                roles.entity_type AS role_entity_type
            FROM permissions
            LEFT JOIN roles
                ON roles.id = permissions.role_id
            WHERE permissions.name = $2
                AND (
                    permissions.user_id = $1
                    OR permissions.role_id IN (
                        SELECT user_roles.role_id
                        FROM user_roles
                        WHERE user_roles.user_id = $1
                    )
                )
            "#,
        )
        .bind(user_id.as_i64())
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load user grants: {error}")))?;

        rows.into_iter().map(PermissionGrant::try_from).collect()
    }

    async fn list_role_grants(
        &self,
        role_id: RoleId,
        name: &str,
    ) -> AppResult<Vec<PermissionGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT
                permissions.id,
                permissions.name,
                permissions.inherited,
                permissions.entity_id,
                permissions.entity_type,
                permissions.role_id,
                permissions.user_id,
                permissions.created_at,
                roles.entity_id AS role_entity_id,
                roles.entity_type AS role_entity_type
            FROM permissions
            INNER JOIN roles
                ON roles.id = permissions.role_id
            WHERE permissions.role_id = $1
                AND permissions.name = $2
            "#,
        )
        .bind(role_id.as_i64())
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load role grants: {error}")))?;

        rows.into_iter().map(PermissionGrant::try_from).collect()
    }
}
