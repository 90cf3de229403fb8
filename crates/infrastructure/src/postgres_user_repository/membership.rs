use crate::postgres_rows::missing_reference_or_internal;

use super::*;

impl PostgresUserRepository {
    pub(super) async fn add_role_impl(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_i64())
        .bind(role_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            missing_reference_or_internal(
                error,
                "assign role",
                &format!("user '{user_id}' or role '{role_id}' was not found"),
            )
        })?;

        Ok(())
    }

    pub(super) async fn remove_role_impl(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let removed = sqlx::query(
            r#"
            DELETE FROM user_roles
            WHERE user_id = $1 AND role_id = $2
            "#,
        )
        .bind(user_id.as_i64())
        .bind(role_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to unassign role: {error}")))?;

        if removed.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "user '{user_id}' is not a member of role '{role_id}'"
            )));
        }

        Ok(())
    }

    pub(super) async fn list_user_roles_impl(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT
                roles.id,
                roles.name,
                roles.parent_id,
                roles.entity_id,
                roles.entity_type,
                roles.created_at,
                roles.modified_at
            FROM user_roles
            INNER JOIN roles
                ON roles.id = user_roles.role_id
            WHERE user_roles.user_id = $1
            ORDER BY roles.id
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list user roles: {error}")))?;

        rows.into_iter().map(Role::try_from).collect()
    }
}
