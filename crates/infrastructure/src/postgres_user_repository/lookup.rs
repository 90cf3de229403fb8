use crate::postgres_rows::{bound_to_i64, count_from_row};

use super::*;

impl PostgresUserRepository {
    pub(super) async fn find_by_id_impl(&self, user_id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, login, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by id: {error}")))?;

        Ok(row.map(User::from))
    }

    pub(super) async fn find_by_login_impl(&self, login: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, login, password_hash, created_at
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by login: {error}")))?;

        Ok(row.map(User::from))
    }

    pub(super) async fn list_users_impl(&self, query: UserQuery) -> AppResult<Page<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, login, password_hash, created_at
            FROM users
            WHERE $1::TEXT IS NULL OR strpos(lower(login), lower($1)) > 0
            ORDER BY CASE WHEN $2 THEN -id ELSE id END
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(query.search.as_deref())
        .bind(query.pagination.descending())
        .bind(bound_to_i64(query.pagination.limit()))
        .bind(bound_to_i64(query.pagination.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE $1::TEXT IS NULL OR strpos(lower(login), lower($1)) > 0
            "#,
        )
        .bind(query.search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count users: {error}")))?;

        Ok(Page {
            items: rows.into_iter().map(User::from).collect(),
            total: count_from_row(total),
        })
    }
}
