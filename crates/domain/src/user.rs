//! User domain types and validation rules.

use chrono::{DateTime, Utc};
use rolegate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Unique identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a user identifier from a stored value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable user identifier.
    pub id: UserId,
    /// Unique login name.
    pub login: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum accepted password length.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Maximum accepted login length.
pub const LOGIN_MAX_LENGTH: usize = 64;

/// Validates and normalizes a login name.
pub fn validate_login(login: &str) -> AppResult<String> {
    let login = login.trim();

    if login.is_empty() {
        return Err(AppError::Validation("login must not be empty".to_owned()));
    }

    if login.chars().count() > LOGIN_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "login must not exceed {LOGIN_MAX_LENGTH} characters"
        )));
    }

    if login.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(
            "login must not contain whitespace".to_owned(),
        ));
    }

    Ok(login.to_owned())
}

/// Validates a plaintext password length.
pub fn validate_password(password: &str) -> AppResult<()> {
    let length = password.chars().count();

    if length < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if length > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_login, validate_password};

    #[test]
    fn login_is_trimmed() {
        assert!(matches!(validate_login("  alice "), Ok(login) if login == "alice"));
    }

    #[test]
    fn login_with_inner_whitespace_is_rejected() {
        assert!(validate_login("al ice").is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long-enough").is_ok());
    }
}
