use serde::{Deserialize, Serialize};

/// Authenticated caller as supplied by the identity layer.
///
/// The user id is treated as an opaque integer; nothing in the access core
/// verifies it beyond looking up grants attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    user_id: i64,
    login: String,
}

impl Principal {
    /// Creates a principal from an authenticated user id and login.
    #[must_use]
    pub fn new(user_id: i64, login: impl Into<String>) -> Self {
        Self {
            user_id,
            login: login.into(),
        }
    }

    /// Returns the authenticated user id.
    #[must_use]
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Returns the login the principal authenticated with.
    #[must_use]
    pub fn login(&self) -> &str {
        self.login.as_str()
    }
}
