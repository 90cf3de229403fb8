//! User accounts, credential checks and role membership.
//!
//! Login failures never reveal whether the login exists: unknown logins and
//! wrong passwords both surface as `IncorrectCredentials`.

use std::sync::Arc;

use crate::{PasswordHasher, RoleRepository, UserRepository};

mod login;
mod membership;
mod password;
mod registration;
mod retrieval;

/// Application service for user accounts.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    role_repository: Arc<dyn RoleRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        role_repository: Arc<dyn RoleRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            role_repository,
            password_hasher,
        }
    }
}
