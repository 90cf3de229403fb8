//! Argon2id password hasher.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rolegate_application::PasswordHasher as PasswordHasherPort;
use rolegate_core::{AppError, AppResult};

/// Memory cost in KiB used by [`Argon2PasswordHasher::new`].
pub const DEFAULT_MEMORY_KIB: u32 = 19_456;

/// Iteration count used by [`Argon2PasswordHasher::new`].
pub const DEFAULT_ITERATIONS: u32 = 2;

/// Lane count used by [`Argon2PasswordHasher::new`].
pub const DEFAULT_PARALLELISM: u32 = 1;

/// Argon2id hasher producing PHC-formatted strings.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with m=19456, t=2, p=1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(DEFAULT_MEMORY_KIB, DEFAULT_ITERATIONS, DEFAULT_PARALLELISM)
            .unwrap_or_else(|_| Self {
                argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
            })
    }

    /// Creates a hasher with explicit cost parameters.
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> AppResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None).map_err(|error| {
            AppError::Validation(format!("invalid argon2 parameters: {error}"))
        })?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|error| AppError::Internal(format!("failed to hash password: {error}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash).map_err(|error| {
            AppError::Internal(format!("failed to parse password hash: {error}"))
        })?;

        // Stored hashes carry their own parameters, so older hashes keep
        // verifying after the configured cost changes.
        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AppError::Internal(format!(
                "failed to verify password: {error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use rolegate_application::PasswordHasher as PasswordHasherPort;
    use rolegate_core::{AppError, AppResult};

    use super::Argon2PasswordHasher;

    fn fast_hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_params(1024, 1, 1).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn verifies_only_the_original_password() -> AppResult<()> {
        let hasher = fast_hasher();
        let hash = hasher.hash_password("correct horse")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("correct horse", &hash)?);
        assert!(!hasher.verify_password("wrong horse", &hash)?);
        Ok(())
    }

    #[test]
    fn hashes_verify_across_cost_settings() -> AppResult<()> {
        let hash = fast_hasher().hash_password("correct horse")?;

        assert!(Argon2PasswordHasher::new().verify_password("correct horse", &hash)?);
        Ok(())
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let result = fast_hasher().verify_password("anything", "not-a-phc-string");

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn zero_iterations_are_rejected() {
        assert!(matches!(
            Argon2PasswordHasher::with_params(1024, 0, 1),
            Err(AppError::Validation(_))
        ));
    }
}
