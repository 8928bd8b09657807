use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::AuthConfig;
use crate::error::AppError;

/// Argon2id password hashing with a fresh random salt per hash.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl PasswordHasher {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AppError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AppError::ConfigError(format!("Invalid password hashing parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        Self::new(config.hash_memory_kib, config.hash_iterations, config.hash_parallelism)
    }

    /// Hashes `plaintext` into a PHC string that embeds algorithm, params and salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))
    }

    /// Returns `true` only if `plaintext` matches `stored_hash`. A stored hash
    /// that cannot be parsed never matches.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("s3cret").unwrap();
        assert!(hasher.verify("s3cret", &hash));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hasher = fast_hasher();
        let hash = hasher.hash("s3cret").unwrap();
        assert!(!hasher.verify("s3cret ", &hash));
        assert!(!hasher.verify("S3cret", &hash));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn test_salt_differs_per_hash() {
        let hasher = fast_hasher();
        let first = hasher.hash("s3cret").unwrap();
        let second = hasher.hash("s3cret").unwrap();

        assert_ne!(first, second);
        assert_eq!(first.len(), second.len());
        assert!(hasher.verify("s3cret", &first));
        assert!(hasher.verify("s3cret", &second));
    }

    #[test]
    fn test_hash_does_not_contain_plaintext() {
        let hasher = fast_hasher();
        let hash = hasher.hash("plaintext-marker").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("plaintext-marker"));
    }

    #[test]
    fn test_garbage_hash_never_matches() {
        let hasher = fast_hasher();
        assert!(!hasher.verify("s3cret", "not-a-phc-string"));
        assert!(!hasher.verify("s3cret", ""));
    }

    #[test]
    fn test_verify_uses_params_from_hash() {
        let hash = fast_hasher().hash("s3cret").unwrap();
        let other = PasswordHasher::new(2048, 2, 1).unwrap();
        assert!(other.verify("s3cret", &hash));
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(matches!(
            PasswordHasher::new(1, 0, 0),
            Err(AppError::ConfigError(_))
        ));
    }
}
