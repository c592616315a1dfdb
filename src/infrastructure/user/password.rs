//! Password hashing with Argon2

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Hashes and verifies account passwords
pub trait PasswordHasher: Send + Sync + Debug {
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// False for a wrong password and for an unparseable hash
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id hasher with default parameters
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("translate-me").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("translate-me", &hash));
        assert!(!hasher.verify("translate-you", &hash));
    }

    #[test]
    fn test_salted_hashes_differ() {
        let hasher = Argon2Hasher;

        let first = hasher.hash("translate-me").unwrap();
        let second = hasher.hash("translate-me").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_malformed_hash() {
        assert!(!Argon2Hasher.verify("password", "plaintext"));
        assert!(!Argon2Hasher.verify("password", ""));
    }
}
