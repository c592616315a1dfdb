//! API key secret generation
//!
//! Secrets are random bytes encoded as URL-safe base64; only their SHA-256
//! hash is used for lookups.

use std::collections::HashSet;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Smallest accepted secret payload
const MIN_KEY_BYTES: usize = 16;

/// A secret must contain strictly more distinct characters than this
const MIN_DISTINCT_CHARS: usize = 10;

/// Result of generating a new API key secret
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The full secret handed to the client
    pub key: String,
    /// Hash of the secret for lookups
    pub hash: String,
}

/// Generator for API key secrets
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    /// Prefix for all generated secrets, may be empty
    prefix: String,
    /// Number of random bytes per secret
    key_bytes: usize,
}

impl ApiKeyGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            key_bytes: 32,
        }
    }

    /// Set the number of random bytes, never below 16
    pub fn with_key_bytes(mut self, bytes: usize) -> Self {
        self.key_bytes = bytes.max(MIN_KEY_BYTES);
        self
    }

    /// Generate a new secret with enough character diversity
    pub fn generate(&self) -> GeneratedApiKey {
        loop {
            let mut random_bytes = vec![0u8; self.key_bytes];
            rand::thread_rng().fill_bytes(&mut random_bytes);

            let encoded = URL_SAFE_NO_PAD.encode(&random_bytes);
            if distinct_chars(&encoded) <= MIN_DISTINCT_CHARS {
                continue;
            }

            let key = format!("{}{}", self.prefix, encoded);
            let hash = self.hash_key(&key);

            return GeneratedApiKey { key, hash };
        }
    }

    /// Hash a secret for storage
    pub fn hash_key(&self, key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let result = hasher.finalize();
        format!("sha256${}", URL_SAFE_NO_PAD.encode(result))
    }

    /// Verify a secret against a stored hash
    pub fn verify_key(&self, key: &str, stored_hash: &str) -> bool {
        let computed_hash = self.hash_key(key);
        constant_time_compare(&computed_hash, stored_hash)
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new("")
    }
}

fn distinct_chars(value: &str) -> usize {
    value.chars().collect::<HashSet<_>>().len()
}

/// Constant-time string comparison
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
