//! JWT token generation and validation

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::user::User;
use crate::domain::DomainError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    /// Issued at (Unix epoch)
    pub iat: i64,
    /// Expiration (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    pub fn new(user: &User, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub: user.id().as_str().to_string(),
            username: user.username().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.sub
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Configuration for the JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret
    pub secret: String,
    pub expiration_hours: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

/// Issued token together with its claims
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: JwtClaims,
}

/// Trait for JWT operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Issue a token for a user
    fn generate(&self, user: &User) -> Result<IssuedToken, DomainError>;

    /// Validate a token and return its claims
    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError>;
}

/// HS256 JWT service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_hours", &self.config.expiration_hours)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, user: &User) -> Result<IssuedToken, DomainError> {
        let claims = JwtClaims::new(user, self.config.expiration_hours);

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))?;

        Ok(IssuedToken { token, claims })
    }

    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError> {
        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| DomainError::authentication(format!("Invalid JWT: {}", e)))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;

    fn test_user() -> User {
        User::new(UserId::new("ben").unwrap(), "ben", "Ben", "hash")
    }

    #[test]
    fn test_generate_and_validate() {
        let service = JwtService::new(JwtConfig::new("test-secret", 2));
        let issued = service.generate(&test_user()).unwrap();

        let claims = service.validate(&issued.token).unwrap();
        assert_eq!(claims.user_id(), "ben");
        assert_eq!(claims.username, "ben");
        assert_eq!(claims.exp - claims.iat, 2 * 3600);
        assert!(claims.expires_at().is_some());
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let issuer = JwtService::new(JwtConfig::new("secret-a", 1));
        let verifier = JwtService::new(JwtConfig::new("secret-b", 1));
        let issued = issuer.generate(&test_user()).unwrap();

        let result = verifier.validate(&issued.token);
        assert!(matches!(result, Err(DomainError::Authentication { .. })));
    }

    #[test]
    fn test_rejects_garbage() {
        let service = JwtService::new(JwtConfig::new("test-secret", 1));
        assert!(service.validate("not-a-token").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let service = JwtService::new(JwtConfig::new("super-secret", 1));
        assert!(!format!("{:?}", service).contains("super-secret"));
    }
}
