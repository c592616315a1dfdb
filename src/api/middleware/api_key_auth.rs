//! API key authentication via the `X-API-Key` header

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::{ApiKey, ApiScope};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor that requires a valid API key
#[derive(Debug, Clone)]
pub struct RequireApiKey(pub ApiKey);

impl RequireApiKey {
    /// 403 unless the key carries `scope`
    pub fn require_scope(&self, scope: ApiScope) -> Result<(), ApiError> {
        if self.0.has_scope(scope) {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "API key lacks the '{}' scope",
                scope
            )))
        }
    }
}

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let secret = extract_api_key(&parts.headers)?;

        let api_key = state
            .api_key_service
            .get_by_key(&secret)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid API key"))?;

        debug!(api_key_id = %api_key.id(), "API key accepted");
        Ok(RequireApiKey(api_key))
    }
}

fn extract_api_key(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers.get(API_KEY_HEADER).ok_or_else(|| {
        ApiError::unauthorized("API key required. Provide it via the 'X-API-Key' header")
    })?;

    let key = value
        .to_str()
        .map_err(|_| ApiError::bad_request("Invalid X-API-Key header encoding"))?
        .trim();

    if key.is_empty() {
        return Err(ApiError::unauthorized("API key must not be blank"));
    }

    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::{ApiKeyId, ScopeSet};
    use crate::domain::repository::RepositoryId;
    use crate::domain::user::UserId;
    use axum::http::StatusCode;

    #[test]
    fn test_extract_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert("X-API-Key", " secret-value ".parse().unwrap());

        assert_eq!(extract_api_key(&headers).unwrap(), "secret-value");
    }

    #[test]
    fn test_missing_or_blank_key() {
        let err = extract_api_key(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, "   ".parse().unwrap());
        assert_eq!(extract_api_key(&headers).unwrap_err().status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_require_scope() {
        let scopes: ScopeSet = [ApiScope::TranslationsView].into_iter().collect();
        let key = RequireApiKey(ApiKey::new(
            ApiKeyId::new("key-1").unwrap(),
            "secret",
            "sha256$x",
            UserId::new("ben").unwrap(),
            RepositoryId::new("repo-1").unwrap(),
            scopes,
        ));

        assert!(key.require_scope(ApiScope::TranslationsView).is_ok());
        let err = key.require_scope(ApiScope::KeysEdit).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
