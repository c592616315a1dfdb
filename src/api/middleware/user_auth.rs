//! User authentication using JWT bearer tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;
use crate::domain::DomainError;

/// Extractor that requires a valid JWT in `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        let claims = state
            .jwt_service
            .validate(&token)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        debug!(user_id = %claims.user_id(), "JWT accepted");

        let user = state
            .user_service
            .get(claims.user_id())
            .await
            .map_err(|e| match e {
                DomainError::InvalidId { .. } => ApiError::unauthorized("Invalid token subject"),
                other => ApiError::from(other),
            })?
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;

        Ok(RequireUser(user))
    }
}

/// Extract the bearer token from the Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiError::unauthorized(
        "Authentication required. Provide JWT token via 'Authorization: Bearer <token>' header",
    ))
}
