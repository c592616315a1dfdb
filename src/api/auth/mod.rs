//! Authentication endpoints
//!
//! Users exchange credentials for a JWT and present it as a bearer token.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(get_current_user))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "must not be blank"))]
    pub username: String,
    #[validate(length(min = 1, message = "must not be blank"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
    pub expires_at: String,
}

/// User fields safe to expose
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            name: user.name().to_string(),
            created_at: user.created_at().to_rfc3339(),
            last_login_at: user.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let user = state
        .user_service
        .authenticate(&request.username, &request.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    let issued = state.jwt_service.generate(&user)?;
    let expires_at = issued
        .claims
        .expires_at()
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();

    info!(user_id = %user.id(), "User logged in");

    Ok(Json(LoginResponse {
        token: issued.token,
        user: UserResponse::from(&user),
        expires_at,
    }))
}

/// GET /auth/me
pub async fn get_current_user(
    RequireUser(user): RequireUser,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(UserResponse::from(&user)))
}
