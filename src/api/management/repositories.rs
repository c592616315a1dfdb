//! Translation repository endpoints

use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::repository::Repository;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRepositoryRequest {
    #[validate(required(message = "must not be null"))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryDto {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub created_at: String,
}

impl From<&Repository> for RepositoryDto {
    fn from(repository: &Repository) -> Self {
        Self {
            id: repository.id().to_string(),
            name: repository.name().to_string(),
            created_by: repository.created_by().to_string(),
            created_at: repository.created_at().to_rfc3339(),
        }
    }
}

/// POST /api/repositories
pub async fn create_repository(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CreateRepositoryRequest>,
) -> Result<Json<RepositoryDto>, ApiError> {
    request.validate()?;
    let name = request.name.unwrap_or_default();

    let repository = state.repository_service.create(user.id(), &name).await?;

    Ok(Json(RepositoryDto::from(&repository)))
}

/// GET /api/repositories
pub async fn list_repositories(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<RepositoryDto>>, ApiError> {
    let repositories = state.repository_service.list_for_user(user.id()).await?;

    Ok(Json(repositories.iter().map(RepositoryDto::from).collect()))
}
