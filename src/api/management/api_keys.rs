//! API key management endpoints

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use super::repositories::RepositoryDto;
use crate::api::middleware::{RequireApiKey, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::api_key::{
    ApiKey, ApiKeyId, ApiScope, ScopeSet, REPOSITORY_ID_FIELD, SCOPES_FIELD,
};
use crate::domain::permission::PermissionType;
use crate::domain::repository::RepositoryId;
use crate::domain::{DomainError, FieldErrors};

const ID_FIELD: &str = "id";

/// Request to issue a new key
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    #[validate(required(message = "must not be null"))]
    pub repository_id: Option<String>,
    #[validate(
        required(message = "must not be empty"),
        length(min = 1, message = "must not be empty")
    )]
    pub scopes: Option<Vec<String>>,
}

/// Request to replace the scopes of a key
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditApiKeyRequest {
    #[validate(required(message = "must not be null"))]
    pub id: Option<String>,
    #[validate(
        required(message = "must not be empty"),
        length(min = 1, message = "must not be empty")
    )]
    pub scopes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyDto {
    pub id: String,
    pub key: String,
    pub scopes: ScopeSet,
}

impl From<&ApiKey> for ApiKeyDto {
    fn from(key: &ApiKey) -> Self {
        Self {
            id: key.id().to_string(),
            key: key.key().to_string(),
            scopes: key.scopes().clone(),
        }
    }
}

/// The calling key as seen by itself
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentApiKeyResponse {
    #[serde(flatten)]
    pub api_key: ApiKeyDto,
    pub repository_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteApiKeyResponse {
    pub deleted: bool,
    pub id: String,
}

/// POST /api/apiKeys
pub async fn create_api_key(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<Json<ApiKeyDto>, ApiError> {
    request.validate()?;

    let (repository_id, scopes) = match (request.repository_id, request.scopes) {
        (Some(repository_id), Some(scopes)) => (repository_id, scopes),
        _ => return Err(ApiError::bad_request("repositoryId and scopes are required")),
    };

    let repository_id = RepositoryId::new(repository_id)
        .map_err(|e| DomainError::field(REPOSITORY_ID_FIELD, e.to_string()))?;
    let scopes = parse_scopes(&scopes)?;

    if state.repository_service.get(&repository_id).await?.is_none() {
        return Err(ApiError::not_found(format!(
            "Repository '{}' not found",
            repository_id
        )));
    }

    state
        .api_key_service
        .ensure_scopes_grantable(user.id(), &repository_id, &scopes)
        .await?;

    let created = state
        .api_key_service
        .create(user.id(), scopes, &repository_id)
        .await?;

    Ok(Json(ApiKeyDto::from(&created)))
}

/// POST /api/apiKeys/edit
pub async fn edit_api_key(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<EditApiKeyRequest>,
) -> Result<Json<ApiKeyDto>, ApiError> {
    request.validate()?;

    let (id, scopes) = match (request.id, request.scopes) {
        (Some(id), Some(scopes)) => (id, scopes),
        _ => return Err(ApiError::bad_request("id and scopes are required")),
    };

    let id = parse_key_id(&id)?;
    let scopes = parse_scopes(&scopes)?;

    let existing = state
        .api_key_service
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("API key '{}' not found", id)))?;

    state
        .api_key_service
        .ensure_can_manage(user.id(), &existing)
        .await?;
    state
        .api_key_service
        .ensure_scopes_grantable(user.id(), existing.repository_id(), &scopes)
        .await?;

    let updated = state.api_key_service.edit(&id, scopes).await?;

    Ok(Json(ApiKeyDto::from(&updated)))
}

/// GET /api/apiKeys
pub async fn list_api_keys(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<ApiKeyDto>>, ApiError> {
    debug!(user_id = %user.id(), "Listing caller's API keys");

    let keys = state.api_key_service.list_for_owner(user.id()).await?;

    Ok(Json(keys.iter().map(ApiKeyDto::from).collect()))
}

/// GET /api/apiKeys/repository/{repository_id}
pub async fn list_repository_api_keys(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(repository_id): Path<String>,
) -> Result<Json<Vec<ApiKeyDto>>, ApiError> {
    let repository_id = RepositoryId::new(repository_id)
        .map_err(|e| ApiError::bad_request(e.to_string()).with_param("repositoryId"))?;

    let keys = state
        .api_key_service
        .list_for_repository(user.id(), &repository_id)
        .await?;

    Ok(Json(keys.iter().map(ApiKeyDto::from).collect()))
}

/// DELETE /api/apiKeys/{key_id}
pub async fn delete_api_key(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(key_id): Path<String>,
) -> Result<Json<DeleteApiKeyResponse>, ApiError> {
    let id = parse_key_id(&key_id)?;

    let deleted = state.api_key_service.delete(user.id(), &id).await?;

    Ok(Json(DeleteApiKeyResponse {
        deleted: true,
        id: deleted.id().to_string(),
    }))
}

/// GET /api/apiKeys/availableScopes
pub async fn available_scopes(
    RequireUser(_): RequireUser,
) -> Json<BTreeMap<PermissionType, ScopeSet>> {
    Json(
        PermissionType::ALL
            .into_iter()
            .map(|permission| (permission, permission.scopes()))
            .collect(),
    )
}

/// GET /api/apiKeys/current
pub async fn current_api_key(RequireApiKey(key): RequireApiKey) -> Json<CurrentApiKeyResponse> {
    Json(CurrentApiKeyResponse {
        api_key: ApiKeyDto::from(&key),
        repository_id: key.repository_id().to_string(),
        last_used_at: key.last_used_at().map(|t| t.to_rfc3339()),
    })
}

/// GET /api/apiKeys/current/repository
///
/// Repository the calling key is bound to; needs `translations.view`.
pub async fn current_api_key_repository(
    State(state): State<AppState>,
    api_key: RequireApiKey,
) -> Result<Json<RepositoryDto>, ApiError> {
    api_key.require_scope(ApiScope::TranslationsView)?;

    let repository_id = api_key.0.repository_id();
    let repository = state
        .repository_service
        .get(repository_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Repository '{}' not found", repository_id)))?;

    Ok(Json(RepositoryDto::from(&repository)))
}

fn parse_key_id(id: &str) -> Result<ApiKeyId, ApiError> {
    ApiKeyId::new(id).map_err(|e| DomainError::field(ID_FIELD, e.to_string()).into())
}

/// Unknown scope names are reported against the `scopes` field
fn parse_scopes(raw: &[String]) -> Result<ScopeSet, ApiError> {
    let mut scopes = ScopeSet::new();
    let mut unknown = Vec::new();

    for name in raw {
        match name.parse::<ApiScope>() {
            Ok(scope) => {
                scopes.insert(scope);
            }
            Err(_) => unknown.push(name.as_str()),
        }
    }

    if unknown.is_empty() {
        Ok(scopes)
    } else {
        Err(ApiError::validation(FieldErrors::single(
            SCOPES_FIELD,
            format!("unknown scopes: {}", unknown.join(", ")),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_parse_scopes_deduplicates() {
        let raw = vec![
            "keys.edit".to_string(),
            "translations.view".to_string(),
            "keys.edit".to_string(),
        ];

        let scopes = parse_scopes(&raw).unwrap();
        assert_eq!(scopes.len(), 2);
        assert!(scopes.contains(&ApiScope::KeysEdit));
    }

    #[test]
    fn test_parse_scopes_reports_unknown_names() {
        let raw = vec!["translations.view".to_string(), "admin".to_string()];

        let err = parse_scopes(&raw).unwrap_err();
        let fields = err.response.error.fields.unwrap();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["scopes"], "unknown scopes: admin");
    }

    #[test]
    fn test_create_request_validation() {
        let request: CreateApiKeyRequest =
            serde_json::from_str(r#"{"repositoryId": "repo-1", "scopes": []}"#).unwrap();
        let errors = request.validate().unwrap_err();
        let api_error = ApiError::from(errors);
        let fields = api_error.response.error.fields.unwrap();

        assert_eq!(fields.len(), 1);
        assert_eq!(fields["scopes"], "must not be empty");

        let request: CreateApiKeyRequest =
            serde_json::from_str(r#"{"scopes": ["translations.view"]}"#).unwrap();
        let fields = ApiError::from(request.validate().unwrap_err())
            .response
            .error
            .fields
            .unwrap();

        assert_eq!(fields.len(), 1);
        assert_eq!(fields["repositoryId"], "must not be null");
    }

    #[test]
    fn test_malformed_key_id_is_a_field_error() {
        let err = parse_key_id("-bad id-").unwrap_err();
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "standard_validation");
        assert!(json["error"]["fields"]["id"].as_str().is_some());
    }

    #[test]
    fn test_dto_serializes_scope_names() {
        let scopes: ScopeSet = [ApiScope::TranslationsEdit, ApiScope::TranslationsView]
            .into_iter()
            .collect();
        let dto = ApiKeyDto {
            id: "key-1".to_string(),
            key: "secret".to_string(),
            scopes,
        };

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            json["scopes"],
            serde_json::json!(["translations.view", "translations.edit"])
        );
    }
}
