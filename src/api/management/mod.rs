//! Endpoints for signed-in users managing repositories and their API keys

pub mod api_keys;
pub mod repositories;

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::state::AppState;

/// Routes mounted under `/api`
pub fn create_management_router() -> Router<AppState> {
    Router::new()
        // API keys
        .route(
            "/apiKeys",
            get(api_keys::list_api_keys).post(api_keys::create_api_key),
        )
        .route("/apiKeys/edit", post(api_keys::edit_api_key))
        .route("/apiKeys/availableScopes", get(api_keys::available_scopes))
        .route("/apiKeys/current", get(api_keys::current_api_key))
        .route(
            "/apiKeys/current/repository",
            get(api_keys::current_api_key_repository),
        )
        .route(
            "/apiKeys/repository/{repository_id}",
            get(api_keys::list_repository_api_keys),
        )
        .route("/apiKeys/{key_id}", delete(api_keys::delete_api_key))
        // Repositories
        .route(
            "/repositories",
            get(repositories::list_repositories).post(repositories::create_repository),
        )
}
