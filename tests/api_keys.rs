use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use glossa_api::api::state::UserServiceTrait;
use glossa_api::api::{create_router, AppState};
use glossa_api::domain::DomainError;
use glossa_api::domain::repository::RepositoryId;
use glossa_api::domain::user::User;
use glossa_api::infrastructure::user::CreateUserRequest;
use glossa_api::{create_app_state_with_config, AppConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    state: AppState,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    async fn with_config(config: AppConfig) -> Self {
        let state = create_app_state_with_config(&config).await.unwrap();
        let router = create_router(state.clone());
        Self { state, router }
    }

    async fn user(&self, username: &str) -> (User, String) {
        let user = self
            .state
            .user_service
            .create(CreateUserRequest {
                username: username.to_string(),
                password: "correct-horse".to_string(),
                name: None,
            })
            .await
            .unwrap();
        let token = self.state.jwt_service.generate(&user).unwrap().token;
        (user, token)
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn repository(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .post("/api/repositories", token, json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    async fn api_key(&self, token: &str, repository_id: &str, scopes: Value) -> Value {
        let (status, body) = self
            .post(
                "/api/apiKeys",
                token,
                json!({ "repositoryId": repository_id, "scopes": scopes }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body
    }
}

fn scope_names(body: &Value) -> HashSet<String> {
    body["scopes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap().to_string())
        .collect()
}

fn ids(body: &Value) -> HashSet<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|k| k["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_api_key() {
    let app = TestApp::new().await;
    let (_, token) = app.user("ben").await;
    let repository_id = app.repository(&token, "Mobile app").await;

    let body = app
        .api_key(&token, &repository_id, json!(["translations.view", "keys.edit"]))
        .await;

    let key = body["key"].as_str().unwrap();
    let distinct: HashSet<char> = key.chars().collect();
    assert!(distinct.len() > 10, "secret '{key}' is not diverse enough");
    assert_eq!(
        scope_names(&body),
        HashSet::from(["translations.view".to_string(), "keys.edit".to_string()])
    );
    assert!(body["id"].as_str().is_some());
}

#[tokio::test]
async fn test_create_without_scopes_reports_one_field() {
    let app = TestApp::new().await;
    let (_, token) = app.user("ben").await;
    let repository_id = app.repository(&token, "Web").await;

    let (status, body) = app
        .post(
            "/api/apiKeys",
            &token,
            json!({ "repositoryId": repository_id, "scopes": [] }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "standard_validation");
    let fields = body["error"]["fields"].as_object().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields["scopes"], "must not be empty");
}

#[tokio::test]
async fn test_create_without_repository_reports_one_field() {
    let app = TestApp::new().await;
    let (_, token) = app.user("ben").await;

    let (status, body) = app
        .post(
            "/api/apiKeys",
            &token,
            json!({ "scopes": ["translations.view"] }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = body["error"]["fields"].as_object().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields["repositoryId"], "must not be null");
}

#[tokio::test]
async fn test_create_for_unknown_repository_is_not_found() {
    let app = TestApp::new().await;
    let (_, token) = app.user("ben").await;

    let (status, _) = app
        .post(
            "/api/apiKeys",
            &token,
            json!({ "repositoryId": "missing-repo", "scopes": ["translations.view"] }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_limited_by_permission_type() {
    let app = TestApp::new().await;
    let (_, owner_token) = app.user("ben").await;
    let (translator, translator_token) = app.user("tereza").await;
    let repository_id = app.repository(&owner_token, "Docs").await;

    let repo = RepositoryId::new(repository_id.clone()).unwrap();
    app.state
        .permission_service
        .grant(
            translator.id(),
            &repo,
            glossa_api::domain::PermissionType::Translate,
        )
        .await
        .unwrap();

    let (status, body) = app
        .post(
            "/api/apiKeys",
            &translator_token,
            json!({ "repositoryId": repository_id, "scopes": ["keys.edit"] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["fields"]["scopes"]
        .as_str()
        .unwrap()
        .contains("keys.edit"));

    app.api_key(&translator_token, &repository_id, json!(["translations.edit"]))
        .await;
}

#[tokio::test]
async fn test_create_without_permission_is_forbidden() {
    let app = TestApp::new().await;
    let (_, owner_token) = app.user("ben").await;
    let (_, stranger_token) = app.user("mallory").await;
    let repository_id = app.repository(&owner_token, "Private").await;

    let (status, body) = app
        .post(
            "/api/apiKeys",
            &stranger_token,
            json!({ "repositoryId": repository_id, "scopes": ["translations.view"] }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["type"], "permission_error");
}

#[tokio::test]
async fn test_edit_replaces_scopes() {
    let app = TestApp::new().await;
    let (_, token) = app.user("ben").await;
    let repository_id = app.repository(&token, "Web").await;
    let created = app
        .api_key(&token, &repository_id, json!(["translations.view", "keys.edit"]))
        .await;

    let (status, body) = app
        .post(
            "/api/apiKeys/edit",
            &token,
            json!({ "id": created["id"], "scopes": ["translations.edit"] }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["key"], created["key"]);
    assert_eq!(
        scope_names(&body),
        HashSet::from(["translations.edit".to_string()])
    );
}

#[tokio::test]
async fn test_edit_without_scopes_reports_one_field() {
    let app = TestApp::new().await;
    let (_, token) = app.user("ben").await;
    let repository_id = app.repository(&token, "Web").await;
    let created = app
        .api_key(&token, &repository_id, json!(["translations.view"]))
        .await;

    let (status, body) = app
        .post(
            "/api/apiKeys/edit",
            &token,
            json!({ "id": created["id"], "scopes": [] }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = body["error"]["fields"].as_object().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields["scopes"], "must not be empty");
}

#[tokio::test]
async fn test_edit_unknown_key_is_not_found() {
    let app = TestApp::new().await;
    let (_, token) = app.user("ben").await;

    let (status, _) = app
        .post(
            "/api/apiKeys/edit",
            &token,
            json!({ "id": "no-such-key", "scopes": ["translations.view"] }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_returns_only_callers_keys() {
    let app = TestApp::new().await;
    let (_, ben) = app.user("ben").await;
    let (_, ana) = app.user("ana").await;
    let ben_repo = app.repository(&ben, "Ben's").await;
    let ana_repo = app.repository(&ana, "Ana's").await;

    let first = app.api_key(&ben, &ben_repo, json!(["translations.view"])).await;
    let second = app.api_key(&ben, &ben_repo, json!(["keys.edit"])).await;
    app.api_key(&ana, &ana_repo, json!(["translations.view"])).await;

    let (status, body) = app.get("/api/apiKeys", &ben).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ids(&body),
        HashSet::from([
            first["id"].as_str().unwrap().to_string(),
            second["id"].as_str().unwrap().to_string(),
        ])
    );
}

#[tokio::test]
async fn test_list_by_repository_requires_full_access() {
    let app = TestApp::new().await;
    let (_, owner) = app.user("ben").await;
    let (viewer, viewer_token) = app.user("vera").await;
    let repository_id = app.repository(&owner, "Shared").await;
    let repo = RepositoryId::new(repository_id.clone()).unwrap();

    app.state
        .permission_service
        .grant(viewer.id(), &repo, glossa_api::domain::PermissionType::View)
        .await
        .unwrap();

    let owners_key = app.api_key(&owner, &repository_id, json!(["keys.edit"])).await;
    let viewers_key = app
        .api_key(&viewer_token, &repository_id, json!(["translations.view"]))
        .await;

    let uri = format!("/api/apiKeys/repository/{}", repository_id);
    let (status, _) = app.get(&uri, &viewer_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.state
        .permission_service
        .grant_full_access(viewer.id(), &repo)
        .await
        .unwrap();

    let (status, body) = app.get(&uri, &viewer_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ids(&body),
        HashSet::from([
            owners_key["id"].as_str().unwrap().to_string(),
            viewers_key["id"].as_str().unwrap().to_string(),
        ])
    );
}

#[tokio::test]
async fn test_delete_requires_owner_or_full_access() {
    let app = TestApp::new().await;
    let (_, owner) = app.user("ben").await;
    let (_, stranger) = app.user("mallory").await;
    let repository_id = app.repository(&owner, "Web").await;
    let created = app
        .api_key(&owner, &repository_id, json!(["translations.view"]))
        .await;
    let uri = format!("/api/apiKeys/{}", created["id"].as_str().unwrap());

    let (status, _) = app.delete(&uri, &stranger).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.delete(&uri, &owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (status, _) = app.delete(&uri, &owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_key_authenticates_itself() {
    let app = TestApp::new().await;
    let (_, token) = app.user("ben").await;
    let repository_id = app.repository(&token, "Web").await;
    let created = app
        .api_key(&token, &repository_id, json!(["translations.view"]))
        .await;

    let (status, body) = app
        .send(
            Request::builder()
                .uri("/api/apiKeys/current")
                .header("X-API-Key", created["key"].as_str().unwrap())
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["repositoryId"], repository_id.as_str());
    assert!(body["lastUsedAt"].as_str().is_some());

    let (status, _) = app
        .send(
            Request::builder()
                .uri("/api/apiKeys/current")
                .header("X-API-Key", "not-a-real-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_available_scopes_per_permission() {
    let app = TestApp::new().await;
    let (_, token) = app.user("ben").await;

    let (status, body) = app.get("/api/apiKeys/availableScopes", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["VIEW"], json!(["translations.view"]));
    assert_eq!(body["MANAGE"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Request::builder()
                .uri("/api/apiKeys")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["type"], "authentication_error");

    let (status, _) = app.get("/api/apiKeys", "garbage.token.value").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_initial_user() {
    let mut config = AppConfig::default();
    config.auth.initial_username = Some("admin".to_string());
    config.auth.initial_password = Some("admin-password".to_string());
    let app = TestApp::with_config(config).await;

    let (status, body) = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "username": "admin", "password": "admin-password" }).to_string(),
                ))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["username"], "admin");
    assert!(body["expiresAt"].as_str().is_some());

    let token = body["token"].as_str().unwrap();
    let (status, me) = app.get("/auth/me", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "admin");

    let (status, _) = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "username": "admin", "password": "wrong-password" }).to_string(),
                ))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_security_headers_and_health() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert!(response.headers().contains_key("x-request-id"));

    let (status, body) = app
        .send(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_key_scope_gates_repository_lookup() {
    let app = TestApp::new().await;
    let (_, token) = app.user("ben").await;
    let repository_id = app.repository(&token, "Web").await;
    let viewer_key = app
        .api_key(&token, &repository_id, json!(["translations.view"]))
        .await;
    let editor_key = app.api_key(&token, &repository_id, json!(["keys.edit"])).await;

    let lookup = |key: &Value| {
        Request::builder()
            .uri("/api/apiKeys/current/repository")
            .header("X-API-Key", key["key"].as_str().unwrap())
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = app.send(lookup(&viewer_key)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["id"], repository_id.as_str());
    assert_eq!(body["name"], "Web");

    let (status, body) = app.send(lookup(&editor_key)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["type"], "permission_error");
}

#[tokio::test]
async fn test_edit_by_stranger_is_forbidden() {
    let app = TestApp::new().await;
    let (_, owner) = app.user("ben").await;
    let (_, stranger) = app.user("mallory").await;
    let repository_id = app.repository(&owner, "Web").await;
    let created = app
        .api_key(&owner, &repository_id, json!(["translations.view"]))
        .await;

    let (status, body) = app
        .post(
            "/api/apiKeys/edit",
            &stranger,
            json!({ "id": created["id"], "scopes": ["keys.edit"] }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["type"], "permission_error");
}

#[tokio::test]
async fn test_edit_by_full_access_non_owner() {
    let app = TestApp::new().await;
    let (_, owner) = app.user("ben").await;
    let (manager, manager_token) = app.user("maria").await;
    let repository_id = app.repository(&owner, "Web").await;
    let created = app
        .api_key(&owner, &repository_id, json!(["translations.view"]))
        .await;

    app.state
        .permission_service
        .grant_full_access(manager.id(), &RepositoryId::new(repository_id).unwrap())
        .await
        .unwrap();

    let (status, body) = app
        .post(
            "/api/apiKeys/edit",
            &manager_token,
            json!({ "id": created["id"], "scopes": ["keys.edit"] }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(scope_names(&body), HashSet::from(["keys.edit".to_string()]));
}

#[tokio::test]
async fn test_edit_beyond_permission_type_reports_scopes() {
    let app = TestApp::new().await;
    let (_, owner) = app.user("ben").await;
    let (translator, translator_token) = app.user("tereza").await;
    let repository_id = app.repository(&owner, "Docs").await;

    app.state
        .permission_service
        .grant(
            translator.id(),
            &RepositoryId::new(repository_id.clone()).unwrap(),
            glossa_api::domain::PermissionType::Translate,
        )
        .await
        .unwrap();
    let created = app
        .api_key(&translator_token, &repository_id, json!(["translations.view"]))
        .await;

    let (status, body) = app
        .post(
            "/api/apiKeys/edit",
            &translator_token,
            json!({ "id": created["id"], "scopes": ["translations.view", "keys.edit"] }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "standard_validation");
    let fields = body["error"]["fields"].as_object().unwrap();
    assert_eq!(fields.len(), 1);
    assert!(fields["scopes"].as_str().unwrap().contains("keys.edit"));
}

#[tokio::test]
async fn test_edit_with_malformed_id_reports_field() {
    let app = TestApp::new().await;
    let (_, token) = app.user("ben").await;

    let (status, body) = app
        .post(
            "/api/apiKeys/edit",
            &token,
            json!({ "id": "not a key id", "scopes": ["translations.view"] }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "standard_validation");
    assert!(body["error"]["fields"]["id"].as_str().is_some());
}

#[derive(Debug)]
struct UnavailableUsers;

#[async_trait::async_trait]
impl UserServiceTrait for UnavailableUsers {
    async fn create(&self, _request: CreateUserRequest) -> Result<User, DomainError> {
        Err(DomainError::storage("database unavailable"))
    }

    async fn ensure(&self, _request: CreateUserRequest) -> Result<User, DomainError> {
        Err(DomainError::storage("database unavailable"))
    }

    async fn authenticate(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<Option<User>, DomainError> {
        Err(DomainError::storage("database unavailable"))
    }

    async fn get(&self, _id: &str) -> Result<Option<User>, DomainError> {
        Err(DomainError::storage("database unavailable"))
    }

    async fn get_by_username(&self, _username: &str) -> Result<Option<User>, DomainError> {
        Err(DomainError::storage("database unavailable"))
    }
}

#[tokio::test]
async fn test_user_lookup_failure_is_server_error() {
    let app = TestApp::new().await;
    let (_, token) = app.user("ben").await;

    let mut state = app.state.clone();
    state.user_service = Arc::new(UnavailableUsers);
    let app = TestApp {
        router: create_router(state.clone()),
        state,
    };

    let (status, body) = app.get("/api/apiKeys", &token).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["type"], "server_error");
}
