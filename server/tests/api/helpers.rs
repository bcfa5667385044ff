//! Shared test-server setup and request helpers.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use server::api::servers::app_state::AppState;
use server::api::servers::rest;
use server::bootstrap::config::{
    AuthConfig, Config, ContentConfig, CorsConfig, DbConfig, ServerConfig,
};
use server::modules::auth::jwt;
use server::modules::media::FsThumbnailStore;
use server::modules::profiles;

pub const TRUSTED_DOMAIN: &str = "trusted.example.org";

pub struct TestServer {
    pub router: Router,
    pub db: DatabaseConnection,
    _media: TempDir,
}

fn test_config(media_dir: &str) -> Config {
    Config {
        server: ServerConfig { rest_port: 0 },
        db: DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            logging_enabled: false,
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            allow_credentials: false,
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
        },
        content: ContentConfig {
            trusted_domains: vec![TRUSTED_DOMAIN.to_string()],
            media_dir: media_dir.to_string(),
        },
    }
}

pub async fn setup_test_server() -> TestServer {
    jwt::init_jwt_secret("test-secret");

    let media = TempDir::new().expect("temp dir");
    let config = test_config(media.path().to_str().expect("utf-8 path"));

    // One connection keeps the in-memory database alive and shared.
    let mut opt = ConnectOptions::new(&config.db.url);
    opt.max_connections(1).min_connections(1);
    let db = Database::connect(opt).await.expect("connect");
    Migrator::up(&db, None).await.expect("migrate");

    let store = Arc::new(FsThumbnailStore::new(media.path()));
    let app_state = AppState::new(db.clone(), config.clone(), store);
    let router = rest::build_router(app_state, &config);

    TestServer {
        router,
        db,
        _media: media,
    }
}

/// Registered user with a valid bearer token.
pub struct TestUser {
    pub account_id: i32,
    pub profile_id: i32,
    pub token: String,
}

pub async fn register_user(
    server: &TestServer,
    name: &str,
    email: &str,
    is_moderator: bool,
) -> TestUser {
    let (account, profile) = profiles::create_account(&server.db, name, email, false, is_moderator)
        .await
        .expect("create account");
    let token = jwt::generate_token(account.id, email, name).expect("token");
    TestUser {
        account_id: account.id,
        profile_id: profile.id,
        token,
    }
}

pub async fn request(
    router: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn get(router: &Router, path: &str) -> (StatusCode, Value) {
    request(router, Method::GET, path, None, None).await
}

pub async fn get_authed(router: &Router, path: &str, token: &str) -> (StatusCode, Value) {
    request(router, Method::GET, path, Some(token), None).await
}

/// The database id of a moderation state, by name.
pub async fn state_id(router: &Router, name: &str) -> i64 {
    let (status, body) = get(router, "/api/pulse/entries/moderation-states").await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .expect("state list")
        .iter()
        .find(|s| s["name"] == name)
        .and_then(|s| s["id"].as_i64())
        .expect("state present")
}

/// Submit a minimal valid entry and return the `{status, id}` body.
pub async fn submit_entry(router: &Router, token: &str, title: &str, extra: Value) -> Value {
    let mut payload = serde_json::json!({
        "title": title,
        "content_url": "https://example.org/project",
    });
    if let (Some(base), Some(more)) = (payload.as_object_mut(), extra.as_object()) {
        for (key, value) in more {
            base.insert(key.clone(), value.clone());
        }
    }

    let (status, body) = request(
        router,
        Method::POST,
        "/api/pulse/entries",
        Some(token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "submit failed: {body}");
    assert_eq!(body["status"], "submitted");
    body
}

/// Approve an entry through the moderation endpoint.
pub async fn approve_entry(router: &Router, moderator_token: &str, entry_id: i64) {
    let approved = state_id(router, "Approved").await;
    let (status, body) = request(
        router,
        Method::PUT,
        &format!("/api/pulse/entries/{entry_id}/moderate/{approved}"),
        Some(moderator_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT, "moderate failed: {body}");
}
