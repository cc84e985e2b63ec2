#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use haulage_api::auth::jwt::JwtConfig;
use haulage_api::auth::password::hash_password;
use haulage_api::config::ServerConfig;
use haulage_api::routes;
use haulage_api::state::AppState;
use haulage_api::vision::ItemIdentifier;
use haulage_db::models::user::{CreateUser, User};
use haulage_db::repositories::UserRepo;
use haulage_report::ReportSettings;

/// Password given to every user created by [`create_user`].
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
///
/// SMTP and the vision model are left unconfigured.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-that-is-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        email: None,
        vision: None,
        reports: ReportSettings::default(),
    }
}

/// Build the full application router with all middleware layers.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    with_layers(AppState::new(pool, test_config()))
}

/// Like [`build_test_app`], with a stand-in vision model.
pub fn build_test_app_with_identifier(
    pool: PgPool,
    identifier: Arc<dyn ItemIdentifier>,
) -> Router {
    let mut state = AppState::new(pool, test_config());
    state.identifier = Some(identifier);
    with_layers(state)
}

fn with_layers(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Insert an active user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        full_name: Some(format!("{username} tester")),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through the API and return the access token.
pub async fn login(app: Router, username: &str) -> String {
    let body = serde_json::json!({ "username": username, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body into raw bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, body: serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, body, None)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::POST, uri, body, Some(token))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::PUT, uri, body, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a multipart form built from `(field name, content type, bytes)`
/// parts; a `None` content type makes a plain text field.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    parts: &[(&str, Option<&str>, &[u8])],
    token: &str,
) -> Response {
    let boundary = "haulage-test-boundary";
    let mut body: Vec<u8> = Vec::new();
    for (index, (name, content_type, bytes)) in parts.iter().enumerate() {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match content_type {
            Some(ct) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"photo{index}.jpg\"\r\nContent-Type: {ct}\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}
