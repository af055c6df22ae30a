//! End-to-end tests through the full router: gate, policy, handlers, error bodies.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::app::{build_router, build_state};
use crate::config::{AppEnv, Config};
use crate::services::auth::TokenCodec;
use crate::services::auth::role::{ROLE_ADMIN, ROLE_USER};

const SECRET: &str = "router-test-secret-key-that-is-at-least-32-bytes";
const TTL: i64 = 3600;

fn test_config() -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        app_env: AppEnv::Development,
        database_url: None,
        cors_allowed_origins: Vec::new(),
        jwt_secret: SECRET.to_string(),
        jwt_ttl_seconds: TTL,
        bcrypt_cost: 4,
    }
}

async fn app() -> Router {
    let config = test_config();
    let state = build_state(&config).await.unwrap();
    build_router(state, &config)
}

fn codec() -> TokenCodec {
    TokenCodec::new(SECRET.as_bytes(), TTL)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn register(
    app: &Router,
    username: &str,
    email: &str,
    role: Option<&str>,
) -> (StatusCode, Value) {
    let mut body = json!({
        "username": username,
        "email": email,
        "password": "correct horse",
    });
    if let Some(role) = role {
        body["role"] = json!(role);
    }
    send(app, Method::POST, "/api/auth/register", None, Some(body)).await
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn health_is_outside_the_gate() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn catalog_read_is_public() {
    let app = app().await;
    // passes the gate; no catalog handler is mounted here
    let (status, body) = send(&app, Method::GET, "/api/products/1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn catalog_write_needs_admin() {
    let app = app().await;
    let codec = codec();
    let user = codec.issue("alice", ROLE_USER).unwrap();
    let admin = codec.issue("root", ROLE_ADMIN).unwrap();

    let (status, body) = send(&app, Method::POST, "/api/products", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(user.as_str()),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "FORBIDDEN");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(admin.as_str()),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn register_then_use_the_token() {
    let app = app().await;

    let (status, body) = register(&app, "alice", "alice@x.com", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], ROLE_USER);
    assert!(body["message"].is_string());
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) =
        send(&app, Method::GET, "/api/users/me", Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"username": "alice", "role": ROLE_USER}));
}

#[tokio::test]
async fn register_normalizes_a_bare_admin_role() {
    let app = app().await;
    let (status, body) = register(&app, "root", "root@x.com", Some("admin")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], ROLE_ADMIN);

    let token = body["token"].as_str().unwrap();
    assert_eq!(codec().verify(token).unwrap().role, ROLE_ADMIN);
}

#[tokio::test]
async fn duplicate_registrations_conflict() {
    let app = app().await;
    let (status, _) = register(&app, "alice", "alice@x.com", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&app, "alice", "alice@x.com", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "DUPLICATE_USERNAME");

    let (status, body) = register(&app, "bob", "alice@x.com", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn register_rejects_invalid_bodies() {
    let app = app().await;
    let (status, body) = register(&app, "alice", "not-an-email", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BAD_REQUEST");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"username": "alice"})),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn login_flow() {
    let app = app().await;
    register(&app, "root", "root@x.com", Some("ROLE_ADMIN")).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "root", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_CREDENTIALS");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "ghost", "password": "correct horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_CREDENTIALS");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "root", "password": "correct horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "root");
    assert_eq!(body["role"], ROLE_ADMIN);
    let identity = codec().verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(identity.role, ROLE_ADMIN);
}

#[tokio::test]
async fn invalid_token_behaves_like_no_token() {
    let app = app().await;
    let foreign = TokenCodec::new(b"some-other-secret-that-is-32-bytes-long!", TTL)
        .issue("alice", ROLE_ADMIN)
        .unwrap();

    // public route: still admitted
    for token in ["garbage", foreign.as_str()] {
        let (status, _) = send(&app, Method::GET, "/api/products/1", Some(token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // protected route: 401, never 403
    for token in ["garbage", foreign.as_str()] {
        let (status, _) = send(&app, Method::GET, "/api/users/me", Some(token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn expired_token_is_rejected_on_protected_routes() {
    let app = app().await;
    let issued = chrono::Utc::now().timestamp() - TTL - 10;
    let token = codec().issue_at("alice", ROLE_USER, issued).unwrap();

    let (status, _) = send(&app, Method::GET, "/api/users/me", Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_role_is_authenticated_but_not_privileged() {
    let app = app().await;
    let staff = codec().issue("sam", "ROLE_STAFF").unwrap();

    // fallback rule: any identity
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/reservations/1/status",
        Some(staff.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // member rule: user or admin only
    let (status, _) = send(&app, Method::GET, "/api/orders", Some(staff.as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn preflight_is_never_rejected() {
    let app = app().await;

    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/orders/5")
        .header(header::ORIGIN, "http://localhost:5500")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

    // bare OPTIONS reaches the gate and passes through it
    let (status, _) = send(&app, Method::OPTIONS, "/api/orders/5", None, None).await;
    assert_ne!(status, StatusCode::UNAUTHORIZED);
    assert_ne!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = app().await;
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));
}
