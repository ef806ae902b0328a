//! Shared fixtures for the minecam-axum integration tests.
//!
//! Each test gets its own temporary config/data layout with three cameras
//! (all on placeholder RTSP addresses, so nothing is decoded) and three
//! users.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use minecam_axum::auth::DEFAULT_TOKEN_TTL;
use minecam_axum::{AxumContext, CorsConfig, DataPaths, ServerConfig, bootstrap, create_router};
use minecam_runtime::StreamSettings;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse";

fn write_json(path: &Path, value: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

fn user(user_id: i64, username: &str, role: &str, disabled: bool) -> Value {
    json!({
        "user_id": user_id,
        "username": username,
        "full_name": format!("{username} account"),
        "email": format!("{username}@mine.local"),
        "role": role,
        "disabled": disabled,
        "hashed_password": bcrypt::hash(PASSWORD, 4).unwrap(),
    })
}

/// Write the users file with the given records keyed by username.
pub fn write_users(root: &Path, users: &[Value]) {
    let map: serde_json::Map<String, Value> = users
        .iter()
        .map(|u| (u["username"].as_str().unwrap().to_string(), u.clone()))
        .collect();
    write_json(&DataPaths::under(root).users_file(), &Value::Object(map));
}

pub fn default_users() -> Vec<Value> {
    vec![
        user(1, "admin", "admin", false),
        user(2, "operator", "user", false),
        user(3, "retired", "user", true),
    ]
}

/// Write cameras, RTSP map and users under `root`.
pub fn write_fixture(root: &Path) {
    let paths = DataPaths::under(root);
    write_json(
        &paths.config_dir.join("camera_info.json"),
        &json!([
            {
                "camera_id": "camera-1",
                "name": "Shaft A",
                "location": "Level 3",
                "lut_path": "missing.npy",
                "resolution": "1080p"
            },
            { "camera_id": "camera-2" },
            { "camera_id": "camera-3", "name": "Conveyor" }
        ]),
    );
    write_json(
        &paths.config_dir.join("rtsp.json"),
        &json!({
            "camera-1": "rtsp://localhost:8554/camera-1",
            "camera-2": "rtsp://localhost:8554/camera-2"
        }),
    );
    write_users(root, &default_users());
}

pub fn test_config(root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        static_dir: None,
        api_only: true,
        cors: CorsConfig::AllowAll,
        secret_key: Some("integration-test-secret".into()),
        token_ttl: DEFAULT_TOKEN_TTL,
        strict_dependencies: false,
        paths: DataPaths::under(root),
        stream: StreamSettings {
            ffmpeg: Some("/nonexistent/ffmpeg".into()),
            ..StreamSettings::default()
        },
    }
}

/// Bootstrapped context over a fresh fixture.
pub async fn test_context() -> (TempDir, AxumContext) {
    let temp = TempDir::new().unwrap();
    write_fixture(temp.path());
    let ctx = bootstrap(test_config(temp.path())).await.unwrap();
    (temp, ctx)
}

/// API router over a fresh fixture.
pub async fn test_app() -> (TempDir, Router) {
    let (temp, ctx) = test_context().await;
    (temp, create_router(ctx, &CorsConfig::AllowAll))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_with_token(app: &Router, uri: &str, token: &str) -> TestResponse {
    let request = Request::get(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::post(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> TestResponse {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_login(app: &Router, username: &str, password: &str) -> TestResponse {
    let request = Request::post("/api/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={username}&password={password}")))
        .unwrap();
    send(app, request).await
}

/// Log in and return the access token.
pub async fn login(app: &Router, username: &str) -> String {
    let response = post_login(app, username, &PASSWORD.replace(' ', "+")).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text());
    response.json()["data"]["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}
