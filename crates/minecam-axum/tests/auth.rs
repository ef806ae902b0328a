//! Login, bearer token and role extractor tests.

mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use minecam_axum::{ActiveUser, AdminUser, bootstrap};

use common::{get_with_token, login, post, post_login, test_app, test_config, write_users};

#[tokio::test]
async fn login_returns_bearer_token_and_user() {
    let (_temp, app) = test_app().await;
    let response = post_login(&app, "admin", "correct+horse").await;
    assert_eq!(response.status, StatusCode::OK);

    let data = response.json()["data"].clone();
    assert_eq!(data["token_type"], "bearer");
    assert!(!data["access_token"].as_str().unwrap().is_empty());
    assert_eq!(data["user"]["username"], "admin");
    assert_eq!(data["user"]["role"], "admin");
    assert_eq!(data["user"]["is_active"], true);
    assert!(data["user"].get("hashed_password").is_none());
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let (_temp, app) = test_app().await;

    let wrong = post_login(&app, "admin", "hunter2").await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.json()["detail"], "Incorrect username or password");

    let unknown = post_login(&app, "ghost", "correct+horse").await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.json(), wrong.json());
}

#[tokio::test]
async fn incomplete_login_form_gets_a_json_detail() {
    let (_temp, app) = test_app().await;
    let response = common::send(
        &app,
        Request::post("/api/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=admin"))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json();
    assert_eq!(body["status"], 422);
    assert!(body["detail"].as_str().unwrap().contains("password"));
    assert!(response.headers.get(header::WWW_AUTHENTICATE).is_none());
}

#[tokio::test]
async fn disabled_user_can_log_in_but_is_inactive() {
    let (_temp, app) = test_app().await;
    let response = post_login(&app, "retired", "correct+horse").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["data"]["user"]["is_active"], false);
}

#[tokio::test]
async fn me_requires_a_token() {
    let (_temp, app) = test_app().await;
    let response = common::get(&app, "/api/user/me").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers[header::WWW_AUTHENTICATE], "Bearer");
    assert_eq!(response.json()["detail"], "Not authenticated");
}

#[tokio::test]
async fn me_rejects_garbage_tokens() {
    let (_temp, app) = test_app().await;
    let response = get_with_token(&app, "/api/user/me", "not.a.jwt").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["detail"], "Could not validate credentials");
}

#[tokio::test]
async fn me_returns_the_token_owner() {
    let (_temp, app) = test_app().await;
    let token = login(&app, "operator").await;

    let response = get_with_token(&app, "/api/user/me", &token).await;
    assert_eq!(response.status, StatusCode::OK);
    let data = response.json()["data"].clone();
    assert_eq!(data["username"], "operator");
    assert_eq!(data["email"], "operator@mine.local");
    assert_eq!(data["role"], "user");
}

#[tokio::test]
async fn token_of_removed_user_is_404() {
    let (temp, app) = test_app().await;
    let token = login(&app, "operator").await;

    // users.json is re-read on every request
    let remaining: Vec<_> = common::default_users()
        .into_iter()
        .filter(|u| u["username"] != "operator")
        .collect();
    write_users(temp.path(), &remaining);

    let response = get_with_token(&app, "/api/user/me", &token).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["detail"], "User not found");
}

#[tokio::test]
async fn logout_needs_no_session() {
    let (_temp, app) = test_app().await;
    let response = post(&app, "/api/logout").await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert!(body["data"].is_null());
}

/// API router plus a router guarded by the role extractors, both over the
/// same fixture.
async fn guarded_app() -> (tempfile::TempDir, Router, Router) {
    let (temp, api) = test_app().await;
    let ctx = bootstrap(test_config(temp.path())).await.unwrap();
    let guarded = Router::new()
        .route(
            "/active",
            get(|ActiveUser(user): ActiveUser| async move { user.username }),
        )
        .route(
            "/admin",
            get(|AdminUser(user): AdminUser| async move { user.username }),
        )
        .with_state(Arc::new(ctx));
    (temp, guarded, api)
}

#[tokio::test]
async fn role_extractors() {
    let (_temp, guarded, api) = guarded_app().await;
    let admin = login(&api, "admin").await;
    let operator = login(&api, "operator").await;
    let retired = login(&api, "retired").await;

    let ok = get_with_token(&guarded, "/admin", &admin).await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.text(), "admin");

    let forbidden = get_with_token(&guarded, "/admin", &operator).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.json()["detail"], "Admin privileges required");

    assert_eq!(
        get_with_token(&guarded, "/active", &operator).await.status,
        StatusCode::OK
    );
    let inactive = get_with_token(&guarded, "/active", &retired).await;
    assert_eq!(inactive.status, StatusCode::BAD_REQUEST);
    assert_eq!(inactive.json()["detail"], "Inactive user");

    assert_eq!(
        common::get(&guarded, "/admin").await.status,
        StatusCode::UNAUTHORIZED
    );
}
