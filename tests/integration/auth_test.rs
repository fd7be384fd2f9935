//! Integration tests for the token endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{MEMBER_EMAIL, MEMBER_PASSWORD, MEMBER_ROLE, MEMBER_USER_ID, TestApp};

#[tokio::test]
async fn test_login_with_correct_password_issues_session() {
    let app = TestApp::with_dev_login(false).await;

    let response = app
        .request(
            "POST",
            "/v1/auth/login",
            Some(json!({ "email": MEMBER_EMAIL, "password": MEMBER_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);

    let access = response.body["data"]["access_token"].as_str().unwrap().to_string();
    let refresh = response.body["data"]["refresh_token"].as_str().unwrap().to_string();

    let me = app.request("GET", "/v1/me", None, Some(&access)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["user_id"], MEMBER_USER_ID);
    assert_eq!(me.body["data"]["role_id"], MEMBER_ROLE);

    let rotated = app
        .request(
            "POST",
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = TestApp::new().await;

    let wrong_password = app
        .request(
            "POST",
            "/v1/auth/login",
            Some(json!({ "email": MEMBER_EMAIL, "password": "hunter2" })),
            None,
        )
        .await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body["code"], 100004);

    let unknown_user = app
        .request(
            "POST",
            "/v1/auth/login",
            Some(json!({ "email": "nobody@example.com", "password": MEMBER_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.body["message"], wrong_password.body["message"]);
}

#[tokio::test]
async fn test_login_rejects_invalid_body() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/v1/auth/login",
            Some(json!({ "email": "not-an-email", "password": "x" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/v1/auth/login",
            Some(json!({ "email": MEMBER_EMAIL, "password": "" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dev_login_issues_usable_tokens() {
    let app = TestApp::new().await;
    let (access, _refresh) = app.dev_login(42, MEMBER_ROLE).await;

    let response = app.request("GET", "/v1/me", None, Some(&access)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_id"], 42);
    assert_eq!(response.body["data"]["role_id"], MEMBER_ROLE);
}

#[tokio::test]
async fn test_dev_login_absent_when_disabled() {
    let app = TestApp::with_dev_login(false).await;
    let response = app
        .request(
            "POST",
            "/v1/auth/login-dev",
            Some(json!({ "user_id": 42, "role_id": 2 })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dev_login_rejects_invalid_body() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/v1/auth/login-dev",
            Some(json!({ "user_id": 0, "role_id": 2 })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 100002);

    let response = app
        .request(
            "POST",
            "/v1/auth/login-dev",
            Some(json!({ "user_id": "alice" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "PARAM_INVALID");
}

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    let app = TestApp::new().await;
    let (_, refresh) = app.dev_login(42, MEMBER_ROLE).await;

    let response = app
        .request(
            "POST",
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let new_refresh = response.body["data"]["refresh_token"].as_str().unwrap().to_string();
    let new_access = response.body["data"]["access_token"].as_str().unwrap().to_string();
    assert_ne!(new_refresh, refresh);

    let me = app.request("GET", "/v1/me", None, Some(&new_access)).await;
    assert_eq!(me.status, StatusCode::OK);

    // The consumed token is dead.
    let replay = app
        .request(
            "POST",
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.body["code"], 100004);

    // The replacement still works.
    let next = app
        .request(
            "POST",
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": new_refresh })),
            None,
        )
        .await;
    assert_eq!(next.status, StatusCode::OK);
}

#[tokio::test]
async fn test_second_login_supersedes_first_session() {
    let app = TestApp::new().await;
    let (_, first) = app.dev_login(42, MEMBER_ROLE).await;
    let (_, second) = app.dev_login(42, MEMBER_ROLE).await;

    let response = app
        .request(
            "POST",
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": first })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "POST",
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": second })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let app = TestApp::new().await;
    let (_, refresh) = app.dev_login(42, MEMBER_ROLE).await;

    let response = app
        .request(
            "POST",
            "/v1/auth/logout",
            Some(json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    // Logging out twice is harmless.
    let response = app
        .request(
            "POST",
            "/v1/auth/logout",
            Some(json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request(
            "POST",
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_requires_token_field() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": "" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": "never-issued" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
