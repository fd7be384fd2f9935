//! Integration tests for the request gate and policy endpoints.

use axum::http::StatusCode;

use warden_core::types::PolicyRule;

use crate::helpers::{ADMIN_ROLE, GUEST_ROLE, MEMBER_ROLE, TestApp, default_rules};

#[tokio::test]
async fn test_missing_or_invalid_token_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/v1/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");

    let response = app.request("GET", "/v1/me", None, Some("not.a.jwt")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthorized() {
    let app = TestApp::new().await;
    let token = app.token_for(42, MEMBER_ROLE);

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/v1/me")
        .header("authorization", format!("Token {token}"))
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_policy_decides_per_role_path_and_method() {
    let app = TestApp::new().await;
    let member = app.token_for(7, MEMBER_ROLE);
    let admin = app.token_for(1, ADMIN_ROLE);
    let guest = app.token_for(9, GUEST_ROLE);

    assert_eq!(
        app.request("GET", "/v1/me", None, Some(&member)).await.status,
        StatusCode::OK
    );
    assert_eq!(
        app.request("GET", "/v1/policy", None, Some(&member)).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.request("GET", "/v1/policy", None, Some(&admin)).await.status,
        StatusCode::OK
    );
    assert_eq!(
        app.request("GET", "/v1/me", None, Some(&guest)).await.status,
        StatusCode::FORBIDDEN
    );

    let forbidden = app.request("GET", "/v1/policy", None, Some(&member)).await;
    assert_eq!(forbidden.body["code"], 100005);
}

#[tokio::test]
async fn test_reload_endpoint_applies_rule_changes() {
    let app = TestApp::new().await;
    let admin = app.token_for(1, ADMIN_ROLE);
    let member = app.token_for(7, MEMBER_ROLE);

    // Take /v1/me away from members.
    let rules: Vec<PolicyRule> = default_rules()
        .into_iter()
        .filter(|r| r.role_id != MEMBER_ROLE)
        .collect();
    app.rules.replace(rules).await;

    // Nothing changes until the model is reloaded.
    assert_eq!(
        app.request("GET", "/v1/me", None, Some(&member)).await.status,
        StatusCode::OK
    );

    let response = app
        .request("POST", "/v1/policy/reload", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body["data"]["outcome"], "queued");

    app.wait_for_generation(2).await;

    assert_eq!(
        app.request("GET", "/v1/me", None, Some(&member)).await.status,
        StatusCode::FORBIDDEN
    );

    let status = app.request("GET", "/v1/policy", None, Some(&admin)).await;
    assert_eq!(status.body["data"]["generation"], 2);
    assert_eq!(status.body["data"]["rules"], 3);
}

#[tokio::test]
async fn test_reload_requires_permission() {
    let app = TestApp::new().await;
    let member = app.token_for(7, MEMBER_ROLE);

    let response = app
        .request("POST", "/v1/policy/reload", None, Some(&member))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.enforcer.generation(), 1);
}
