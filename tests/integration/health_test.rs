//! Integration tests for the health endpoints.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_livez() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/livez", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_readyz_checks_session_store() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/readyz", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoints_need_no_token() {
    let app = TestApp::new().await;
    for path in ["/livez", "/readyz"] {
        let response = app.request("GET", path, None, Some("garbage")).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn test_readyz_fails_when_rule_source_unreachable() {
    let app = TestApp::new().await;
    app.rules.set_healthy(false);

    let response = app.request("GET", "/readyz", None, None).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["error"], "SERVICE_UNAVAILABLE");

    app.rules.set_healthy(true);
    let response = app.request("GET", "/readyz", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}
