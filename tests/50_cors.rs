mod common;

use axum::body::Body;
use axum::http::Request;
use common::test_app;
use tower::ServiceExt;

async fn preflight(origin: &str) -> axum::http::HeaderMap {
    let app = test_app();
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/admin/users")
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .expect("request build");

    let response = app.router.oneshot(request).await.expect("router oneshot");
    response.headers().clone()
}

#[tokio::test]
async fn allow_listed_origin_passes_preflight() {
    let headers = preflight("http://localhost:4200").await;
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:4200")
    );

    let methods = headers
        .get("access-control-allow-methods")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(methods.contains("POST"), "got {}", methods);
    assert!(methods.contains("DELETE"), "got {}", methods);
}

#[tokio::test]
async fn second_configured_origin_is_also_allowed() {
    let headers = preflight("https://app.cmrp.example").await;
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://app.cmrp.example")
    );
}

#[tokio::test]
async fn unknown_origin_gets_no_cors_grant() {
    let headers = preflight("https://evil.example").await;
    assert!(headers.get("access-control-allow-origin").is_none());
}
