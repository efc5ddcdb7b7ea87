mod common;

use axum::body::Body;
use http::{Method, Request, StatusCode};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_endpoint() {
    let server = common::TestServer::new().await;
    let response = server
        .router()
        .oneshot(common::get_request("/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_not_found_route() {
    let server = common::TestServer::new().await;
    let response = server
        .router()
        .oneshot(common::get_request("/nonexistent"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let server = common::TestServer::new().await;
    let response = server
        .router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_version_endpoint() {
    let server = common::TestServer::new().await;
    let response = server
        .router()
        .oneshot(common::get_request("/api/v1/version"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::parse_body(response).await;
    assert_eq!(body["data"]["name"], "greenpass");
    assert!(body["data"]["version"].is_string());
    assert!(body["data"]["build"].is_string());
}

#[tokio::test]
async fn test_api_responses_carry_rate_limit_headers() {
    let server = common::TestServer::new().await;
    let response = server
        .router()
        .oneshot(common::get_request("/api/v1/version"))
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-ratelimit-limit"));
    assert!(response.headers().contains_key("x-ratelimit-remaining"));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_recovers_after_exhaustion() {
    let server = common::TestServer::new().await;

    for i in 0..40 {
        let response = server
            .router()
            .oneshot(common::get_request("/api/v1/version"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "request {i}");
    }

    let response = server
        .router()
        .oneshot(common::get_request("/api/v1/version"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // One second is below the refill granularity (one token per 1.5s), so
    // the bucket is still empty — but the elapsed window must keep accruing
    // across such retries instead of resetting.
    tokio::time::advance(std::time::Duration::from_secs(1)).await;
    let response = server
        .router()
        .oneshot(common::get_request("/api/v1/version"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    tokio::time::advance(std::time::Duration::from_secs(1)).await;
    let response = server
        .router()
        .oneshot(common::get_request("/api/v1/version"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_routes_require_auth() {
    let server = common::TestServer::new().await;
    for uri in ["/api/v1/members", "/api/v1/pending", "/api/v1/events"] {
        let response = server
            .router()
            .oneshot(common::get_request(uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_garbage_bearer_token_rejected() {
    let server = common::TestServer::new().await;
    let response = server
        .router()
        .oneshot(common::authenticated_request(
            Method::GET,
            "/api/v1/members",
            "Bearer not-a-real-token",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_bootstrap_then_closed() {
    let server = common::TestServer::new().await;

    let response = server
        .router()
        .oneshot(common::json_request(
            Method::POST,
            "/api/v1/auth/register",
            &serde_json::json!({"username": "admin", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::parse_body(response).await;
    assert!(body["data"]["token"].is_string());

    // Second registration is refused once an admin exists.
    let response = server
        .router()
        .oneshot(common::json_request(
            Method::POST,
            "/api/v1/auth/register",
            &serde_json::json!({"username": "intruder", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_and_logout() {
    let server = common::TestServer::new().await;

    let response = server
        .router()
        .oneshot(common::json_request(
            Method::POST,
            "/api/v1/auth/register",
            &serde_json::json!({"username": "admin", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = server
        .router()
        .oneshot(common::json_request(
            Method::POST,
            "/api/v1/auth/login",
            &serde_json::json!({"username": "admin", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::parse_body(response).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let auth = format!("Bearer {token}");

    // Token works.
    let response = server
        .router()
        .oneshot(common::authenticated_request(
            Method::GET,
            "/api/v1/members",
            &auth,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Logout revokes it.
    let response = server
        .router()
        .oneshot(common::authenticated_request(
            Method::POST,
            "/api/v1/auth/logout",
            &auth,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = server
        .router()
        .oneshot(common::authenticated_request(
            Method::GET,
            "/api/v1/members",
            &auth,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_seed_endpoint_provisions_harness_fixtures() {
    let server = common::TestServer::new().await;
    let response = server
        .router()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/test/seed")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::parse_body(response).await;

    let token = body["data"]["admin"]["token"].as_str().unwrap();
    assert!(body["data"]["member"]["id"].as_str().unwrap().starts_with("GES"));
    assert!(body["data"]["pending"]["id"].is_string());

    // The returned token authenticates admin requests.
    let response = server
        .router()
        .oneshot(common::authenticated_request(
            Method::GET,
            "/api/v1/pending",
            &format!("Bearer {token}"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_seed_endpoint_hidden_outside_test_mode() {
    let server = common::TestServer::with_test_mode(false).await;
    let response = server
        .router()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/test/seed")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let server = common::TestServer::new().await;

    server
        .router()
        .oneshot(common::json_request(
            Method::POST,
            "/api/v1/auth/register",
            &serde_json::json!({"username": "admin", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();

    let response = server
        .router()
        .oneshot(common::json_request(
            Method::POST,
            "/api/v1/auth/login",
            &serde_json::json!({"username": "admin", "password": "wrong-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
