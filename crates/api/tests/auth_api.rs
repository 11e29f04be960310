//! Requests rejected before any database access: health, missing or bad
//! credentials, malformed input. These run without PostgreSQL.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{body_json, build_test_app, expect_json, get, post_json, token_for, unreachable_pool};

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = build_test_app(unreachable_pool());
    let body = expect_json(get(app, "/health", None).await, StatusCode::OK).await;

    assert_eq!(body["status"], "degraded");
    assert_eq!(body["db_healthy"], false);
    assert_eq!(body["snapshot_policy"], "fail_closed");
}

#[tokio::test]
async fn missing_token_is_401() {
    let app = build_test_app(unreachable_pool());
    let body = expect_json(get(app, "/api/v1/articles", None).await, StatusCode::UNAUTHORIZED).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn token_signed_elsewhere_is_401() {
    let app = build_test_app(unreachable_pool());
    let forged = quill_api::auth::jwt::generate_access_token(
        1,
        &quill_api::auth::jwt::JwtConfig {
            secret: "some-other-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    )
    .unwrap();

    let response = get(app, "/api/v1/revisions/1", Some(&forged)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn every_article_route_requires_auth() {
    for uri in [
        "/api/v1/articles/1",
        "/api/v1/articles/1/revisions",
        "/api/v1/revisions/1",
        "/api/v1/revisions/1/diff",
    ] {
        let app = build_test_app(unreachable_pool());
        let response = get(app, uri, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn malformed_grade_body_is_rejected() {
    let app = build_test_app(unreachable_pool());
    let token = token_for(1);
    // `score` present but the article id is not a number.
    let response = post_json(app, "/api/v1/articles/abc/grades", &token, json!({"score": 5})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn request_id_is_propagated() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/health", None).await;
    assert!(response.headers().contains_key("x-request-id"));
    let _ = body_json(response).await;
}
