// SPDX-License-Identifier: MIT

//! API authentication tests.
//!
//! These drive the full router and verify the status-code contract:
//! 1. Missing Authorization header is 401.
//! 2. A present but expired or invalid token is 403, with bodies that
//!    distinguish the two cases.
//! 3. A valid access token passes the middleware.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use mentorlink::config::Config;
use mentorlink::models::Role;
use mentorlink::services::tokens::{ACCESS_LIFETIME, RESTRICTED_ACCESS_LIFETIME};
use mentorlink::services::SessionClaims;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

mod common;

async fn body_message(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    json["message"].as_str().unwrap_or_default().to_string()
}

fn get_posts_request(auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/post");
    if let Some(value) = auth {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_missing_header_is_401() {
    let (app, _) = common::create_test_app();

    let response = app.oneshot(get_posts_request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Unauthorized");
}

#[tokio::test]
async fn test_garbage_token_is_403_invalid() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(get_posts_request(Some("Bearer not.a.token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_message(response).await, "Invalid token");
}

#[tokio::test]
async fn test_expired_token_is_403_expired() {
    let (app, _) = common::create_test_app();

    // Sign with the right secret but an exp well in the past.
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;
    let claims = SessionClaims {
        id: 1,
        email: "a@b.test".to_string(),
        role: Role::Mentor,
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&Config::test_default().access_token_secret),
    )
    .unwrap();

    let response = app
        .oneshot(get_posts_request(Some(&format!("Bearer {token}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_message(response).await, "Token expired");
}

#[tokio::test]
async fn test_wrong_kind_token_is_403_invalid() {
    // A refresh token presented as an access token must not verify.
    let (app, state) = common::create_test_app();
    let refresh = state
        .tokens
        .issue_refresh(1, "a@b.test", Role::Mentee)
        .unwrap();

    let response = app
        .oneshot(get_posts_request(Some(&format!("Bearer {refresh}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_message(response).await, "Invalid token");
}

#[tokio::test]
async fn test_valid_token_passes_middleware() {
    // The mock database fails every query, so reaching 500 "Server error"
    // proves the middleware accepted the token.
    let (app, state) = common::create_test_app();
    let token = state
        .tokens
        .issue_access(1, "a@b.test", Role::Mentor, ACCESS_LIFETIME)
        .unwrap();

    let response = app
        .oneshot(get_posts_request(Some(&format!("Bearer {token}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_message(response).await, "Server error");
}

#[tokio::test]
async fn test_restricted_token_also_passes_middleware() {
    let (app, state) = common::create_test_app();
    let token = state
        .tokens
        .issue_access(1, "a@b.test", Role::Mentee, RESTRICTED_ACCESS_LIFETIME)
        .unwrap();

    let response = app
        .oneshot(get_posts_request(Some(&format!("Bearer {token}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_body_missing_required_field_is_400() {
    // A JSON body that deserializes short of a required field is a client
    // error, not an unprocessable entity.
    let (app, state) = common::create_test_app();
    let token = state
        .tokens
        .issue_access(1, "a@b.test", Role::Mentor, ACCESS_LIFETIME)
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/answers")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"post_id": 1}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_body_missing_password_is_400() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login/mentor")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email": "a@b.test"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_oauth_start_rejects_unknown_role() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/auth/google/admin")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oauth_start_redirects_for_valid_role() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/auth/google/mentor")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.contains("accounts.google.com"));
    assert!(location.contains("state=mentor"));
}
