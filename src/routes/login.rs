// SPDX-License-Identifier: MIT

//! Login routes: local credentials and the OAuth-bridge path.
//!
//! Both paths share the profile-completeness branch: a user whose required
//! profile fields are still NULL authenticates successfully but gets HTTP 206
//! with a 20-minute restricted access token instead of a full session.

use crate::error::{AppError, AppJson, Result};
use crate::models::{Role, User};
use crate::services::password;
use crate::services::tokens::{BRIDGE_RETRY_LIFETIME, RESTRICTED_ACCESS_LIFETIME};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login/{role}", post(local_login))
        .route("/login/google/{role}", get(google_login))
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    email: String,
    #[validate(length(min = 1))]
    password: String,
}

/// Full session: access + refresh pair.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    access_token: String,
    refresh_token: String,
    message: String,
}

/// Partial success (206) for an incomplete profile. The raw user record is
/// returned so the client can prefill the completion form; `refresh_token`
/// carries a fresh bridge token on the OAuth path only.
#[derive(Serialize)]
struct IncompleteProfileResponse<'a> {
    message: String,
    #[serde(rename = "User")]
    user: &'a User,
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

/// Issue the response for an authenticated user, branching on completeness.
fn session_or_partial(
    state: &AppState,
    user: &User,
    role: Role,
    retry_bridge: Option<String>,
) -> Result<Response> {
    if !user.is_profile_complete(role) {
        let access_token =
            state
                .tokens
                .issue_access(user.id, &user.email, role, RESTRICTED_ACCESS_LIFETIME)?;

        tracing::info!(user_id = user.id, %role, "Login with incomplete profile");

        return Ok((
            StatusCode::PARTIAL_CONTENT,
            Json(IncompleteProfileResponse {
                message: "User profile incomplete".to_string(),
                user,
                access_token,
                refresh_token: retry_bridge,
            }),
        )
            .into_response());
    }

    let (access_token, refresh_token) = state.tokens.issue_session(user.id, &user.email, role)?;

    tracing::info!(user_id = user.id, %role, "Login successful");

    Ok(Json(SessionResponse {
        access_token,
        refresh_token,
        message: "Login successful".to_string(),
    })
    .into_response())
}

/// `POST /login/{mentor|mentee}` — local email + password login.
async fn local_login(
    State(state): State<Arc<AppState>>,
    Path(role): Path<Role>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Response> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = state
        .db
        .find_user_by_email(role, &payload.email)
        .await?
        .ok_or_else(|| AppError::BadRequest("Email, password or role is incorrect".to_string()))?;

    if !password::verify_password(&payload.password, &user.password)? {
        return Err(AppError::BadRequest("Invalid password".to_string()));
    }

    session_or_partial(&state, &user, role, None)
}

/// `GET /login/google/{mentor|mentee}` — complete a login that started at the
/// OAuth provider. The bearer token here is the short-lived bridge token from
/// the callback, not an access token, so this route does its own verification
/// instead of sitting behind the auth middleware.
async fn google_login(
    State(state): State<Arc<AppState>>,
    Path(role): Path<Role>,
    headers: HeaderMap,
) -> Result<Response> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::TokenInvalid)?;

    let bridge = state.tokens.verify_bridge(token)?;

    // Registration must already have happened in the provider callback; this
    // path never provisions.
    let user = state
        .db
        .find_user_by_email(role, &bridge.email)
        .await?
        .ok_or_else(|| AppError::BadRequest("User not found".to_string()))?;

    // The stored hash was created from the provider subject id at
    // provisioning time; verifying it binds this bridge token to that row.
    if !password::verify_password(&bridge.id, &user.password)? {
        return Err(AppError::BadRequest("Invalid password".to_string()));
    }

    // On the 206 branch, hand back a fresh bridge token so the client can
    // retry this endpoint after completing the profile.
    let retry_bridge = if user.is_profile_complete(role) {
        None
    } else {
        Some(
            state
                .tokens
                .issue_bridge(&bridge.id, &bridge.email, BRIDGE_RETRY_LIFETIME)?,
        )
    };

    session_or_partial(&state, &user, role, retry_bridge)
}
