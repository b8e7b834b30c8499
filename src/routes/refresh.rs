// SPDX-License-Identifier: MIT

//! Token refresh endpoint.

use crate::error::{AppError, AppJson, Result};
use crate::services::tokens::ACCESS_LIFETIME;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/refresh", post(refresh))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Serialize)]
struct RefreshResponse {
    token: String,
}

/// `POST /refresh` — mint a new 1-hour access token from a valid refresh
/// token. The refresh token itself is not rotated.
async fn refresh(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let token = payload.refresh_token.ok_or(AppError::RefreshTokenMissing)?;

    let claims = state.tokens.verify_refresh(&token)?;

    let access = state
        .tokens
        .issue_access(claims.id, &claims.email, claims.role, ACCESS_LIFETIME)?;

    Ok(Json(RefreshResponse { token: access }))
}
