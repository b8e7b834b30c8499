// SPDX-License-Identifier: MIT

//! Local registration routes.

use crate::error::{AppError, AppJson, Result};
use crate::models::Role;
use crate::services::password;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/register/{role}", post(register))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    first_name: String,
    #[validate(length(min = 1))]
    last_name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 6))]
    password: String,
}

#[derive(Serialize)]
struct RegisterResponse {
    message: String,
}

/// `POST /register/{mentor|mentee}` — create a local account. The email must
/// be unused across both role tables, so the same address can never hold a
/// mentor and a mentee account at once.
async fn register(
    State(state): State<Arc<AppState>>,
    Path(role): Path<Role>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if state.db.email_taken(&payload.email).await? {
        return Err(AppError::BadRequest("Email already exists".to_string()));
    }

    let password_hash = password::hash_password(&payload.password)?;

    let user = state
        .db
        .insert_local_user(
            role,
            &payload.first_name,
            &payload.last_name,
            &payload.email,
            &password_hash,
        )
        .await?;

    tracing::info!(user_id = user.id, %role, "User registered");

    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
    }))
}
