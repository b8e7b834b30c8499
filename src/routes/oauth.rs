// SPDX-License-Identifier: MIT

//! Google OAuth provider redirect and callback.
//!
//! The callback is where auto-provisioning happens: the first OAuth login for
//! an email unknown to both role tables inserts a row whose password column
//! holds `hash(provider subject id)`. Every later bridge login re-verifies
//! that binding. The `/login/google/*` endpoints never provision.

use crate::error::{AppError, Result};
use crate::models::{Role, User};
use crate::services::google::GoogleProfile;
use crate::services::password;
use crate::services::tokens::BRIDGE_LIFETIME;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/google/{role}", get(oauth_start))
        .route("/google/callback", get(oauth_callback))
}

/// `GET /auth/google/{mentor|mentee}` — redirect to Google's authorization
/// endpoint. The chosen role rides in the `state` parameter; an unknown role
/// in the path is rejected with 400 before any redirect.
async fn oauth_start(
    State(state): State<Arc<AppState>>,
    Path(role): Path<Role>,
) -> Redirect {
    tracing::info!(%role, "Starting OAuth flow, redirecting to Google");
    Redirect::temporary(&state.google.authorize_url(role))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// `GET /google/callback` — exchange the authorization code, provision the
/// user if needed, and bounce the browser back to the frontend with a
/// short-lived bridge token in the query string.
async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    let failure = || Redirect::temporary(&state.config.failure_redirect_url).into_response();

    if let Some(error) = &params.error {
        tracing::warn!(%error, "OAuth error from Google");
        return Ok(failure());
    }

    let (Some(code), Some(role_state)) = (&params.code, &params.state) else {
        tracing::warn!("OAuth callback missing code or state");
        return Ok(failure());
    };

    let Ok(user_type) = role_state.parse::<Role>() else {
        tracing::warn!(state = %role_state, "OAuth callback with unknown role state");
        return Ok(failure());
    };

    // Exchange the code and fetch the provider-side identity.
    let profile = match fetch_identity(&state, code).await {
        Ok(profile) => profile,
        Err(err) => {
            tracing::warn!(error = %err, "OAuth code exchange failed");
            return Ok(failure());
        }
    };

    let (role, _user) = resolve_provider_identity(&state, &profile, user_type).await?;

    let bridge = state
        .tokens
        .issue_bridge(&profile.sub, &profile.email, BRIDGE_LIFETIME)?;

    let redirect_url = format!(
        "{}/google/callback?accessToken={}&role={}",
        state.config.front_url,
        urlencoding::encode(&bridge),
        role
    );

    Ok(Redirect::temporary(&redirect_url).into_response())
}

async fn fetch_identity(state: &AppState, code: &str) -> anyhow::Result<GoogleProfile> {
    let tokens = state.google.exchange_code(code).await?;
    state.google.fetch_profile(&tokens.access_token).await
}

/// Resolve a provider-verified identity to a local account, provisioning one
/// under `chosen_role` on first login.
///
/// An existing row in either table wins over the role chosen before the
/// redirect, and must itself have been provisioned through OAuth: a locally
/// registered account has a real password hash, so the provider subject id
/// will not verify against it.
pub async fn resolve_provider_identity(
    state: &AppState,
    profile: &GoogleProfile,
    chosen_role: Role,
) -> Result<(Role, User)> {
    match state.db.find_user_any_role(&profile.email).await? {
        Some((role, user)) => {
            if !password::verify_password(&profile.sub, &user.password)? {
                return Err(AppError::BadRequest(
                    "You already registered with a password".to_string(),
                ));
            }
            Ok((role, user))
        }
        None => {
            let binding_hash = password::hash_password(&profile.sub)?;
            let user = state
                .db
                .insert_oauth_user(
                    chosen_role,
                    &profile.email,
                    &binding_hash,
                    profile.given_name.as_deref(),
                    profile.family_name.as_deref(),
                    profile.picture.as_deref(),
                )
                .await?;

            tracing::info!(user_id = user.id, role = %chosen_role, "OAuth user provisioned");
            Ok((chosen_role, user))
        }
    }
}
