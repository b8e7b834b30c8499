// SPDX-License-Identifier: MIT

//! Bearer-token authentication middleware.
//!
//! Status-code asymmetry, preserved on every protected route: a missing
//! Authorization header is 401, while a header that is present but carries an
//! expired or otherwise invalid token is 403 with a body saying which.

use crate::error::AppError;
use crate::models::Role;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated identity decoded from a valid access token, attached to the
/// request extensions for handlers downstream.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

/// Middleware that requires a valid access token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    // Header present but not bearer-shaped counts as an invalid token.
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::TokenInvalid)?;

    let claims = state.tokens.verify_access(token)?;

    request.extensions_mut().insert(AuthUser {
        id: claims.id,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(request).await)
}
