// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! Secrets are read once at startup and cached in memory. Each token kind
//! signs under its own secret so a leaked refresh token can never be replayed
//! as an access token.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL (OAuth redirect target and CORS origin)
    pub front_url: String,
    /// Where to send the browser when the OAuth provider reports failure
    pub failure_redirect_url: String,
    /// Our callback URL registered with Google
    pub client_back_url: String,
    /// PostgreSQL connection string
    pub database_url: String,

    // --- Secrets ---
    /// Google OAuth client ID (public)
    pub google_client_id: String,
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Signing secret for access tokens (raw bytes)
    pub access_token_secret: Vec<u8>,
    /// Signing secret for refresh tokens
    pub refresh_token_secret: Vec<u8>,
    /// Signing secret for OAuth-bridge tokens
    pub oauth_token_secret: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            front_url: env::var("FRONT_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            failure_redirect_url: env::var("FAILURE_REDIRECT_URL")
                .unwrap_or_else(|_| "http://localhost:3000/login".to_string()),
            client_back_url: env::var("CLIENT_BACK_URL")
                .map_err(|_| ConfigError::Missing("CLIENT_BACK_URL"))?,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,

            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_SECRET"))?,
            access_token_secret: env::var("ACCESS_TOKEN_SECRET")
                .map_err(|_| ConfigError::Missing("ACCESS_TOKEN_SECRET"))?
                .into_bytes(),
            refresh_token_secret: env::var("REFRESH_TOKEN_SECRET")
                .map_err(|_| ConfigError::Missing("REFRESH_TOKEN_SECRET"))?
                .into_bytes(),
            oauth_token_secret: env::var("OAUTH_TOKEN_SECRET")
                .map_err(|_| ConfigError::Missing("OAUTH_TOKEN_SECRET"))?
                .into_bytes(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 5000,
            front_url: "http://localhost:3000".to_string(),
            failure_redirect_url: "http://localhost:3000/login".to_string(),
            client_back_url: "http://localhost:5000/google/callback".to_string(),
            database_url: "postgres://localhost/mentorlink_test".to_string(),
            google_client_id: "test_client_id".to_string(),
            google_client_secret: "test_client_secret".to_string(),
            access_token_secret: b"test_access_secret_32_bytes_min!".to_vec(),
            refresh_token_secret: b"test_refresh_secret_32_bytes_ok!".to_vec(),
            oauth_token_secret: b"test_oauth_secret_32_bytes_long!".to_vec(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
