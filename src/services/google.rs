// SPDX-License-Identifier: MIT

//! Google OAuth client for the login redirect and callback exchange.

use crate::models::Role;
use anyhow::Context;
use serde::Deserialize;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google OAuth2 / OpenID Connect client.
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    /// Callback URL registered with Google (CLIENT_BACK_URL)
    redirect_uri: String,
}

/// Token endpoint response. Only the access token is used; identity details
/// come from the userinfo endpoint.
#[derive(Debug, Deserialize)]
pub struct GoogleTokens {
    pub access_token: String,
}

/// Provider-side identity from the userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    /// Stable provider subject id
    pub sub: String,
    pub email: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

impl GoogleClient {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    /// Authorization URL for the provider redirect. The role rides in the
    /// `state` parameter and comes back on the callback.
    pub fn authorize_url(&self, role: Role) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            AUTHORIZE_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode("openid email profile"),
            role.as_str(),
        )
    }

    /// Exchange an authorization code for provider tokens.
    pub async fn exchange_code(&self, code: &str) -> anyhow::Result<GoogleTokens> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .context("token exchange request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("token exchange failed: {status}: {body}");
        }

        response
            .json::<GoogleTokens>()
            .await
            .context("token exchange response was not valid JSON")
    }

    /// Fetch the provider-side identity for an access token.
    pub async fn fetch_profile(&self, access_token: &str) -> anyhow::Result<GoogleProfile> {
        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .context("userinfo request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("userinfo request failed: {}", response.status());
        }

        response
            .json::<GoogleProfile>()
            .await
            .context("userinfo response was not valid JSON")
    }
}
