// SPDX-License-Identifier: MIT

//! Token issuance and verification.
//!
//! Three token kinds, each signed under its own secret:
//!
//! - **Access** — authorizes protected endpoints. 1 hour for a full session,
//!   20 minutes when issued to a user with an incomplete profile.
//! - **Refresh** — 7 days, used solely to mint new access tokens.
//! - **OAuth-bridge** — minutes-lived, carries the provider-verified identity
//!   (`id` is the provider subject, a string) from the OAuth callback to the
//!   `/login/google/*` endpoints.
//!
//! Cross-kind verification must always fail; there is no revocation list, so
//! expiry is the only invalidation mechanism.

use crate::config::Config;
use crate::error::AppError;
use crate::models::Role;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Full-session access token lifetime.
pub const ACCESS_LIFETIME: Duration = Duration::from_secs(60 * 60);
/// Access token lifetime for users with an incomplete profile.
pub const RESTRICTED_ACCESS_LIFETIME: Duration = Duration::from_secs(20 * 60);
/// Refresh token lifetime.
pub const REFRESH_LIFETIME: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// Bridge token lifetime when first issued by the provider callback.
pub const BRIDGE_LIFETIME: Duration = Duration::from_secs(5 * 60);
/// Bridge token lifetime when re-issued alongside a 206 response.
pub const BRIDGE_RETRY_LIFETIME: Duration = Duration::from_secs(20 * 60);

/// Claims carried by access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Database user id in the role's table
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

/// Claims carried by OAuth-bridge tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeClaims {
    /// OAuth provider subject id (not a database id)
    pub id: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// Verification failure, distinguished because callers return different
/// response bodies for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::TokenExpired,
            TokenError::Invalid => AppError::TokenInvalid,
        }
    }
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Issues and verifies the three token kinds.
pub struct TokenService {
    access: KeyPair,
    refresh: KeyPair,
    bridge: KeyPair,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        Self {
            access: KeyPair::from_secret(&config.access_token_secret),
            refresh: KeyPair::from_secret(&config.refresh_token_secret),
            bridge: KeyPair::from_secret(&config.oauth_token_secret),
        }
    }

    /// Issue an access token. `lifetime` is [`ACCESS_LIFETIME`] for a full
    /// session or [`RESTRICTED_ACCESS_LIFETIME`] for an incomplete profile.
    pub fn issue_access(
        &self,
        id: i64,
        email: &str,
        role: Role,
        lifetime: Duration,
    ) -> anyhow::Result<String> {
        let (iat, exp) = timestamps(lifetime)?;
        sign(
            &self.access,
            &SessionClaims {
                id,
                email: email.to_string(),
                role,
                iat,
                exp,
            },
        )
    }

    /// Issue a refresh token (7 days).
    pub fn issue_refresh(&self, id: i64, email: &str, role: Role) -> anyhow::Result<String> {
        let (iat, exp) = timestamps(REFRESH_LIFETIME)?;
        sign(
            &self.refresh,
            &SessionClaims {
                id,
                email: email.to_string(),
                role,
                iat,
                exp,
            },
        )
    }

    /// Issue an access + refresh pair for a fully authenticated session.
    pub fn issue_session(
        &self,
        id: i64,
        email: &str,
        role: Role,
    ) -> anyhow::Result<(String, String)> {
        let access = self.issue_access(id, email, role, ACCESS_LIFETIME)?;
        let refresh = self.issue_refresh(id, email, role)?;
        Ok((access, refresh))
    }

    /// Issue an OAuth-bridge token for a provider-verified identity.
    pub fn issue_bridge(
        &self,
        subject: &str,
        email: &str,
        lifetime: Duration,
    ) -> anyhow::Result<String> {
        let (iat, exp) = timestamps(lifetime)?;
        sign(
            &self.bridge,
            &BridgeClaims {
                id: subject.to_string(),
                email: email.to_string(),
                iat,
                exp,
            },
        )
    }

    pub fn verify_access(&self, token: &str) -> Result<SessionClaims, TokenError> {
        check(&self.access, token)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<SessionClaims, TokenError> {
        check(&self.refresh, token)
    }

    pub fn verify_bridge(&self, token: &str) -> Result<BridgeClaims, TokenError> {
        check(&self.bridge, token)
    }
}

fn timestamps(lifetime: Duration) -> anyhow::Result<(usize, usize)> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;
    Ok((now, now + lifetime.as_secs() as usize))
}

fn sign<T: Serialize>(keys: &KeyPair, claims: &T) -> anyhow::Result<String> {
    Ok(encode(
        &Header::new(Algorithm::HS256),
        claims,
        &keys.encoding,
    )?)
}

fn check<T: DeserializeOwned>(keys: &KeyPair, token: &str) -> Result<T, TokenError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<T>(token, &keys.decoding, &validation)
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&Config::test_default())
    }

    #[test]
    fn test_access_roundtrip() {
        let svc = service();
        let token = svc
            .issue_access(7, "mentor@example.test", Role::Mentor, ACCESS_LIFETIME)
            .unwrap();

        let claims = svc.verify_access(&token).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "mentor@example.test");
        assert_eq!(claims.role, Role::Mentor);
        assert_eq!(claims.exp - claims.iat, ACCESS_LIFETIME.as_secs() as usize);
    }

    #[test]
    fn test_restricted_access_has_short_lifetime() {
        let svc = service();
        let token = svc
            .issue_access(
                7,
                "mentee@example.test",
                Role::Mentee,
                RESTRICTED_ACCESS_LIFETIME,
            )
            .unwrap();

        let claims = svc.verify_access(&token).unwrap();
        assert_eq!(
            claims.exp - claims.iat,
            RESTRICTED_ACCESS_LIFETIME.as_secs() as usize
        );
    }

    #[test]
    fn test_kinds_are_not_mutually_verifiable() {
        let svc = service();
        let access = svc
            .issue_access(1, "a@b.test", Role::Mentor, ACCESS_LIFETIME)
            .unwrap();
        let refresh = svc.issue_refresh(1, "a@b.test", Role::Mentor).unwrap();
        let bridge = svc
            .issue_bridge("108234", "a@b.test", BRIDGE_LIFETIME)
            .unwrap();

        assert_eq!(svc.verify_refresh(&access), Err(TokenError::Invalid));
        assert_eq!(svc.verify_access(&refresh), Err(TokenError::Invalid));
        assert!(svc.verify_bridge(&access).is_err());
        assert!(svc.verify_access(&bridge).is_err());
    }

    #[test]
    fn test_expired_is_distinguished_from_invalid() {
        let svc = service();

        // Sign claims that expired well past the default clock leeway.
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;
        let expired = sign(
            &svc.access,
            &SessionClaims {
                id: 1,
                email: "a@b.test".to_string(),
                role: Role::Mentee,
                iat: now - 7200,
                exp: now - 3600,
            },
        )
        .unwrap();

        assert_eq!(svc.verify_access(&expired), Err(TokenError::Expired));
        assert_eq!(
            svc.verify_access("not.a.token"),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_bridge_roundtrip_keeps_provider_subject() {
        let svc = service();
        let token = svc
            .issue_bridge("114518347620", "oauth@example.test", BRIDGE_LIFETIME)
            .unwrap();

        let claims = svc.verify_bridge(&token).unwrap();
        assert_eq!(claims.id, "114518347620");
        assert_eq!(claims.email, "oauth@example.test");
        assert_eq!(claims.exp - claims.iat, BRIDGE_LIFETIME.as_secs() as usize);
    }
}
