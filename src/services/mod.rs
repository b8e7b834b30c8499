// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod engagement;
pub mod google;
pub mod password;
pub mod tokens;

pub use engagement::EngagementSets;
pub use google::GoogleClient;
pub use tokens::{BridgeClaims, SessionClaims, TokenError, TokenService};
