// SPDX-License-Identifier: MIT

//! Mentorlink: mentorship platform backend.
//!
//! Authenticates two user roles (mentors, mentees) locally or via Google
//! OAuth, issues access/refresh/OAuth-bridge tokens under independent
//! secrets, and tracks like/dislike engagement on posts and answers.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Database;
use services::{GoogleClient, TokenService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub tokens: TokenService,
    pub google: GoogleClient,
}
