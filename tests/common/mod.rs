// SPDX-License-Identifier: MIT

use mentorlink::config::Config;
use mentorlink::db::Database;
use mentorlink::routes::create_router;
use mentorlink::services::{GoogleClient, TokenService};
use mentorlink::AppState;
use std::sync::Arc;

/// Check if a test database is available via environment variable.
#[allow(dead_code)]
pub fn database_available() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

/// Skip test with message if no test database is configured.
#[macro_export]
macro_rules! require_database {
    () => {
        if !crate::common::database_available() {
            eprintln!("Skipping: TEST_DATABASE_URL not set");
            return;
        }
    };
}

/// Connect to the test database and apply migrations.
#[allow(dead_code)]
pub async fn test_db() -> Database {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL not set");
    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to test database");
    db.run_migrations().await.expect("Failed to run migrations");
    db
}

/// Create a test app over the given database. Returns the router and the
/// shared state (for issuing tokens directly).
#[allow(dead_code)]
pub fn create_test_app_with_db(db: Database) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let tokens = TokenService::new(&config);
    let google = GoogleClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.client_back_url.clone(),
    );

    let state = Arc::new(AppState {
        config,
        db,
        tokens,
        google,
    });

    (create_router(state.clone()), state)
}

/// Create a test app with an offline mock database.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_db(Database::new_mock())
}
