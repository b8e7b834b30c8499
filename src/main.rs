// SPDX-License-Identifier: MIT

//! Mentorlink API server.

use mentorlink::{
    config::Config,
    db::Database,
    services::{GoogleClient, TokenService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Mentorlink API");

    // Initialize PostgreSQL pool and apply migrations
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to PostgreSQL");
    db.run_migrations().await.expect("Failed to run migrations");

    let tokens = TokenService::new(&config);
    let google = GoogleClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.client_back_url.clone(),
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db: db.clone(),
        tokens,
        google,
    });

    // Build router
    let app = mentorlink::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain the pool before exiting
    db.close().await;
    tracing::info!("Connection pool closed, exiting");

    Ok(())
}

/// Resolve on SIGTERM or SIGINT to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install SIGINT handler");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining");
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mentorlink=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
