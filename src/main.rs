// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity Map API Server
//!
//! Hosts one logging session for a browser front end: the front end reports
//! map clicks, form input and geolocation, and applies the view commands it
//! gets back.

use activity_map::{
    config::Config,
    services::{CommandQueue, FixedPosition, SessionConfig, SessionController},
    storage::FileStore,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Activity Map API");

    // Open storage and start the session (replays stored activities into the list)
    let store = Arc::new(FileStore::new(&config.data_dir));
    tracing::info!(path = %config.data_dir.display(), "Using file storage");
    let mut session = SessionController::start(
        store,
        CommandQueue::new(),
        SessionConfig::from(&config),
    );

    // Resolve the position now if one is configured; otherwise wait for the browser
    if let Some(position) = config.initial_position {
        session.locate(&FixedPosition(position)).await?;
    }

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), session));

    // Build router
    let app = activity_map::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("activity_map=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
