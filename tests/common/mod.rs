// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_map::config::Config;
use activity_map::routes::create_router;
use activity_map::services::{CommandQueue, SessionConfig, SessionController};
use activity_map::storage::MemoryStore;
use activity_map::AppState;
use std::sync::Arc;

/// Start a session over the given store with default settings.
#[allow(dead_code)]
pub fn test_session(store: &MemoryStore) -> SessionController<CommandQueue> {
    SessionController::start(
        Arc::new(store.clone()),
        CommandQueue::new(),
        SessionConfig::default(),
    )
}

/// Start a session and resolve its position, discarding startup commands.
#[allow(dead_code)]
pub fn ready_session(store: &MemoryStore) -> SessionController<CommandQueue> {
    let mut session = test_session(store);
    session
        .resolve_position(Ok(activity_map::models::Coordinates::new(51.5, -0.1)))
        .expect("Position should resolve");
    session.view_mut().drain();
    session
}

/// Create a test app over an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(store: &MemoryStore) -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let session = SessionController::start(
        Arc::new(store.clone()),
        CommandQueue::new(),
        SessionConfig::from(&config),
    );
    let state = Arc::new(AppState::new(config, session));
    (create_router(state.clone()), state)
}
