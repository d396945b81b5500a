// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity Map: log runs and rides against points on a map
//!
//! This crate provides the activity model, the persistence codec and the
//! session controller that keeps the map, the activity list and stored data
//! in sync, plus a small HTTP API for a browser front end.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod time_utils;

use config::Config;
use error::{AppError, Result};
use services::{CommandQueue, SessionController};
use std::sync::{Mutex, MutexGuard};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub session: Mutex<SessionController<CommandQueue>>,
}

impl AppState {
    pub fn new(config: Config, session: SessionController<CommandQueue>) -> Self {
        Self {
            config,
            session: Mutex::new(session),
        }
    }

    /// Lock the session. Never hold the guard across an `.await`.
    pub fn session(&self) -> Result<MutexGuard<'_, SessionController<CommandQueue>>> {
        self.session
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Session lock poisoned")))
    }
}
