// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geolocation sources.

use crate::error::{AppError, Result};
use crate::models::Coordinates;
use std::future::Future;

/// Asynchronous one-shot position provider.
pub trait PositionSource {
    /// Request the current position. Called at most once per session.
    fn request_once(&self) -> impl Future<Output = Result<Coordinates>> + Send;
}

/// Source that always resolves to a configured position.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

impl PositionSource for FixedPosition {
    async fn request_once(&self) -> Result<Coordinates> {
        self.0.normalize()
    }
}

/// Source that always fails, for sessions without geolocation.
#[derive(Debug, Clone)]
pub struct UnavailablePosition(pub String);

impl PositionSource for UnavailablePosition {
    async fn request_once(&self) -> Result<Coordinates> {
        Err(AppError::PositionUnavailable(self.0.clone()))
    }
}

/// Parse a `"lat,lng"` pair as used by `INITIAL_POSITION`.
pub fn parse_position(value: &str) -> Result<Coordinates> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| AppError::BadRequest(format!("Expected \"lat,lng\", got {:?}", value)))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid latitude: {:?}", lat)))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid longitude: {:?}", lng)))?;

    Coordinates::new(lat, lng).normalize()
}
