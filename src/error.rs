// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid activity input: {0}")]
    InvalidActivityInput(String),

    #[error("Corrupt persisted data: {0}")]
    CorruptPersistedData(String),

    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("Duplicate activity id: {0}")]
    DuplicateActivity(String),

    #[error("Not allowed in current state: {0}")]
    InvalidState(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build an `InvalidActivityInput` error for a single named field.
    pub fn invalid_field(field: &str, reason: &str) -> Self {
        AppError::InvalidActivityInput(format!("{} {}", field, reason))
    }

    /// HTTP status, machine-readable code and client-visible details.
    ///
    /// Server-side failures are logged here and their details withheld.
    pub fn parts(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            AppError::InvalidActivityInput(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_activity_input",
                Some(msg.clone()),
            ),
            AppError::CorruptPersistedData(msg) => {
                tracing::warn!(error = %msg, "Corrupt persisted data");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "corrupt_persisted_data",
                    Some(msg.clone()),
                )
            }
            AppError::PositionUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "position_unavailable",
                Some(msg.clone()),
            ),
            AppError::DuplicateActivity(msg) => {
                (StatusCode::CONFLICT, "duplicate_activity", Some(msg.clone()))
            }
            AppError::InvalidState(msg) => {
                (StatusCode::CONFLICT, "invalid_state", Some(msg.clone()))
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = self.parts();
        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers and services
pub type Result<T> = std::result::Result<T, AppError>;
