// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session API routes.
//!
//! Each session call returns the view commands the front end must apply,
//! in order. A failed call still hands over everything queued so far, next
//! to the error, so notices and pending replays are never lost.

use crate::error::{AppError, Result};
use crate::models::{ActivityId, ActivityKind, Coordinates, FormFields, ListEntry};
use crate::services::export::to_feature_collection;
use crate::services::{
    CommandQueue, SelectOutcome, SessionController, SessionSnapshot, SubmitOutcome, ViewCommand,
};
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/position", post(position_resolved))
        .route("/api/position/failure", post(position_failed))
        .route("/api/map/click", post(map_clicked))
        .route("/api/form", put(update_form))
        .route("/api/form/kind", put(set_form_kind))
        .route("/api/form/submit", post(submit_form))
        .route("/api/activities", get(list_activities))
        .route("/api/activities/geojson", get(export_geojson))
        .route("/api/activities/{id}/select", post(select_activity))
        .route("/api/storage", delete(reset_storage))
}

// ─── Request / Response Types ────────────────────────────────

/// A point on the map.
#[derive(Debug, Deserialize)]
pub struct PointRequest {
    pub lat: f64,
    pub lng: f64,
}

impl From<PointRequest> for Coordinates {
    fn from(p: PointRequest) -> Self {
        Coordinates::new(p.lat, p.lng)
    }
}

/// Geolocation failure reported by the browser.
#[derive(Debug, Deserialize)]
pub struct PositionFailureRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KindRequest {
    pub kind: ActivityKind,
}

/// Outcome of a call plus the commands to render.
#[derive(Serialize)]
pub struct CommandResponse<T: Serialize> {
    pub outcome: T,
    pub commands: Vec<ViewCommand>,
}

/// A failed session call together with the commands it leaves behind.
#[derive(Debug)]
pub struct CommandError {
    pub error: AppError,
    pub commands: Vec<ViewCommand>,
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            commands: Vec::new(),
        }
    }
}

#[derive(Serialize)]
struct CommandErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    commands: Vec<ViewCommand>,
}

impl IntoResponse for CommandError {
    fn into_response(self) -> Response {
        let (status, error, details) = self.error.parts();
        let body = CommandErrorBody {
            error,
            details,
            commands: self.commands,
        };
        (status, Json(body)).into_response()
    }
}

type CommandResult<T> = std::result::Result<Json<CommandResponse<T>>, CommandError>;

/// Drain queued commands and pair them with the call's result.
fn respond<T: Serialize>(
    session: &mut SessionController<CommandQueue>,
    result: Result<T>,
) -> CommandResult<T> {
    let commands = session.view_mut().drain();
    match result {
        Ok(outcome) => Ok(Json(CommandResponse { outcome, commands })),
        Err(error) => Err(CommandError { error, commands }),
    }
}

// ─── Session ─────────────────────────────────────────────────

/// Current session state. Also hands over any commands still pending, such
/// as the list replay queued at startup.
async fn get_session(State(state): State<Arc<AppState>>) -> CommandResult<SessionSnapshot> {
    let mut session = state.session()?;
    let snapshot = session.snapshot();
    respond(&mut session, Ok(snapshot))
}

async fn position_resolved(
    State(state): State<Arc<AppState>>,
    Json(point): Json<PointRequest>,
) -> CommandResult<()> {
    let mut session = state.session()?;
    let result = session.resolve_position(Ok(point.into()));
    respond(&mut session, result)
}

async fn position_failed(
    State(state): State<Arc<AppState>>,
    Json(failure): Json<PositionFailureRequest>,
) -> CommandResult<()> {
    let reason = failure
        .reason
        .unwrap_or_else(|| "geolocation failed".to_string());
    let mut session = state.session()?;
    let result = session.resolve_position(Err(AppError::PositionUnavailable(reason)));
    respond(&mut session, result)
}

// ─── Map & Form ──────────────────────────────────────────────

async fn map_clicked(
    State(state): State<Arc<AppState>>,
    Json(point): Json<PointRequest>,
) -> CommandResult<()> {
    let mut session = state.session()?;
    let result = session.map_clicked(point.into());
    respond(&mut session, result)
}

async fn update_form(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<FormFields>,
) -> CommandResult<()> {
    let mut session = state.session()?;
    let result = session.fill_form(fields);
    respond(&mut session, result)
}

async fn set_form_kind(
    State(state): State<Arc<AppState>>,
    Json(request): Json<KindRequest>,
) -> CommandResult<()> {
    let mut session = state.session()?;
    let result = session.set_kind(request.kind);
    respond(&mut session, result)
}

/// Submit the form with the values currently typed in.
async fn submit_form(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<FormFields>,
) -> CommandResult<SubmitOutcome> {
    let mut session = state.session()?;
    let result = session.fill_form(fields).and_then(|_| session.submit());
    respond(&mut session, result)
}

// ─── Activities ──────────────────────────────────────────────

async fn list_activities(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ListEntry>>> {
    let session = state.session()?;
    Ok(Json(session.log().iter().map(ListEntry::from).collect()))
}

async fn export_geojson(State(state): State<Arc<AppState>>) -> Result<Json<FeatureCollection>> {
    let session = state.session()?;
    Ok(Json(to_feature_collection(session.log())))
}

async fn select_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> CommandResult<SelectOutcome> {
    let mut session = state.session()?;
    let outcome = session.select_entry(&ActivityId::from(id));
    respond(&mut session, Ok(outcome))
}

async fn reset_storage(State(state): State<Arc<AppState>>) -> CommandResult<()> {
    let mut session = state.session()?;
    let result = session.reset_storage();
    respond(&mut session, result)
}
