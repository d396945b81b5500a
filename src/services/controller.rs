// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session controller: keeps the map, list, form and stored log in sync.
//!
//! State machine:
//! - `AwaitingPosition` until the position source answers
//! - `MapReady` with the form either hidden or visible for one kind
//! - `Degraded` if no position could be obtained (list still works)
//!
//! All methods are synchronous except `locate`, which awaits the position
//! source once and then feeds the result to `resolve_position`.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    Activity, ActivityId, ActivityKind, ActivityLog, Coordinates, ExtraField, FormFields,
    ListEntry, MarkerView, Notice,
};
use crate::services::codec;
use crate::services::position::PositionSource;
use crate::services::view::{MapHandle, SessionView};
use crate::storage::{keys, KeyValueStore};
use serde::Serialize;
use std::sync::Arc;

const DEFAULT_MAP_ZOOM: u8 = 13;

/// Per-session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Storage key holding the encoded log
    pub storage_key: String,
    /// Zoom level for initial view and re-centering
    pub map_zoom: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: keys::ACTIVITIES.to_string(),
            map_zoom: DEFAULT_MAP_ZOOM,
        }
    }
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self {
            storage_key: config.storage_key.clone(),
            map_zoom: config.map_zoom,
        }
    }
}

/// Input form state while the map is ready.
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Hidden,
    Visible {
        kind: ActivityKind,
        clicked_at: Coordinates,
        fields: FormFields,
    },
}

/// Top-level session state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    AwaitingPosition,
    MapReady { map: MapHandle, form: FormState },
    Degraded { reason: String },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::AwaitingPosition => "awaiting_position",
            SessionState::MapReady { .. } => "map_ready",
            SessionState::Degraded { .. } => "degraded",
        }
    }
}

/// Everything one session owns besides its collaborators.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: SessionState,
    pub log: ActivityLog,
    pub config: SessionConfig,
}

/// Result of a successful form submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub activity: ListEntry,
    /// False if the log could not be written to storage
    pub persisted: bool,
}

/// Result of selecting a list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectOutcome {
    Recentered,
    /// Id not in the log; nothing happened
    Stale,
    /// No map to move
    MapUnavailable,
}

/// Serializable view of the current form.
#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    pub kind: ActivityKind,
    pub extra_field: ExtraField,
    pub clicked_at: Coordinates,
    pub fields: FormFields,
}

/// Serializable view of the whole session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
    pub form: Option<FormSnapshot>,
    pub activities: Vec<ListEntry>,
}

/// Drives one session against its view and store.
pub struct SessionController<V: SessionView> {
    session: Session,
    store: Arc<dyn KeyValueStore>,
    view: V,
}

impl<V: SessionView> SessionController<V> {
    /// Start a session: load the stored log and render it into the list.
    ///
    /// Unreadable or corrupt storage yields an empty log and a warning
    /// notice; startup never fails.
    pub fn start(store: Arc<dyn KeyValueStore>, mut view: V, config: SessionConfig) -> Self {
        let log = match load_log(store.as_ref(), &config.storage_key) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!(
                    key = %config.storage_key,
                    error = %e,
                    "Discarding unreadable activity log"
                );
                view.notify(&Notice::warning(
                    "Saved activities could not be loaded and were ignored",
                ));
                ActivityLog::new()
            }
        };

        for activity in &log {
            view.render_entry(&ListEntry::from(activity));
        }
        tracing::info!(count = log.len(), "Session started");

        Self {
            session: Session {
                state: SessionState::AwaitingPosition,
                log,
                config,
            },
            store,
            view,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> &SessionState {
        &self.session.state
    }

    pub fn log(&self) -> &ActivityLog {
        &self.session.log
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Ask `source` for the position and apply the answer.
    pub async fn locate<P: PositionSource>(&mut self, source: &P) -> Result<()> {
        self.ensure_awaiting_position()?;
        let result = source.request_once().await;
        self.resolve_position(result)
    }

    /// Apply the position source's answer. Accepted once per session.
    pub fn resolve_position(&mut self, result: Result<Coordinates>) -> Result<()> {
        self.ensure_awaiting_position()?;

        let position = result.and_then(Coordinates::normalize);
        match position {
            Ok(center) => {
                let zoom = self.session.config.map_zoom;
                let map = self.view.initialize(center, zoom);
                self.view.place_marker(&map, &MarkerView::current_position(center));
                for activity in &self.session.log {
                    self.view.place_marker(&map, &MarkerView::from(activity));
                }
                self.session.state = SessionState::MapReady {
                    map,
                    form: FormState::Hidden,
                };
                tracing::info!(
                    position = %center,
                    markers = self.session.log.len(),
                    "Map ready"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Position unavailable, map disabled");
                self.view.notify(&Notice::warning("Can't get your geolocation!"));
                self.session.state = SessionState::Degraded {
                    reason: e.to_string(),
                };
            }
        }
        Ok(())
    }

    /// Handle a click on the map: open the form at the clicked point.
    ///
    /// Clicking again while the form is open moves the pending point and
    /// keeps everything typed so far.
    pub fn map_clicked(&mut self, coordinates: Coordinates) -> Result<()> {
        let coordinates = coordinates.normalize()?;
        let state_name = self.session.state.name();
        let SessionState::MapReady { form, .. } = &mut self.session.state else {
            return Err(AppError::InvalidState(format!(
                "map is not available ({})",
                state_name
            )));
        };

        match form {
            FormState::Hidden => {
                *form = FormState::Visible {
                    kind: ActivityKind::Running,
                    clicked_at: coordinates,
                    fields: FormFields::default(),
                };
                self.view.show_form(ActivityKind::Running);
                tracing::debug!(position = %coordinates, "Form opened");
            }
            FormState::Visible { clicked_at, .. } => {
                *clicked_at = coordinates;
                tracing::debug!(position = %coordinates, "Form moved");
            }
        }
        Ok(())
    }

    /// Switch the form to the other activity kind. Typed values are kept.
    pub fn toggle_kind(&mut self) -> Result<ActivityKind> {
        let kind = self.visible_form_kind()?.toggled();
        self.set_kind(kind)?;
        Ok(kind)
    }

    /// Select the form's activity kind. Typed values are kept.
    pub fn set_kind(&mut self, new_kind: ActivityKind) -> Result<()> {
        let (kind, _) = visible_form_mut(&mut self.session.state)?;
        if *kind != new_kind {
            *kind = new_kind;
            self.view.show_form(new_kind);
        }
        Ok(())
    }

    /// Replace the values typed into the open form.
    pub fn fill_form(&mut self, new_fields: FormFields) -> Result<()> {
        let (_, fields) = visible_form_mut(&mut self.session.state)?;
        *fields = new_fields;
        Ok(())
    }

    /// Submit the open form.
    ///
    /// On invalid input a blocking notice is shown and nothing else changes.
    /// On success the activity is logged, drawn, listed and persisted, and
    /// the form is cleared and hidden.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        let (map, kind, clicked_at, fields) = match &self.session.state {
            SessionState::MapReady {
                map,
                form:
                    FormState::Visible {
                        kind,
                        clicked_at,
                        fields,
                    },
            } => (*map, *kind, *clicked_at, *fields),
            other => {
                return Err(AppError::InvalidState(format!(
                    "form is not open ({})",
                    other.name()
                )))
            }
        };

        let activity = match build_activity(kind, clicked_at, &fields) {
            Ok(activity) => activity,
            Err(e) => {
                tracing::info!(kind = %kind, error = %e, "Rejected activity input");
                self.view.notify(&Notice::blocking(format!(
                    "Inputs have to be positive numbers! ({})",
                    e
                )));
                return Err(e);
            }
        };

        self.session.log.append(activity.clone())?;
        self.view.place_marker(&map, &MarkerView::from(&activity));
        let entry = ListEntry::from(&activity);
        self.view.render_entry(&entry);

        let persisted = match self.persist() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist activity log");
                self.view.notify(&Notice::warning(
                    "Activity logged but could not be saved for next time",
                ));
                false
            }
        };

        self.session.state = SessionState::MapReady {
            map,
            form: FormState::Hidden,
        };
        self.view.hide_form();

        tracing::info!(
            activity_id = %activity.id(),
            kind = %kind,
            distance_km = activity.distance_km(),
            persisted,
            "Activity logged"
        );

        Ok(SubmitOutcome {
            activity: entry,
            persisted,
        })
    }

    /// Re-center the map on a listed activity.
    pub fn select_entry(&mut self, id: &ActivityId) -> SelectOutcome {
        let SessionState::MapReady { map, .. } = &self.session.state else {
            tracing::debug!(activity_id = %id, "Selection ignored, no map");
            return SelectOutcome::MapUnavailable;
        };

        match self.session.log.find(id) {
            Some(activity) => {
                self.view.pan_to(map, activity.coordinates(), self.session.config.map_zoom);
                SelectOutcome::Recentered
            }
            None => {
                tracing::debug!(activity_id = %id, "Selection of unknown activity ignored");
                SelectOutcome::Stale
            }
        }
    }

    /// Remove the stored log. The in-memory log is kept for this session.
    pub fn reset_storage(&mut self) -> Result<()> {
        self.store.clear(&self.session.config.storage_key)?;
        tracing::info!(key = %self.session.config.storage_key, "Stored activities cleared");
        self.view.notify(&Notice::info("Saved activities cleared"));
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (degraded_reason, form) = match &self.session.state {
            SessionState::Degraded { reason } => (Some(reason.clone()), None),
            SessionState::MapReady {
                form:
                    FormState::Visible {
                        kind,
                        clicked_at,
                        fields,
                    },
                ..
            } => (
                None,
                Some(FormSnapshot {
                    kind: *kind,
                    extra_field: kind.extra_field(),
                    clicked_at: *clicked_at,
                    fields: *fields,
                }),
            ),
            _ => (None, None),
        };

        SessionSnapshot {
            state: self.session.state.name(),
            degraded_reason,
            form,
            activities: self.session.log.iter().map(ListEntry::from).collect(),
        }
    }

    fn persist(&self) -> Result<()> {
        let encoded = codec::encode(&self.session.log)?;
        self.store.write(&self.session.config.storage_key, &encoded)
    }

    fn ensure_awaiting_position(&self) -> Result<()> {
        match self.session.state {
            SessionState::AwaitingPosition => Ok(()),
            ref other => {
                tracing::warn!(state = other.name(), "Ignoring repeated position result");
                Err(AppError::InvalidState(format!(
                    "position already resolved ({})",
                    other.name()
                )))
            }
        }
    }

    fn visible_form_kind(&self) -> Result<ActivityKind> {
        match &self.session.state {
            SessionState::MapReady {
                form: FormState::Visible { kind, .. },
                ..
            } => Ok(*kind),
            other => Err(form_not_open(other)),
        }
    }
}

fn visible_form_mut(state: &mut SessionState) -> Result<(&mut ActivityKind, &mut FormFields)> {
    match state {
        SessionState::MapReady {
            form: FormState::Visible { kind, fields, .. },
            ..
        } => Ok((kind, fields)),
        other => Err(form_not_open(other)),
    }
}

fn form_not_open(state: &SessionState) -> AppError {
    AppError::InvalidState(format!("form is not open ({})", state.name()))
}

fn load_log(store: &dyn KeyValueStore, key: &str) -> Result<ActivityLog> {
    match store.read(key)? {
        Some(text) => codec::decode(&text),
        None => Ok(ActivityLog::new()),
    }
}

/// Build an activity from the form, reading only the field relevant to `kind`.
fn build_activity(
    kind: ActivityKind,
    coordinates: Coordinates,
    fields: &FormFields,
) -> Result<Activity> {
    let distance = required("distance", fields.distance)?;
    let duration = required("duration", fields.duration)?;
    match kind {
        ActivityKind::Running => {
            let cadence = required("cadence", fields.cadence)?;
            Activity::running(coordinates, distance, duration, cadence)
        }
        ActivityKind::Cycling => {
            let elevation = required("elevation gain", fields.elevation)?;
            Activity::cycling(coordinates, distance, duration, elevation)
        }
    }
}

fn required(field: &str, value: Option<f64>) -> Result<f64> {
    value.ok_or_else(|| AppError::invalid_field(field, "is required"))
}
