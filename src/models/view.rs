// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Payloads handed to the map and list renderers.

use crate::models::{Activity, ActivityKind, Coordinates};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Data needed to render one list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ListEntry {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub id: crate::models::ActivityId,
    pub kind: ActivityKind,
    pub description: String,
    pub distance_km: f64,
    pub duration_min: f64,
    /// min/km for running, km/h for cycling
    pub pace_or_speed: f64,
    /// spm for running, meters for cycling
    pub cadence_or_elevation: f64,
}

impl From<&Activity> for ListEntry {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id().clone(),
            kind: activity.kind(),
            description: activity.description().to_string(),
            distance_km: activity.distance_km(),
            duration_min: activity.duration_min(),
            pace_or_speed: activity.pace_or_speed(),
            cadence_or_elevation: activity.cadence_or_elevation(),
        }
    }
}

/// Data needed to place one marker with its popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MarkerView {
    #[cfg_attr(feature = "binding-generation", ts(type = "[number, number]"))]
    pub coordinates: Coordinates,
    /// None for the "current position" marker
    pub kind: Option<ActivityKind>,
    pub description: String,
    pub popup: String,
}

impl MarkerView {
    /// Marker for the user's resolved position.
    pub fn current_position(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            kind: None,
            description: "Current position".to_string(),
            popup: "Current position".to_string(),
        }
    }
}

impl From<&Activity> for MarkerView {
    fn from(activity: &Activity) -> Self {
        let kind = activity.kind();
        Self {
            coordinates: activity.coordinates(),
            kind: Some(kind),
            description: activity.description().to_string(),
            popup: format!("{} {}", kind.icon(), activity.description()),
        }
    }
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// User-facing notification. Blocking notices must be acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub blocking: bool,
}

impl Notice {
    pub fn blocking(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            blocking: true,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
            blocking: false,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            blocking: false,
        }
    }
}

/// Values typed into the form. Missing values are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FormFields {
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub cadence: Option<f64>,
    #[serde(default)]
    pub elevation: Option<f64>,
}
