// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity model: running and cycling records with derived metrics.

use crate::error::{AppError, Result};
use crate::time_utils::format_month_day;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A latitude/longitude pair in degrees.
///
/// Serialized as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Check that both components are finite and the latitude is in range.
    /// A longitude outside `[-180, 180]` is wrapped back into that range;
    /// in-range values are returned untouched.
    ///
    /// Maps report clicks on repeated world copies with longitudes outside
    /// the canonical range; those are the same places.
    pub fn normalize(self) -> Result<Self> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(AppError::invalid_field(
                "latitude",
                "must be between -90 and 90",
            ));
        }
        if !self.lng.is_finite() {
            return Err(AppError::invalid_field("longitude", "must be a finite number"));
        }
        if (-180.0..=180.0).contains(&self.lng) {
            return Ok(self);
        }
        Ok(Self {
            lat: self.lat,
            lng: (self.lng + 180.0).rem_euclid(360.0) - 180.0,
        })
    }

    /// Convert to a geo point (x = longitude, y = latitude).
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.lng, self.lat)
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lat, c.lng]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

/// Opaque activity identifier, unique within a log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActivityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ActivityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Activity discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Running,
    Cycling,
}

impl ActivityKind {
    /// Capitalized name used in descriptions.
    pub fn label(self) -> &'static str {
        match self {
            ActivityKind::Running => "Running",
            ActivityKind::Cycling => "Cycling",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Running => "running",
            ActivityKind::Cycling => "cycling",
        }
    }

    /// Marker/list icon.
    pub fn icon(self) -> &'static str {
        match self {
            ActivityKind::Running => "🏃‍♂️",
            ActivityKind::Cycling => "🚴‍♀️",
        }
    }

    /// The other kind.
    pub fn toggled(self) -> Self {
        match self {
            ActivityKind::Running => ActivityKind::Cycling,
            ActivityKind::Cycling => ActivityKind::Running,
        }
    }

    /// The kind-specific form field that is relevant for this kind.
    pub fn extra_field(self) -> ExtraField {
        match self {
            ActivityKind::Running => ExtraField::Cadence,
            ActivityKind::Cycling => ExtraField::Elevation,
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(ActivityKind::Running),
            "cycling" => Ok(ActivityKind::Cycling),
            other => Err(AppError::BadRequest(format!(
                "Unknown activity type: {}",
                other
            ))),
        }
    }
}

/// Form field that only applies to one kind of activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ExtraField {
    Cadence,
    Elevation,
}

/// Kind-specific input supplied at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariantInput {
    Running { cadence_spm: f64 },
    Cycling { elevation_gain_m: f64 },
}

/// Kind-specific payload together with its derived metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivityDetails {
    Running {
        cadence_spm: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_km_per_h: f64,
    },
}

/// One logged running or cycling session.
///
/// Fields are private; derived values are computed once in the constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    id: ActivityId,
    created_at: DateTime<Utc>,
    coordinates: Coordinates,
    distance_km: f64,
    duration_min: f64,
    details: ActivityDetails,
    description: String,
}

impl Activity {
    /// Create a running activity stamped with a fresh id and the current time.
    pub fn running(
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Result<Self> {
        Self::restore(
            ActivityId::generate(),
            Utc::now(),
            coordinates,
            distance_km,
            duration_min,
            VariantInput::Running { cadence_spm },
        )
    }

    /// Create a cycling activity stamped with a fresh id and the current time.
    pub fn cycling(
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self> {
        Self::restore(
            ActivityId::generate(),
            Utc::now(),
            coordinates,
            distance_km,
            duration_min,
            VariantInput::Cycling { elevation_gain_m },
        )
    }

    /// Build a record from base fields, validating and deriving as at creation.
    pub fn restore(
        id: ActivityId,
        created_at: DateTime<Utc>,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        variant: VariantInput,
    ) -> Result<Self> {
        let coordinates = coordinates.normalize()?;
        let distance_km = require_positive("distance", distance_km)?;
        let duration_min = require_positive("duration", duration_min)?;

        let details = match variant {
            VariantInput::Running { cadence_spm } => {
                let cadence_spm = require_positive("cadence", cadence_spm)?;
                ActivityDetails::Running {
                    cadence_spm,
                    pace_min_per_km: duration_min / distance_km,
                }
            }
            VariantInput::Cycling { elevation_gain_m } => {
                let elevation_gain_m = require_non_negative("elevation gain", elevation_gain_m)?;
                ActivityDetails::Cycling {
                    elevation_gain_m,
                    speed_km_per_h: distance_km / (duration_min / 60.0),
                }
            }
        };

        let kind = details.kind();
        let description = format!("{} on {}", kind.label(), format_month_day(created_at));

        Ok(Self {
            id,
            created_at,
            coordinates,
            distance_km,
            duration_min,
            details,
            description,
        })
    }

    pub fn id(&self) -> &ActivityId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn kind(&self) -> ActivityKind {
        self.details.kind()
    }

    pub fn details(&self) -> &ActivityDetails {
        &self.details
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Minutes per kilometer (running only).
    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.details {
            ActivityDetails::Running {
                pace_min_per_km, ..
            } => Some(pace_min_per_km),
            ActivityDetails::Cycling { .. } => None,
        }
    }

    /// Kilometers per hour (cycling only).
    pub fn speed_km_per_h(&self) -> Option<f64> {
        match self.details {
            ActivityDetails::Cycling { speed_km_per_h, .. } => Some(speed_km_per_h),
            ActivityDetails::Running { .. } => None,
        }
    }

    /// Pace for running, speed for cycling.
    pub fn pace_or_speed(&self) -> f64 {
        match self.details {
            ActivityDetails::Running {
                pace_min_per_km, ..
            } => pace_min_per_km,
            ActivityDetails::Cycling { speed_km_per_h, .. } => speed_km_per_h,
        }
    }

    /// Cadence for running, elevation gain for cycling.
    pub fn cadence_or_elevation(&self) -> f64 {
        match self.details {
            ActivityDetails::Running { cadence_spm, .. } => cadence_spm,
            ActivityDetails::Cycling {
                elevation_gain_m, ..
            } => elevation_gain_m,
        }
    }
}

impl ActivityDetails {
    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityDetails::Running { .. } => ActivityKind::Running,
            ActivityDetails::Cycling { .. } => ActivityKind::Cycling,
        }
    }
}

fn require_positive(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(AppError::invalid_field(field, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(AppError::invalid_field(field, "must be positive"));
    }
    Ok(value)
}

fn require_non_negative(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(AppError::invalid_field(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(AppError::invalid_field(field, "must not be negative"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn london() -> Coordinates {
        Coordinates::new(51.5, -0.1)
    }

    #[test]
    fn test_running_pace() {
        let run = Activity::running(london(), 5.0, 30.0, 180.0).unwrap();
        assert_eq!(run.kind(), ActivityKind::Running);
        assert_eq!(run.pace_min_per_km(), Some(6.0));
        assert_eq!(run.speed_km_per_h(), None);
        assert_eq!(run.cadence_or_elevation(), 180.0);
    }

    #[test]
    fn test_cycling_speed() {
        let ride = Activity::cycling(london(), 20.0, 40.0, 250.0).unwrap();
        assert_eq!(ride.kind(), ActivityKind::Cycling);
        assert_eq!(ride.speed_km_per_h(), Some(30.0));
        assert_eq!(ride.pace_min_per_km(), None);
    }

    #[test]
    fn test_cycling_accepts_zero_elevation() {
        let ride = Activity::cycling(london(), 12.0, 30.0, 0.0).unwrap();
        assert_eq!(ride.cadence_or_elevation(), 0.0);
        assert_eq!(ride.speed_km_per_h(), Some(24.0));
    }

    #[test]
    fn test_description_uses_creation_date() {
        let created = Utc.with_ymd_and_hms(2024, 10, 18, 9, 0, 0).unwrap();
        let run = Activity::restore(
            ActivityId::from("abc"),
            created,
            london(),
            5.0,
            25.0,
            VariantInput::Running { cadence_spm: 170.0 },
        )
        .unwrap();
        assert_eq!(run.description(), "Running on October 18");

        let ride = Activity::restore(
            ActivityId::from("def"),
            created,
            london(),
            5.0,
            25.0,
            VariantInput::Cycling {
                elevation_gain_m: 10.0,
            },
        )
        .unwrap();
        assert_eq!(ride.description(), "Cycling on October 18");
    }

    #[test]
    fn test_rejects_invalid_numbers() {
        let err = Activity::running(london(), -5.0, 30.0, 180.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidActivityInput(ref m) if m.contains("distance")));

        let err = Activity::running(london(), 5.0, f64::NAN, 180.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidActivityInput(ref m) if m.contains("duration")));

        let err = Activity::running(london(), 5.0, 30.0, 0.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidActivityInput(ref m) if m.contains("cadence")));

        let err = Activity::cycling(london(), 5.0, 30.0, -1.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidActivityInput(ref m) if m.contains("elevation")));

        let err = Activity::cycling(london(), f64::INFINITY, 30.0, 1.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidActivityInput(_)));
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        let err = Activity::running(Coordinates::new(91.0, 0.0), 5.0, 30.0, 180.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidActivityInput(ref m) if m.contains("latitude")));

        let err =
            Activity::running(Coordinates::new(0.0, f64::NAN), 5.0, 30.0, 180.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidActivityInput(ref m) if m.contains("longitude")));
    }

    #[test]
    fn test_wrapped_longitude_is_normalized() {
        let run = Activity::running(Coordinates::new(51.5, 199.9), 5.0, 30.0, 180.0).unwrap();
        assert!((run.coordinates().lng - (-160.1)).abs() < 1e-9);
        assert_eq!(run.coordinates().lat, 51.5);

        assert_eq!(
            Coordinates::new(0.0, -190.0).normalize().unwrap(),
            Coordinates::new(0.0, 170.0)
        );
        assert_eq!(
            Coordinates::new(0.0, 180.0).normalize().unwrap(),
            Coordinates::new(0.0, 180.0)
        );
        assert_eq!(
            Coordinates::new(10.0, -0.1).normalize().unwrap(),
            Coordinates::new(10.0, -0.1)
        );
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Activity::running(london(), 1.0, 5.0, 160.0).unwrap();
        let b = Activity::running(london(), 1.0, 5.0, 160.0).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_kind_toggle_and_extra_field() {
        assert_eq!(ActivityKind::Running.toggled(), ActivityKind::Cycling);
        assert_eq!(ActivityKind::Running.toggled().toggled(), ActivityKind::Running);
        assert_eq!(ActivityKind::Running.extra_field(), ExtraField::Cadence);
        assert_eq!(ActivityKind::Cycling.extra_field(), ExtraField::Elevation);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Running".parse::<ActivityKind>().unwrap(), ActivityKind::Running);
        assert_eq!(" cycling ".parse::<ActivityKind>().unwrap(), ActivityKind::Cycling);
        assert!("swimming".parse::<ActivityKind>().is_err());
    }

    #[test]
    fn test_coordinates_serialize_as_pair() {
        let json = serde_json::to_string(&london()).unwrap();
        assert_eq!(json, "[51.5,-0.1]");
        let back: Coordinates = serde_json::from_str(&json).unwrap();
        assert_eq!(back, london());
    }
}
