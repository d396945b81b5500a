// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence codec for the activity log.
//!
//! The log is stored as a JSON array. Each record carries a `type`
//! discriminant plus its base fields; pace, speed and description are
//! recomputed on decode rather than stored.
//!
//! ```json
//! [{"type":"running","id":"…","date":"2024-10-18T09:00:00Z",
//!   "coord":[51.5,-0.1],"distance":5.0,"duration":30.0,"cadence":180.0}]
//! ```

use crate::error::{AppError, Result};
use crate::models::{Activity, ActivityDetails, ActivityId, ActivityLog, Coordinates, VariantInput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted form of one activity.
///
/// Unknown fields (`pace`, `speed`, `description`) written by older front
/// ends are ignored on read.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StoredActivity {
    Running {
        id: String,
        date: DateTime<Utc>,
        coord: Coordinates,
        distance: f64,
        duration: f64,
        cadence: f64,
    },
    Cycling {
        id: String,
        date: DateTime<Utc>,
        coord: Coordinates,
        distance: f64,
        duration: f64,
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
    },
}

impl From<&Activity> for StoredActivity {
    fn from(activity: &Activity) -> Self {
        let id = activity.id().to_string();
        let date = activity.created_at();
        let coord = activity.coordinates();
        let distance = activity.distance_km();
        let duration = activity.duration_min();

        match *activity.details() {
            ActivityDetails::Running { cadence_spm, .. } => StoredActivity::Running {
                id,
                date,
                coord,
                distance,
                duration,
                cadence: cadence_spm,
            },
            ActivityDetails::Cycling {
                elevation_gain_m, ..
            } => StoredActivity::Cycling {
                id,
                date,
                coord,
                distance,
                duration,
                elevation_gain: elevation_gain_m,
            },
        }
    }
}

impl StoredActivity {
    fn into_activity(self) -> Result<Activity> {
        let (id, date, coord, distance, duration, variant) = match self {
            StoredActivity::Running {
                id,
                date,
                coord,
                distance,
                duration,
                cadence,
            } => (
                id,
                date,
                coord,
                distance,
                duration,
                VariantInput::Running {
                    cadence_spm: cadence,
                },
            ),
            StoredActivity::Cycling {
                id,
                date,
                coord,
                distance,
                duration,
                elevation_gain,
            } => (
                id,
                date,
                coord,
                distance,
                duration,
                VariantInput::Cycling {
                    elevation_gain_m: elevation_gain,
                },
            ),
        };

        if id.is_empty() {
            return Err(AppError::CorruptPersistedData(
                "activity has an empty id".to_string(),
            ));
        }

        Activity::restore(
            ActivityId::from(id.clone()),
            date,
            coord,
            distance,
            duration,
            variant,
        )
        .map_err(|e| AppError::CorruptPersistedData(format!("activity {}: {}", id, e)))
    }
}

/// Encode a log as JSON text, preserving record order.
pub fn encode(log: &ActivityLog) -> Result<String> {
    let stored: Vec<StoredActivity> = log.iter().map(StoredActivity::from).collect();
    serde_json::to_string(&stored)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode activity log: {}", e)))
}

/// Decode JSON text into a log.
///
/// Blank text and `null` decode to an empty log.
pub fn decode(text: &str) -> Result<ActivityLog> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(ActivityLog::new());
    }

    let stored: Option<Vec<StoredActivity>> = serde_json::from_str(text)
        .map_err(|e| AppError::CorruptPersistedData(e.to_string()))?;

    let mut log = ActivityLog::new();
    for record in stored.unwrap_or_default() {
        let activity = record.into_activity()?;
        log.append(activity).map_err(|e| match e {
            AppError::DuplicateActivity(id) => {
                AppError::CorruptPersistedData(format!("duplicate activity id {}", id))
            }
            other => other,
        })?;
    }
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityKind;
    use chrono::TimeZone;

    fn sample_log() -> ActivityLog {
        let created = Utc.with_ymd_and_hms(2024, 10, 18, 9, 15, 0).unwrap();
        let mut log = ActivityLog::new();
        log.append(
            Activity::restore(
                ActivityId::from("run-1"),
                created,
                Coordinates::new(51.5, -0.1),
                5.0,
                30.0,
                VariantInput::Running { cadence_spm: 180.0 },
            )
            .unwrap(),
        )
        .unwrap();
        log.append(
            Activity::restore(
                ActivityId::from("ride-1"),
                created,
                Coordinates::new(37.42, -122.08),
                27.3,
                61.0,
                VariantInput::Cycling {
                    elevation_gain_m: 0.0,
                },
            )
            .unwrap(),
        )
        .unwrap();
        log
    }

    #[test]
    fn test_round_trip() {
        let log = sample_log();
        let decoded = decode(&encode(&log).unwrap()).unwrap();
        assert_eq!(decoded, log);
        assert_eq!(decoded.all()[0].kind(), ActivityKind::Running);
        assert_eq!(decoded.all()[1].kind(), ActivityKind::Cycling);
        assert_eq!(decoded.all()[0].pace_min_per_km(), Some(6.0));
    }

    #[test]
    fn test_round_trip_fresh_activities() {
        // Sub-second timestamps and arbitrary floats must survive
        let mut log = ActivityLog::new();
        log.append(Activity::running(Coordinates::new(48.8566, 2.3522), 7.3, 41.7, 172.0).unwrap())
            .unwrap();
        log.append(Activity::cycling(Coordinates::new(-33.86, 151.2), 0.1, 0.7, 3.3).unwrap())
            .unwrap();

        let decoded = decode(&encode(&log).unwrap()).unwrap();
        assert_eq!(decoded, log);
    }

    #[test]
    fn test_round_trip_empty() {
        let log = ActivityLog::new();
        let text = encode(&log).unwrap();
        assert_eq!(text, "[]");
        assert_eq!(decode(&text).unwrap(), log);
    }

    #[test]
    fn test_encoded_shape() {
        let text = encode(&sample_log()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json[0]["type"], "running");
        assert_eq!(json[0]["coord"], serde_json::json!([51.5, -0.1]));
        assert_eq!(json[0]["cadence"], 180.0);
        assert!(json[0].get("pace").is_none());
        assert_eq!(json[1]["type"], "cycling");
        assert_eq!(json[1]["elevationGain"], 0.0);
    }

    #[test]
    fn test_decode_blank_and_null() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("   \n").unwrap().is_empty());
        assert!(decode("null").unwrap().is_empty());
    }

    #[test]
    fn test_decode_ignores_persisted_derived_fields() {
        // Stale derived values are recomputed, not trusted
        let text = r#"[{"type":"running","id":"1729241100","date":"2024-10-18T09:45:00.000Z",
            "coord":[51.5,-0.1],"distance":10,"duration":50,"cadence":175,
            "pace":99,"description":"Running on January 1"}]"#;
        let log = decode(text).unwrap();
        let run = &log.all()[0];
        assert_eq!(run.id().as_str(), "1729241100");
        assert_eq!(run.pace_min_per_km(), Some(5.0));
        assert_eq!(run.description(), "Running on October 18");
    }

    #[test]
    fn test_decode_missing_discriminant() {
        let text = r#"[{"id":"1","date":"2024-10-18T09:45:00Z","coord":[0,0],
            "distance":1,"duration":1,"cadence":1}]"#;
        assert!(matches!(
            decode(text),
            Err(AppError::CorruptPersistedData(_))
        ));
    }

    #[test]
    fn test_decode_missing_field() {
        let text = r#"[{"type":"cycling","id":"1","date":"2024-10-18T09:45:00Z",
            "coord":[0,0],"distance":1,"duration":1}]"#;
        assert!(matches!(
            decode(text),
            Err(AppError::CorruptPersistedData(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_values() {
        let text = r#"[{"type":"running","id":"1","date":"2024-10-18T09:45:00Z",
            "coord":[0,0],"distance":-3,"duration":1,"cadence":1}]"#;
        assert!(matches!(
            decode(text),
            Err(AppError::CorruptPersistedData(ref m)) if m.contains("distance")
        ));
    }

    #[test]
    fn test_decode_wraps_longitude() {
        let text = r#"[
            {"type":"running","id":"1","date":"2024-10-18T09:45:00Z",
             "coord":[51.5,-0.1],"distance":5,"duration":30,"cadence":180},
            {"type":"cycling","id":"2","date":"2024-10-18T10:45:00Z",
             "coord":[51.5,190.0],"distance":20,"duration":60,"elevationGain":100}
        ]"#;
        let log = decode(text).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(
            log.find(&ActivityId::from("2")).unwrap().coordinates(),
            Coordinates::new(51.5, -170.0)
        );
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let record = r#"{"type":"running","id":"1","date":"2024-10-18T09:45:00Z",
            "coord":[0,0],"distance":1,"duration":1,"cadence":1}"#;
        let text = format!("[{},{}]", record, record);
        assert!(matches!(
            decode(&text),
            Err(AppError::CorruptPersistedData(ref m)) if m.contains("duplicate")
        ));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode("{not json"),
            Err(AppError::CorruptPersistedData(_))
        ));
        assert!(matches!(
            decode(r#"{"type":"running"}"#),
            Err(AppError::CorruptPersistedData(_))
        ));
    }
}
