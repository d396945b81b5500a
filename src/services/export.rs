// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GeoJSON export of the activity log.

use crate::models::{ActivityDetails, ActivityLog};
use crate::time_utils::format_utc_rfc3339;
use geo::{BoundingRect, MultiPoint, Point};
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

/// Export every activity as a Point feature, in log order.
///
/// The collection's bbox covers all points; it is omitted for an empty log.
pub fn to_feature_collection(log: &ActivityLog) -> FeatureCollection {
    let points: Vec<Point<f64>> = log.iter().map(|a| a.coordinates().to_point()).collect();

    let features = log
        .iter()
        .zip(&points)
        .map(|(activity, point)| {
            let mut properties = JsonObject::new();
            properties.insert("kind".into(), json!(activity.kind()));
            properties.insert("description".into(), json!(activity.description()));
            properties.insert(
                "date".into(),
                json!(format_utc_rfc3339(activity.created_at())),
            );
            properties.insert("distance_km".into(), json!(activity.distance_km()));
            properties.insert("duration_min".into(), json!(activity.duration_min()));
            match *activity.details() {
                ActivityDetails::Running {
                    cadence_spm,
                    pace_min_per_km,
                } => {
                    properties.insert("cadence_spm".into(), json!(cadence_spm));
                    properties.insert("pace_min_per_km".into(), json!(pace_min_per_km));
                }
                ActivityDetails::Cycling {
                    elevation_gain_m,
                    speed_km_per_h,
                } => {
                    properties.insert("elevation_gain_m".into(), json!(elevation_gain_m));
                    properties.insert("speed_km_per_h".into(), json!(speed_km_per_h));
                }
            }

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::from(point))),
                id: Some(Id::String(activity.id().to_string())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let bbox = MultiPoint::from(points)
        .bounding_rect()
        .map(|rect| vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y]);

    FeatureCollection {
        bbox,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Coordinates};

    #[test]
    fn test_empty_log_exports_empty_collection() {
        let collection = to_feature_collection(&ActivityLog::new());
        assert!(collection.features.is_empty());
        assert!(collection.bbox.is_none());
    }

    #[test]
    fn test_points_use_lng_lat_order() {
        let mut log = ActivityLog::new();
        log.append(Activity::running(Coordinates::new(51.5, -0.1), 5.0, 30.0, 180.0).unwrap())
            .unwrap();
        log.append(Activity::cycling(Coordinates::new(48.8, 2.3), 20.0, 60.0, 0.0).unwrap())
            .unwrap();

        let collection = to_feature_collection(&log);
        assert_eq!(collection.features.len(), 2);

        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(
            json["features"][0]["geometry"]["coordinates"],
            serde_json::json!([-0.1, 51.5])
        );
        assert_eq!(json["features"][0]["properties"]["kind"], "running");
        assert_eq!(json["features"][0]["properties"]["pace_min_per_km"], 6.0);
        assert_eq!(json["features"][1]["properties"]["speed_km_per_h"], 20.0);
        assert_eq!(
            collection.bbox,
            Some(vec![-0.1, 48.8, 2.3, 51.5])
        );
    }
}
