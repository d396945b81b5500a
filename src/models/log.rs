// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ordered, append-only collection of activities for one session.

use crate::error::{AppError, Result};
use crate::models::{Activity, ActivityId};
use std::collections::HashMap;

/// In-memory activity log. Insertion order is creation and display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityLog {
    activities: Vec<Activity>,
    index: HashMap<ActivityId, usize>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an activity to the end of the log.
    ///
    /// Fails with `DuplicateActivity` if the id is already present; the log is
    /// left unchanged in that case.
    pub fn append(&mut self, activity: Activity) -> Result<()> {
        if self.index.contains_key(activity.id()) {
            return Err(AppError::DuplicateActivity(activity.id().to_string()));
        }
        self.index.insert(activity.id().clone(), self.activities.len());
        self.activities.push(activity);
        Ok(())
    }

    /// Look up an activity by id.
    pub fn find(&self, id: &ActivityId) -> Option<&Activity> {
        self.index.get(id).map(|&i| &self.activities[i])
    }

    /// All activities in insertion order.
    pub fn all(&self) -> &[Activity] {
        &self.activities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Activity> {
        self.activities.iter()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

impl<'a> IntoIterator for &'a ActivityLog {
    type Item = &'a Activity;
    type IntoIter = std::slice::Iter<'a, Activity>;

    fn into_iter(self) -> Self::IntoIter {
        self.activities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, VariantInput};
    use chrono::Utc;

    fn run(id: &str) -> Activity {
        Activity::restore(
            ActivityId::from(id),
            Utc::now(),
            Coordinates::new(37.4, -122.1),
            5.0,
            30.0,
            VariantInput::Running { cadence_spm: 170.0 },
        )
        .unwrap()
    }

    #[test]
    fn test_append_preserves_order() {
        let mut log = ActivityLog::new();
        log.append(run("a")).unwrap();
        log.append(run("b")).unwrap();
        log.append(run("c")).unwrap();

        let ids: Vec<&str> = log.all().iter().map(|a| a.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_find_after_append() {
        let mut log = ActivityLog::new();
        assert!(log.find(&ActivityId::from("a")).is_none());

        log.append(run("a")).unwrap();
        let found = log.find(&ActivityId::from("a")).unwrap();
        assert_eq!(found.id().as_str(), "a");
        assert!(log.find(&ActivityId::from("missing")).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut log = ActivityLog::new();
        log.append(run("a")).unwrap();

        let err = log.append(run("a")).unwrap_err();
        assert!(matches!(err, AppError::DuplicateActivity(_)));
        assert_eq!(log.len(), 1); // Unchanged
    }

    #[test]
    fn test_empty_log() {
        let log = ActivityLog::new();
        assert!(log.is_empty());
        assert!(log.all().is_empty());
        assert_eq!(log.iter().count(), 0);
    }
}
