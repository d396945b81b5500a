// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod log;
pub mod view;

pub use activity::{
    Activity, ActivityDetails, ActivityId, ActivityKind, Coordinates, ExtraField, VariantInput,
};
pub use log::ActivityLog;
pub use view::{FormFields, ListEntry, MarkerView, Notice, NoticeLevel};
