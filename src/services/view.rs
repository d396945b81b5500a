// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rendering collaborators: the map surface and the list/form widgets.
//!
//! The controller only talks to these traits. `CommandQueue` implements both
//! by recording serializable commands, which the HTTP layer hands to the
//! browser to apply.

use crate::models::{ActivityKind, Coordinates, ExtraField, ListEntry, MarkerView, Notice};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Opaque handle to an initialized map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapHandle(pub u64);

/// Interactive map surface.
pub trait MapView {
    fn initialize(&mut self, center: Coordinates, zoom: u8) -> MapHandle;
    fn place_marker(&mut self, map: &MapHandle, marker: &MarkerView);
    fn pan_to(&mut self, map: &MapHandle, coordinates: Coordinates, zoom: u8);
}

/// Activity list, input form and notifications.
pub trait ListView {
    fn render_entry(&mut self, entry: &ListEntry);
    /// Show the form with the field relevant to `kind` visible.
    fn show_form(&mut self, kind: ActivityKind);
    /// Hide the form and clear its inputs.
    fn hide_form(&mut self);
    fn notify(&mut self, notice: &Notice);
}

/// Everything the session controller renders to.
pub trait SessionView: MapView + ListView {}

impl<T: MapView + ListView> SessionView for T {}

/// One rendering instruction for the front end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ViewCommand {
    InitializeMap {
        #[cfg_attr(feature = "binding-generation", ts(type = "[number, number]"))]
        center: Coordinates,
        zoom: u8,
    },
    PlaceMarker {
        marker: MarkerView,
    },
    PanTo {
        #[cfg_attr(feature = "binding-generation", ts(type = "[number, number]"))]
        coordinates: Coordinates,
        zoom: u8,
    },
    RenderEntry {
        entry: ListEntry,
    },
    ShowForm {
        kind: ActivityKind,
        extra_field: ExtraField,
    },
    HideForm,
    Notify {
        notice: Notice,
    },
}

/// View that records commands instead of drawing.
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<ViewCommand>,
    next_handle: u64,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all queued commands, oldest first.
    pub fn drain(&mut self) -> Vec<ViewCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Commands queued so far, without draining.
    pub fn commands(&self) -> &[ViewCommand] {
        &self.commands
    }
}

impl MapView for CommandQueue {
    fn initialize(&mut self, center: Coordinates, zoom: u8) -> MapHandle {
        self.next_handle += 1;
        self.commands.push(ViewCommand::InitializeMap { center, zoom });
        MapHandle(self.next_handle)
    }

    fn place_marker(&mut self, _map: &MapHandle, marker: &MarkerView) {
        self.commands.push(ViewCommand::PlaceMarker {
            marker: marker.clone(),
        });
    }

    fn pan_to(&mut self, _map: &MapHandle, coordinates: Coordinates, zoom: u8) {
        self.commands.push(ViewCommand::PanTo { coordinates, zoom });
    }
}

impl ListView for CommandQueue {
    fn render_entry(&mut self, entry: &ListEntry) {
        self.commands.push(ViewCommand::RenderEntry {
            entry: entry.clone(),
        });
    }

    fn show_form(&mut self, kind: ActivityKind) {
        self.commands.push(ViewCommand::ShowForm {
            kind,
            extra_field: kind.extra_field(),
        });
    }

    fn hide_form(&mut self) {
        self.commands.push(ViewCommand::HideForm);
    }

    fn notify(&mut self, notice: &Notice) {
        self.commands.push(ViewCommand::Notify {
            notice: notice.clone(),
        });
    }
}
