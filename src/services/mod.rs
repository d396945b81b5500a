// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session logic and its collaborators.

pub mod codec;
pub mod controller;
pub mod export;
pub mod position;
pub mod view;

pub use controller::{
    FormState, SelectOutcome, Session, SessionConfig, SessionController, SessionSnapshot,
    SessionState, SubmitOutcome,
};
pub use position::{FixedPosition, PositionSource, UnavailablePosition};
pub use view::{CommandQueue, ListView, MapHandle, MapView, SessionView, ViewCommand};
