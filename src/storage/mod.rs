// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistent key/value storage for the encoded activity log.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Storage key names as constants.
pub mod keys {
    /// Holds the entire encoded activity log.
    pub const ACTIVITIES: &str = "workouts";
}

/// Synchronous key/value storage. Each write replaces the whole value.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key has never been written or was cleared.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Clearing a missing key is not an error.
    fn clear(&self, key: &str) -> Result<()>;
}
