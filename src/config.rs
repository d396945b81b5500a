//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is read first if present.

use crate::models::Coordinates;
use crate::services::position::parse_position;
use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Directory holding stored activity logs
    pub data_dir: PathBuf,
    /// Storage key for the encoded activity log
    pub storage_key: String,
    /// Map zoom level for the initial view and re-centering
    pub map_zoom: u8,
    /// Position to use instead of waiting for the browser's geolocation
    pub initial_position: Option<Coordinates>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            storage_key: crate::storage::keys::ACTIVITIES.to_string(),
            map_zoom: 13,
            initial_position: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let map_zoom = match env::var("MAP_ZOOM") {
            Ok(v) => v
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|z| *z <= 19)
                .ok_or(ConfigError::Invalid("MAP_ZOOM", v))?,
            Err(_) => 13,
        };

        let initial_position = match env::var("INITIAL_POSITION") {
            Ok(v) if !v.trim().is_empty() => Some(
                parse_position(&v).map_err(|_| ConfigError::Invalid("INITIAL_POSITION", v))?,
            ),
            _ => None,
        };

        let storage_key =
            env::var("STORAGE_KEY").unwrap_or_else(|_| crate::storage::keys::ACTIVITIES.to_string());
        if storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("STORAGE_KEY", storage_key));
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            storage_key,
            map_zoom,
            initial_position,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
