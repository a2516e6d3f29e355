//! Whiteboard configuration.

use crate::canvas::{CanvasError, check_dimensions};
use crate::color::{ColorError, Rgb};
use crate::history::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid color in configuration: {0}")]
    Color(#[from] ColorError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error("history_limit must be at least 1; use null for unbounded history")]
    ZeroHistoryLimit,
}

/// Whiteboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteboardConfig {
    pub width: u32,
    pub height: u32,
    /// Canvas background as `#rrggbb`; also the eraser color.
    pub background: String,
    /// Initial drawing color as `#rrggbb`.
    pub default_color: String,
    /// Maximum undo depth, at least 1; `null` for unbounded.
    pub history_limit: Option<usize>,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Rgb::WHITE.to_hex(),
            default_color: Rgb::BLACK.to_hex(),
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl WhiteboardConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check dimensions, colors and the history limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimensions(self.width, self.height)?;
        if self.history_limit == Some(0) {
            return Err(ConfigError::ZeroHistoryLimit);
        }
        self.background_color()?;
        self.initial_color()?;
        Ok(())
    }

    pub fn background_color(&self) -> Result<Rgb, ColorError> {
        Rgb::from_hex(&self.background)
    }

    pub fn initial_color(&self) -> Result<Rgb, ColorError> {
        Rgb::from_hex(&self.default_color)
    }
}
