//! Game settings
//!
//! Loaded from an optional JSON file, then overridden by command line flags.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::Field;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    /// Field width in pixels (max 1000)
    pub field_width: i32,
    /// Field height in pixels (max 1000)
    pub field_height: i32,

    // === Simulation ===
    /// Seed for spawn positions and sizes
    pub seed: u64,
    /// Milliseconds between ticks
    pub tick_interval_ms: u64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Ring the terminal bell for sound effects
    pub terminal_bell: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: DEFAULT_FIELD_WIDTH,
            field_height: DEFAULT_FIELD_HEIGHT,

            // Seed 0 keeps runs reproducible
            seed: 0,
            tick_interval_ms: TICK_INTERVAL_MS,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            terminal_bell: true,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let settings = Self::from_json(&json).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validated playing field
    pub fn field(&self) -> Result<Field, ConfigError> {
        Field::new(self.field_width, self.field_height)
    }

    /// Check every value the session relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.field()?;
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval {
                value: self.tick_interval_ms,
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Same settings with the field and tick interval reset to defaults
    pub fn with_default_field(&self) -> Self {
        let defaults = Self::default();
        Self {
            field_width: defaults.field_width,
            field_height: defaults.field_height,
            tick_interval_ms: defaults.tick_interval_ms,
            ..self.clone()
        }
    }
}
