//! Viewer configuration.
//!
//! The generator core keeps nothing on disk. This file only seeds the
//! viewer: starting parameters, an optional RNG seed, the window and the
//! preview output.
//!
//! ```json
//! {
//!   "params": { "count": 50000, "branches": 5, "insideColor": "#ff6030" },
//!   "seed": 42,
//!   "window": { "width": 1280, "height": 720 }
//! }
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color;
use crate::error::ConfigError;
use crate::params::ParameterSet;

/// Window settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Clear color behind the particles.
    #[serde(with = "color::hex")]
    pub background: Vec3,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Galaxy Generator".into(),
            width: 1280,
            height: 720,
            background: Vec3::ZERO,
        }
    }
}

/// Settings for the PNG snapshot written by `--preview` or the `P` key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("galaxy-preview.png"),
            width: 1024,
            height: 1024,
        }
    }
}

/// Complete viewer configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewerConfig {
    /// Parameters of the first generated field.
    pub params: ParameterSet,
    /// Fixed RNG seed. `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,
    pub window: WindowConfig,
    pub preview: PreviewConfig,
}

impl ViewerConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
