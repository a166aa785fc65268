/// Persisted settings for the grid layout and the preheat policy
///
/// Settings are serialized to JSON and stored in the user's config
/// directory. A missing file means "use the defaults", which reproduce
/// the classic four-column photo grid and the 2x preheat window.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::SettingsError;

/// Grid geometry used to lay out thumbnails
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GridSettings {
    /// Number of thumbnails per row
    pub columns: usize,

    /// Subtracted from `width / columns` to get the cell side
    pub padding: f64,

    /// Space above the first row
    pub top_inset: f64,

    /// Vertical space between rows
    pub line_spacing: f64,

    /// Horizontal space between cells in a row
    pub interitem_spacing: f64,

    /// Pixels per point; thumbnails are requested at cell size times this
    pub screen_scale: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            columns: 4,
            padding: 3.0,
            top_inset: 10.0,
            line_spacing: 2.0,
            interitem_spacing: 1.0,
            screen_scale: 2.0,
        }
    }
}

/// How far the preheat window reaches and how often it is recomputed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PreheatSettings {
    /// Fraction of the visible height added above and below
    /// - 0.5 = window twice the visible height
    pub expansion: f64,

    /// Recompute only once the window centre moves more than
    /// `visible height / damping_divisor`
    /// - 0.0 or less = recompute on every move
    pub damping_divisor: f64,
}

impl Default for PreheatSettings {
    fn default() -> Self {
        Self {
            expansion: 0.5,
            damping_divisor: 3.0,
        }
    }
}

impl PreheatSettings {
    /// Minimum centre movement before the window is recomputed
    pub fn threshold(&self, visible_height: f64) -> f64 {
        if self.damping_divisor > 0.0 {
            visible_height / self.damping_divisor
        } else {
            0.0
        }
    }
}

/// All persisted settings
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub grid: GridSettings,
    pub preheat: PreheatSettings,
}

impl Settings {
    /// Convert to JSON string for storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get the path where settings are stored
    /// - Linux: ~/.config/photo-preheat/settings.json
    /// - macOS: ~/Library/Application Support/photo-preheat/settings.json
    /// - Windows: %APPDATA%\photo-preheat\settings.json
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let mut path = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        path.push("photo-preheat");
        path.push("settings.json");
        Ok(path)
    }

    /// Load from the default location
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Save to the default location
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::default_path()?)
    }

    /// Load from `path`, returning defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    /// Save to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "settings saved");
        Ok(())
    }
}
