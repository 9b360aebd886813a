//! Configuration file support for the polygon edit tool.
//!
//! This module provides serialization and deserialization of editing settings
//! (erase radius, modifier bindings, undo depth and log verbosity).

use serde::{Deserialize, Serialize};

use crate::viewer::Modifiers;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// A modifier key that can arm an edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

impl ModifierKey {
    /// Whether this key is held in `modifiers`.
    pub fn is_held(&self, modifiers: &Modifiers) -> bool {
        match self {
            ModifierKey::Shift => modifiers.shift,
            ModifierKey::Ctrl => modifiers.ctrl,
            ModifierKey::Alt => modifiers.alt,
            ModifierKey::Meta => modifiers.meta,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Distance (image units) under which the eraser removes the nearest vertex.
pub const DEFAULT_ERASE_RADIUS: f64 = 5.0;

/// Default number of edits kept in undo history.
pub const DEFAULT_MAX_UNDO_HISTORY: usize = 100;

/// Polygon editing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Removal only happens strictly below this distance
    #[serde(default = "default_erase_radius")]
    pub erase_radius: f64,

    /// Modifier that arms the vertex eraser
    #[serde(default = "default_eraser_modifier")]
    pub eraser_modifier: ModifierKey,

    /// Modifier that arms vertex insertion
    #[serde(default = "default_insert_modifier")]
    pub insert_modifier: ModifierKey,

    /// Maximum number of ROI edits kept for undo
    #[serde(default = "default_max_undo_history")]
    pub max_undo_history: usize,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_erase_radius() -> f64 {
    DEFAULT_ERASE_RADIUS
}

fn default_eraser_modifier() -> ModifierKey {
    ModifierKey::Shift
}

fn default_insert_modifier() -> ModifierKey {
    ModifierKey::Alt
}

fn default_max_undo_history() -> usize {
    DEFAULT_MAX_UNDO_HISTORY
}

impl EditConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            erase_radius: default_erase_radius(),
            eraser_modifier: default_eraser_modifier(),
            insert_modifier: default_insert_modifier(),
            max_undo_history: default_max_undo_history(),
            log_level: LogLevel::default(),
        }
    }

    /// Check values that serde alone can't enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: self.version,
                supported_version: CONFIG_VERSION,
            });
        }
        if !self.erase_radius.is_finite() || self.erase_radius <= 0.0 {
            return Err(ConfigError::InvalidEraseRadius(self.erase_radius));
        }
        if self.eraser_modifier == self.insert_modifier {
            return Err(ConfigError::ConflictingModifiers(self.eraser_modifier));
        }
        Ok(())
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "polyedit-config.json"
    }

    /// Get the default config file path for auto-load/save.
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("polyedit").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("polyedit")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }
}

impl Default for EditConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than \
         supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// Erase radius must be a positive, finite distance
    #[error("Invalid erase radius: {0}")]
    InvalidEraseRadius(f64),

    /// Eraser and insert mode bound to the same key
    #[error("Eraser and insert modes are both bound to {0:?}")]
    ConflictingModifiers(ModifierKey),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
