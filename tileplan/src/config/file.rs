//! Configuration file handling for ~/.tileplan/config.ini.
//!
//! Settings structs live in [`super::settings`], constants in
//! [`super::defaults`], parsing in [`super::parser`] and serialization in
//! [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;
use crate::coord::Coordinate;
use crate::executor::DecodeConfig;
use crate::viewer::ViewerConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Loads from the default path. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Loads from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Saves to the default path.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Saves to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }
        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Writes a default config file if none exists. Returns its path.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// Initial viewport size.
    pub fn viewport_size(&self) -> Coordinate {
        Coordinate::new(self.viewport.width, self.viewport.height)
    }

    /// Session tunables derived from `[memory]` and `[decode]`.
    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            eviction_threshold: self.memory.eviction_threshold,
            telemetry: self.memory.telemetry,
            payload_budget: self.memory.payload_budget,
            decode: DecodeConfig {
                max_concurrent: self.decode.max_concurrent,
            },
        }
    }
}

/// Config directory (~/.tileplan).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tileplan")
}

/// Config file (~/.tileplan/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::TelemetryKind;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp_dir.path().join("missing.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.memory.eviction_threshold = 0.6;
        config.memory.telemetry = TelemetryKind::System;
        config.memory.payload_budget = 256 * 1024 * 1024;
        config.decode.max_concurrent = 3;
        config.viewport.width = 1024;
        config.viewport.height = 768;
        config.logging.file = temp_dir.path().join("session.log");
        config.logging.debug = true;
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_viewer_config_mapping() {
        let mut config = ConfigFile::default();
        config.decode.max_concurrent = 2;
        config.memory.eviction_threshold = 0.5;

        let viewer = config.viewer_config();
        assert_eq!(viewer.decode.max_concurrent, 2);
        assert_eq!(viewer.eviction_threshold, 0.5);
        assert_eq!(config.viewport_size(), Coordinate::new(1280, 800));
    }

    #[test]
    fn test_default_paths() {
        assert!(config_file_path().ends_with(".tileplan/config.ini"));
    }
}
