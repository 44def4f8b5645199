//! Settings structs, one per `[section]` of the INI file.

use std::path::PathBuf;

use crate::telemetry::TelemetryKind;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub memory: MemorySettings,
    pub decode: DecodeSettings,
    pub viewport: ViewportSettings,
    pub logging: LoggingSettings,
}

/// `[memory]`: eviction trigger and telemetry.
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySettings {
    /// Resident ratio in (0, 1] at which eviction starts
    pub eviction_threshold: f32,
    pub telemetry: TelemetryKind,
    /// Payload bytes that count as fully resident for budget telemetry
    pub payload_budget: usize,
}

/// `[decode]`: decode pool sizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeSettings {
    pub max_concurrent: usize,
}

/// `[viewport]`: initial display size in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportSettings {
    pub width: i32,
    pub height: i32,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file, truncated at session start
    pub file: PathBuf,
    /// Forces debug level regardless of RUST_LOG
    pub debug: bool,
}
