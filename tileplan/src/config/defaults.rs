//! Default values, CPU helpers and clamping for configuration settings.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::telemetry::TelemetryKind;

pub use crate::eviction::DEFAULT_EVICTION_THRESHOLD;
pub use crate::viewer::DEFAULT_PAYLOAD_BUDGET;

/// Default display width in pixels.
pub const DEFAULT_VIEWPORT_WIDTH: i32 = 1280;

/// Default display height in pixels.
pub const DEFAULT_VIEWPORT_HEIGHT: i32 = 800;

/// Log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "tileplan.log";

/// Smallest decode pool.
pub const MIN_DECODE_CONCURRENT: usize = 1;

/// Number of available CPU cores.
pub fn num_cpus() -> usize {
    crate::executor::default_decode_concurrency()
}

/// Default log file: ~/.tileplan/tileplan.log
pub fn default_log_file() -> PathBuf {
    config_directory().join(DEFAULT_LOG_FILE_NAME)
}

/// Raises a zero decode pool to one and logs a warning.
pub(super) fn clamp_max_concurrent(value: usize) -> usize {
    if value < MIN_DECODE_CONCURRENT {
        tracing::warn!(
            requested = value,
            min = MIN_DECODE_CONCURRENT,
            "max_concurrent below minimum, clamping to {}",
            MIN_DECODE_CONCURRENT
        );
        MIN_DECODE_CONCURRENT
    } else {
        value
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            memory: MemorySettings {
                eviction_threshold: DEFAULT_EVICTION_THRESHOLD,
                telemetry: TelemetryKind::default(),
                payload_budget: DEFAULT_PAYLOAD_BUDGET,
            },
            decode: DecodeSettings {
                max_concurrent: num_cpus(),
            },
            viewport: ViewportSettings {
                width: DEFAULT_VIEWPORT_WIDTH,
                height: DEFAULT_VIEWPORT_HEIGHT,
            },
            logging: LoggingSettings {
                file: default_log_file(),
                debug: false,
            },
        }
    }
}
