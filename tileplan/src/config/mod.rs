//! INI configuration for tileplan sessions.
//!
//! ```ini
//! [memory]
//! eviction_threshold = 0.75
//! telemetry = budget
//! payload_budget = 512MB
//!
//! [decode]
//! max_concurrent = 8
//!
//! [viewport]
//! width = 1280
//! height = 800
//!
//! [logging]
//! file = ~/.tileplan/tileplan.log
//! debug = false
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod size;
mod writer;

pub use defaults::{
    default_log_file, num_cpus, DEFAULT_EVICTION_THRESHOLD, DEFAULT_LOG_FILE_NAME,
    DEFAULT_PAYLOAD_BUDGET, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, MIN_DECODE_CONCURRENT,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use parser::expand_tilde;
pub use settings::{ConfigFile, DecodeSettings, LoggingSettings, MemorySettings, ViewportSettings};
pub use size::{format_size, parse_size, Size, SizeParseError};
