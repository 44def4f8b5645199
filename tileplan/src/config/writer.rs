//! INI serialization: `ConfigFile` → commented INI string.

use super::settings::ConfigFile;
use super::size::format_size;

/// Renders `config` as the commented INI written to config.ini.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[memory]
; Resident memory ratio at which tiles far from the view are evicted (0 < x <= 1, default: 0.75)
eviction_threshold = {}
; How resident memory is measured:
;   budget - decoded tile payloads against payload_budget (default)
;   system - whole-host memory pressure from /proc/meminfo (Linux only)
telemetry = {}
; Payload bytes treated as full when telemetry = budget (default: 512MB)
; Supports: KB, MB, GB suffixes
payload_budget = {}

[decode]
; Tiles read and decoded concurrently (default: number of CPU cores, minimum 1)
max_concurrent = {}

[viewport]
; Initial display size in pixels (default: 1280 x 800)
width = {}
height = {}

[logging]
; Log file, truncated at the start of every session
file = {}
; Force debug logging regardless of RUST_LOG (default: false)
debug = {}
"#,
        config.memory.eviction_threshold,
        config.memory.telemetry,
        format_size(config.memory.payload_budget),
        config.decode.max_concurrent,
        config.viewport.width,
        config.viewport.height,
        config.logging.file.to_string_lossy(),
        config.logging.debug,
    )
}
