//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;

use super::defaults::clamp_max_concurrent;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use super::size::parse_size;

/// Parses an `Ini` into a `ConfigFile`, starting from defaults and
/// overlaying whatever keys are present.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [memory] section
    if let Some(section) = ini.section(Some("memory")) {
        if let Some(v) = section.get("eviction_threshold") {
            let threshold: f32 = v
                .trim()
                .parse()
                .map_err(|_| invalid("memory", "eviction_threshold", v, "must be a number"))?;
            if !(threshold > 0.0 && threshold <= 1.0) {
                return Err(invalid(
                    "memory",
                    "eviction_threshold",
                    v,
                    "must be greater than 0 and at most 1",
                ));
            }
            config.memory.eviction_threshold = threshold;
        }
        if let Some(v) = section.get("telemetry") {
            config.memory.telemetry = v
                .parse()
                .map_err(|_| invalid("memory", "telemetry", v, "must be 'system' or 'budget'"))?;
        }
        if let Some(v) = section.get("payload_budget") {
            config.memory.payload_budget = parse_size(v).map_err(|_| {
                invalid(
                    "memory",
                    "payload_budget",
                    v,
                    "expected format like '512MB' or '2GB'",
                )
            })?;
        }
    }

    // [decode] section
    if let Some(section) = ini.section(Some("decode")) {
        if let Some(v) = section.get("max_concurrent") {
            let value: usize = v
                .trim()
                .parse()
                .map_err(|_| invalid("decode", "max_concurrent", v, "must be a positive integer"))?;
            config.decode.max_concurrent = clamp_max_concurrent(value);
        }
    }

    // [viewport] section
    if let Some(section) = ini.section(Some("viewport")) {
        if let Some(v) = positive_dimension(section, "width")? {
            config.viewport.width = v;
        }
        if let Some(v) = positive_dimension(section, "height")? {
            config.viewport.height = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("debug") {
            config.logging.debug = parse_bool(v);
        }
    }

    Ok(config)
}

fn positive_dimension(section: &Properties, key: &str) -> Result<Option<i32>, ConfigFileError> {
    let Some(v) = section.get(key) else {
        return Ok(None);
    };
    match v.trim().parse::<i32>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(invalid("viewport", key, v, "must be a positive integer (pixels)")),
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parses a boolean. Accepts true/yes/1/on, case-insensitive; anything else is false.
pub(super) fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// Expands a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
