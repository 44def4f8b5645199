//! Host memory pressure.

use super::MemoryTelemetry;

/// Reports `1 - MemAvailable / MemTotal` for the host.
///
/// # Platform Support
///
/// - **Linux**: Parses `/proc/meminfo` on every call
/// - **Other platforms**: Always reports 0.0, so eviction never triggers
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMemoryTelemetry;

impl SystemMemoryTelemetry {
    pub fn new() -> Self {
        Self
    }
}

impl MemoryTelemetry for SystemMemoryTelemetry {
    #[cfg(target_os = "linux")]
    fn resident_ratio(&self) -> f32 {
        std::fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|content| parse_meminfo(&content))
            .unwrap_or(0.0)
    }

    #[cfg(not(target_os = "linux"))]
    fn resident_ratio(&self) -> f32 {
        0.0
    }
}

/// Extracts the used ratio from `/proc/meminfo` text.
///
/// Format: `"MemTotal:       16384000 kB"`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_meminfo(content: &str) -> Option<f32> {
    let mut total = None;
    let mut available = None;
    for line in content.lines() {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("MemTotal:") => total = parts.next().and_then(|v| v.parse::<u64>().ok()),
            Some("MemAvailable:") => available = parts.next().and_then(|v| v.parse::<u64>().ok()),
            _ => {}
        }
    }
    let total = total.filter(|t| *t > 0)?;
    let available = available?.min(total);
    Some(1.0 - (available as f64 / total as f64) as f32)
}
