//! Resident-memory telemetry consulted by the eviction policy.
//!
//! - [`SystemMemoryTelemetry`]: whole-host pressure from the kernel
//! - [`PayloadBudgetTelemetry`]: tile payload bytes against a fixed budget
//! - [`FixedTelemetry`]: a settable ratio for hosts that measure elsewhere

mod budget;
mod fixed;
mod system;

pub use budget::PayloadBudgetTelemetry;
pub use fixed::FixedTelemetry;
pub use system::SystemMemoryTelemetry;

/// Read-only source of the resident-memory ratio.
pub trait MemoryTelemetry: Send + Sync {
    /// Used over maximum memory, in `[0.0, 1.0]`.
    fn resident_ratio(&self) -> f32;
}

/// Which built-in telemetry a session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TelemetryKind {
    /// Host memory pressure ([`SystemMemoryTelemetry`])
    System,
    /// Tile payload bytes against a budget ([`PayloadBudgetTelemetry`])
    #[default]
    Budget,
}

impl TelemetryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TelemetryKind::System => "system",
            TelemetryKind::Budget => "budget",
        }
    }
}

impl std::fmt::Display for TelemetryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TelemetryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(TelemetryKind::System),
            "budget" => Ok(TelemetryKind::Budget),
            other => Err(format!("unknown telemetry '{}', expected 'system' or 'budget'", other)),
        }
    }
}
