use super::MemoryTelemetry;
use std::sync::atomic::{AtomicU32, Ordering};

/// Telemetry that reports whatever ratio was last set.
#[derive(Debug)]
pub struct FixedTelemetry {
    bits: AtomicU32,
}

impl FixedTelemetry {
    pub fn new(ratio: f32) -> Self {
        Self {
            bits: AtomicU32::new(clamp_ratio(ratio).to_bits()),
        }
    }

    pub fn set(&self, ratio: f32) {
        self.bits.store(clamp_ratio(ratio).to_bits(), Ordering::Relaxed);
    }
}

impl Default for FixedTelemetry {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl MemoryTelemetry for FixedTelemetry {
    fn resident_ratio(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}
