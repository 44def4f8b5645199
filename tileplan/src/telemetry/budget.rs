//! Payload-budget telemetry.

use super::MemoryTelemetry;
use crate::grid::TileGrid;
use std::sync::Arc;

/// Reports resident tile payload bytes across a set of grids divided by a
/// fixed byte budget, capped at 1.0.
#[derive(Debug)]
pub struct PayloadBudgetTelemetry {
    grids: Vec<Arc<TileGrid>>,
    budget: usize,
}

impl PayloadBudgetTelemetry {
    /// A zero budget is treated as one byte, so any resident payload reads as full.
    pub fn new(grids: Vec<Arc<TileGrid>>, budget: usize) -> Self {
        Self {
            grids,
            budget: budget.max(1),
        }
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn resident_bytes(&self) -> usize {
        self.grids.iter().map(|g| g.resident_bytes()).sum()
    }
}

impl MemoryTelemetry for PayloadBudgetTelemetry {
    fn resident_ratio(&self) -> f32 {
        (self.resident_bytes() as f64 / self.budget as f64).min(1.0) as f32
    }
}
