//! Decode task handles and outcomes.

use std::fmt;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::coord::Coordinate;
use crate::tile::{RasterBuffer, TileLoadError};

/// How a decode task ended.
#[derive(Debug)]
pub enum DecodeOutcome {
    /// Bytes were read, decoded and stored on the tile
    Loaded(RasterBuffer),
    /// The tile already held a payload; nothing was read or decoded
    AlreadyLoaded(RasterBuffer),
    /// Read or decode failed; the tile stays unloaded
    Failed(TileLoadError),
    /// Superseded before completion; nothing was stored or delivered
    Cancelled,
}

impl DecodeOutcome {
    /// The payload now resident on the tile, if any.
    pub fn payload(&self) -> Option<&RasterBuffer> {
        match self {
            Self::Loaded(buffer) | Self::AlreadyLoaded(buffer) => Some(buffer),
            Self::Failed(_) | Self::Cancelled => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.payload().is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded(_) => "loaded",
            Self::AlreadyLoaded(_) => "already_loaded",
            Self::Failed(_) => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DecodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(error) => write!(f, "failed: {}", error),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Handle to one submitted decode task.
///
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct DecodeHandle {
    coordinate: Coordinate,
    cancellation: CancellationToken,
    outcome: oneshot::Receiver<DecodeOutcome>,
}

impl DecodeHandle {
    pub(crate) fn new(
        coordinate: Coordinate,
        cancellation: CancellationToken,
        outcome: oneshot::Receiver<DecodeOutcome>,
    ) -> Self {
        Self {
            coordinate,
            cancellation,
            outcome,
        }
    }

    /// A handle that is already resolved, for loaders that finish synchronously.
    pub fn ready(
        coordinate: Coordinate,
        cancellation: CancellationToken,
        outcome: DecodeOutcome,
    ) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(outcome);
        Self::new(coordinate, cancellation, rx)
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Requests cancellation of this task only.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Waits for the task to finish.
    ///
    /// A task that vanished without reporting (runtime shutdown) counts as cancelled.
    pub async fn wait(self) -> DecodeOutcome {
        self.outcome.await.unwrap_or(DecodeOutcome::Cancelled)
    }
}
