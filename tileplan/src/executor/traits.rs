//! Seams between the decode path and its execution environment.
//!
//! ```text
//! ┌──────────────────┐  submit(LoadRequest)  ┌─────────────────────────────┐
//! │  LoadScheduler   │──────────────────────▶│  TileLoader                 │
//! └──────────────────┘                       │  • DecodeExecutor           │
//!                                            └──────────────┬──────────────┘
//!                                                           │ execute_blocking
//!                                            ┌──────────────▼──────────────┐
//!                                            │  BlockingExecutor           │
//!                                            │  • TokioBlockingExecutor    │
//!                                            └─────────────────────────────┘
//! ```

use std::future::Future;
use std::pin::Pin;

use super::handle::DecodeHandle;
use super::request::LoadRequest;

// ============================================================================
// Tile Loader Trait
// ============================================================================

/// Accepts load requests and tracks the tasks it spawned.
///
/// Object safe so the scheduler can hold `Arc<dyn TileLoader>`.
pub trait TileLoader: Send + Sync + 'static {
    /// Starts loading one tile. Never blocks.
    fn submit(&self, request: LoadRequest) -> DecodeHandle;

    /// Cancels every live task. Returns how many were signalled.
    fn cancel_all(&self) -> usize;

    /// Number of submitted tasks that have not yet finished.
    fn live_tasks(&self) -> usize;
}

// ============================================================================
// Blocking Executor Trait
// ============================================================================

/// Future returned by [`BlockingExecutor::execute_blocking`].
pub type BlockingFuture<R> = Pin<Box<dyn Future<Output = Result<R, ExecutorError>> + Send>>;

/// Runs blocking work (file reads, image decoding) off the async workers.
pub trait BlockingExecutor: Send + Sync + 'static {
    fn execute_blocking<F, R>(&self, f: F) -> BlockingFuture<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static;
}

/// Failure of the blocking executor itself, not of the work it ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    /// The blocking closure panicked
    TaskPanicked(String),
    /// The runtime is shutting down
    Shutdown,
}

impl std::fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutorError::TaskPanicked(msg) => write!(f, "blocking task panicked: {}", msg),
            ExecutorError::Shutdown => write!(f, "runtime shut down"),
        }
    }
}

impl std::error::Error for ExecutorError {}

/// [`BlockingExecutor`] backed by `tokio::task::spawn_blocking`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioBlockingExecutor;

impl BlockingExecutor for TokioBlockingExecutor {
    fn execute_blocking<F, R>(&self, f: F) -> BlockingFuture<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        Box::pin(async move {
            tokio::task::spawn_blocking(f).await.map_err(|e| {
                if e.is_cancelled() {
                    ExecutorError::Shutdown
                } else {
                    ExecutorError::TaskPanicked(e.to_string())
                }
            })
        })
    }
}

// ============================================================================
// Inline Executor (Test Only)
// ============================================================================

/// Runs "blocking" work immediately on the calling task.
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

#[cfg(test)]
impl BlockingExecutor for InlineExecutor {
    fn execute_blocking<F, R>(&self, f: F) -> BlockingFuture<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let result = f();
        Box::pin(std::future::ready(Ok(result)))
    }
}
