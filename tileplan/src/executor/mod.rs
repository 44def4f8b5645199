//! Asynchronous tile decoding.
//!
//! The [`DecodeExecutor`] turns [`LoadRequest`]s into background tasks that
//! read source bytes, decode them into a [`RasterBuffer`](crate::tile::RasterBuffer),
//! store the result on the tile and notify the [`TileSink`](crate::sink::TileSink).
//!
//! Concurrency is bounded by a [`DecodePool`]; every live task is tracked in
//! a [`TaskRegistry`] so a scheduling pass can cancel everything it issued.
//! Blocking work runs through a [`BlockingExecutor`].

mod decode;
mod handle;
mod pool;
mod registry;
mod request;
mod stats;
mod traits;

pub use decode::{DecodeConfig, DecodeExecutor, LoadServices};
pub use handle::{DecodeHandle, DecodeOutcome};
pub use pool::{default_decode_concurrency, DecodePool, FALLBACK_CPU_COUNT};
pub use registry::{TaskId, TaskRegistry};
pub use request::LoadRequest;
pub use stats::{DecodeStats, DecodeStatsSnapshot};
pub use traits::{
    BlockingExecutor, BlockingFuture, ExecutorError, TileLoader, TokioBlockingExecutor,
};
