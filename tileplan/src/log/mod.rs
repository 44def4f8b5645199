//! Logger abstraction used by the decode path.
//!
//! The decode executor reports per-tile failures through an injected
//! `Arc<dyn Logger>` rather than calling `tracing` directly, so hosts can
//! route tile failures to their own diagnostics and tests can assert on
//! them.
//!
//! - `Logger`: level-tagged sink for formatted messages
//! - `TracingLogger`: forwards to the `tracing` macros
//! - `NoOpLogger`: drops everything
//! - `MemoryLogger`: keeps formatted records in memory
//!
//! ```
//! use tileplan::log::{Logger, MemoryLogger, LogLevel};
//! use tileplan::log_warn;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryLogger::new());
//! let logger: Arc<dyn Logger> = memory.clone();
//! log_warn!(logger, "tile {} failed", 7);
//! assert_eq!(memory.records()[0].level, LogLevel::Warn);
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::{LogRecord, MemoryLogger};
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
