//! TilePlan - lazy tile loading for multi-resolution plan pyramids
//!
//! A plan is a pyramid of tile grids, one per zoom level. The engine keeps
//! only the tiles around the visible viewport decoded, loads them outward
//! from the viewport center in square rings, cancels stale work when the view
//! moves, and evicts far-away tiles under memory pressure.
//!
//! # High-Level API
//!
//! [`viewer::PlanViewer`] is the session entry point:
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use tileplan::coord::Coordinate;
//! use tileplan::pyramid::PlanDescription;
//! use tileplan::sink::NullSink;
//! use tileplan::source::FileSourceProvider;
//! use tileplan::viewer::{PlanViewer, ViewerConfig, ViewerServices};
//! use tileplan::zoom::ZoomDirection;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pyramid = PlanDescription::from_ini_file(Path::new("plan.ini"))?.build()?;
//! let services = ViewerServices::new(
//!     tokio::runtime::Handle::current(),
//!     Arc::new(FileSourceProvider::new()),
//!     Arc::new(NullSink),
//! );
//! let config = ViewerConfig::default();
//! let mut viewer = PlanViewer::new(pyramid, Coordinate::new(1280, 800), services, &config);
//!
//! viewer.load().into_pass().wait().await;
//! viewer.pan(200, 0);
//! viewer.zoom(ZoomDirection::In)?.pass.wait().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coord;
pub mod eviction;
pub mod executor;
pub mod grid;
pub mod log;
pub mod logging;
pub mod pyramid;
pub mod scheduler;
pub mod sink;
pub mod source;
pub mod telemetry;
pub mod tile;
pub mod viewer;
pub mod viewport;
pub mod zoom;

/// Version of the TilePlan library and CLI.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
