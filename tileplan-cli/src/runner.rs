//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, the async runtime
//! and viewer construction so command handlers stay small.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tileplan::config::ConfigFile;
use tileplan::logging::{init_logging, LoggingGuard, LoggingOptions};
use tileplan::pyramid::{PlanDescription, Pyramid};
use tileplan::sink::TileSink;
use tileplan::source::FileSourceProvider;
use tileplan::viewer::{Notifier, PlanViewer, ViewerServices};
use tokio::runtime::Runtime;
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Loads configuration, initializes file logging and starts the runtime.
    ///
    /// `config_path` overrides ~/.tileplan/config.ini. `debug` forces debug
    /// logging in addition to the config's own switch.
    pub fn new(config_path: Option<&Path>, debug: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        // Command output goes to stdout, so log records only mirror there in debug mode
        let options = LoggingOptions {
            stdout: debug,
            debug: debug || config.logging.debug,
        };
        let logging_guard = init_logging(&config.logging.file, options)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("tileplan-worker")
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            logging_guard,
            config,
            runtime,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("TilePlan v{}", tileplan::VERSION);
        info!("TilePlan CLI: {} command", command);
    }

    /// Parses and builds the plan at `path`.
    pub fn load_plan(&self, path: &Path) -> Result<Pyramid, CliError> {
        let plan_error = |error| CliError::Plan {
            path: path.display().to_string(),
            error,
        };
        let description = PlanDescription::from_ini_file(path).map_err(plan_error)?;
        let pyramid = description.build().map_err(plan_error)?;
        info!(
            plan = %path.display(),
            levels = pyramid.level_count(),
            markers = pyramid.markers().len(),
            "Plan loaded"
        );
        Ok(pyramid)
    }

    /// Creates a viewer reading tiles from the filesystem.
    pub fn create_viewer(
        &self,
        pyramid: Pyramid,
        viewport_size: tileplan::coord::Coordinate,
        sink: Arc<dyn TileSink>,
        notifier: Arc<dyn Notifier>,
    ) -> PlanViewer {
        let services = ViewerServices::new(
            self.runtime.handle().clone(),
            Arc::new(FileSourceProvider::new()),
            sink,
        )
        .with_notifier(notifier);
        PlanViewer::new(pyramid, viewport_size, services, &self.config.viewer_config())
    }

    /// Runs a future to completion on the runner's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}
