//! Viewer session settings and collaborators.

use std::sync::Arc;

use tokio::runtime::Handle;

use super::notifier::{LogNotifier, Notifier};
use crate::eviction::DEFAULT_EVICTION_THRESHOLD;
use crate::executor::DecodeConfig;
use crate::log::{Logger, TracingLogger};
use crate::sink::TileSink;
use crate::source::{ImageDecoder, RasterDecoder, SourceProvider};
use crate::telemetry::{MemoryTelemetry, TelemetryKind};

/// Default payload budget for [`TelemetryKind::Budget`]: 512 MB.
pub const DEFAULT_PAYLOAD_BUDGET: usize = 512 * 1024 * 1024;

/// Tunables of a viewer session.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Resident ratio at which tiles start being evicted.
    pub eviction_threshold: f32,
    /// Built-in telemetry used when no custom telemetry is injected.
    pub telemetry: TelemetryKind,
    /// Budget in bytes for [`TelemetryKind::Budget`].
    pub payload_budget: usize,
    pub decode: DecodeConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            eviction_threshold: DEFAULT_EVICTION_THRESHOLD,
            telemetry: TelemetryKind::default(),
            payload_budget: DEFAULT_PAYLOAD_BUDGET,
            decode: DecodeConfig::default(),
        }
    }
}

/// Everything a viewer talks to outside the engine.
#[derive(Clone)]
pub struct ViewerServices {
    pub runtime: Handle,
    pub source: Arc<dyn SourceProvider>,
    pub decoder: Arc<dyn RasterDecoder>,
    pub sink: Arc<dyn TileSink>,
    pub notifier: Arc<dyn Notifier>,
    pub logger: Arc<dyn Logger>,
    /// Overrides the telemetry selected by [`ViewerConfig::telemetry`].
    pub telemetry: Option<Arc<dyn MemoryTelemetry>>,
}

impl ViewerServices {
    /// Services decoding with the `image` crate and reporting through `tracing`.
    pub fn new(runtime: Handle, source: Arc<dyn SourceProvider>, sink: Arc<dyn TileSink>) -> Self {
        Self {
            runtime,
            source,
            decoder: Arc::new(ImageDecoder),
            sink,
            notifier: Arc::new(LogNotifier),
            logger: Arc::new(TracingLogger),
            telemetry: None,
        }
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn RasterDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn MemoryTelemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }
}

impl std::fmt::Debug for ViewerServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerServices")
            .field("custom_telemetry", &self.telemetry.is_some())
            .finish_non_exhaustive()
    }
}
