//! The decode executor: asynchronous, cancellable, bounded tile loading.

use std::sync::Arc;

use bytes::Bytes;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use super::handle::{DecodeHandle, DecodeOutcome};
use super::pool::{default_decode_concurrency, DecodePool};
use super::registry::{Registration, TaskRegistry};
use super::request::LoadRequest;
use super::stats::{DecodeStats, DecodeStatsSnapshot};
use super::traits::{BlockingExecutor, TileLoader, TokioBlockingExecutor};
use crate::coord::Coordinate;
use crate::grid::TileGrid;
use crate::log::{Logger, NoOpLogger};
use crate::sink::TileSink;
use crate::source::{RasterDecoder, SourceProvider};
use crate::tile::{RasterBuffer, SourceRef, Tile, TileLoadError};
use crate::{log_debug, log_warn};

/// Decode executor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Tiles reading or decoding at once
    pub max_concurrent: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_decode_concurrency(),
        }
    }
}

/// Collaborators every decode task needs.
#[derive(Clone)]
pub struct LoadServices {
    pub source: Arc<dyn SourceProvider>,
    pub decoder: Arc<dyn RasterDecoder>,
    pub sink: Arc<dyn TileSink>,
    pub logger: Arc<dyn Logger>,
}

impl LoadServices {
    /// Services with a logger that discards everything.
    pub fn new(
        source: Arc<dyn SourceProvider>,
        decoder: Arc<dyn RasterDecoder>,
        sink: Arc<dyn TileSink>,
    ) -> Self {
        Self {
            source,
            decoder,
            sink,
            logger: Arc::new(NoOpLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }
}

impl std::fmt::Debug for LoadServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadServices").finish_non_exhaustive()
    }
}

/// Loads tiles in the background with bounded concurrency.
///
/// Each submitted request becomes one task on the runtime. A task:
///
/// 1. returns early if already cancelled or if the tile is already loaded
///    (re-delivering the resident payload to the sink),
/// 2. waits for a decode slot,
/// 3. reads the source bytes and decodes them on the blocking pool,
/// 4. stores the payload unless cancelled in the meantime,
/// 5. hands the payload to the sink.
///
/// Cancellation is checked between every step. A cancelled task never
/// stores a payload and never reaches the sink.
pub struct DecodeExecutor<E: BlockingExecutor = TokioBlockingExecutor> {
    inner: Arc<Inner<E>>,
}

struct Inner<E> {
    runtime: Handle,
    blocking: E,
    services: LoadServices,
    pool: DecodePool,
    registry: Arc<TaskRegistry>,
    stats: DecodeStats,
}

impl DecodeExecutor<TokioBlockingExecutor> {
    pub fn new(runtime: Handle, services: LoadServices, config: DecodeConfig) -> Self {
        Self::with_blocking_executor(runtime, TokioBlockingExecutor, services, config)
    }
}

impl<E: BlockingExecutor> DecodeExecutor<E> {
    pub fn with_blocking_executor(
        runtime: Handle,
        blocking: E,
        services: LoadServices,
        config: DecodeConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                runtime,
                blocking,
                services,
                pool: DecodePool::new(config.max_concurrent),
                registry: Arc::new(TaskRegistry::new()),
                stats: DecodeStats::default(),
            }),
        }
    }

    /// Spawns a load task for `request` and returns immediately.
    pub fn submit(&self, request: LoadRequest) -> DecodeHandle {
        let LoadRequest {
            grid,
            level,
            coordinate,
            cancellation,
        } = request;

        // The guard moves into the task so an unpolled, dropped task still
        // deregisters.
        let registration = Registration::register(
            &self.inner.registry,
            level,
            coordinate,
            cancellation.clone(),
        );
        let (tx, rx) = oneshot::channel();
        let handle = DecodeHandle::new(coordinate, cancellation.clone(), rx);

        let inner = Arc::clone(&self.inner);
        self.inner.runtime.spawn(async move {
            let outcome = inner.load(&grid, level, coordinate, &cancellation).await;
            inner.stats.record(&outcome);
            // Deregister before resolving so waiters observe an empty registry
            drop(registration);
            let _ = tx.send(outcome);
        });

        handle
    }

    /// Signals every live task. Returns how many were signalled.
    pub fn cancel_all(&self) -> usize {
        self.inner.registry.cancel_all()
    }

    /// Tasks submitted but not yet finished.
    pub fn live_tasks(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn max_concurrent(&self) -> usize {
        self.inner.pool.limit()
    }

    pub fn stats(&self) -> DecodeStatsSnapshot {
        self.inner.stats.snapshot()
    }
}

impl<E: BlockingExecutor> Clone for DecodeExecutor<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: BlockingExecutor> std::fmt::Debug for DecodeExecutor<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeExecutor")
            .field("max_concurrent", &self.inner.pool.limit())
            .field("live_tasks", &self.inner.registry.len())
            .finish()
    }
}

impl<E: BlockingExecutor> TileLoader for DecodeExecutor<E> {
    fn submit(&self, request: LoadRequest) -> DecodeHandle {
        DecodeExecutor::submit(self, request)
    }

    fn cancel_all(&self) -> usize {
        DecodeExecutor::cancel_all(self)
    }

    fn live_tasks(&self) -> usize {
        DecodeExecutor::live_tasks(self)
    }
}

fn resident(tile: &Tile) -> Option<RasterBuffer> {
    tile.payload().filter(|buffer| !buffer.is_empty())
}

impl<E: BlockingExecutor> Inner<E> {
    async fn load(
        &self,
        grid: &TileGrid,
        level: usize,
        coordinate: Coordinate,
        cancellation: &CancellationToken,
    ) -> DecodeOutcome {
        if cancellation.is_cancelled() {
            return DecodeOutcome::Cancelled;
        }

        let Some(tile) = grid.tile(coordinate) else {
            let error = TileLoadError::OutOfRange {
                coordinate,
                dimension: grid.dimension(),
            };
            return self.fail(level, coordinate, error);
        };

        if let Some(buffer) = resident(tile) {
            self.services.sink.on_tile_ready(level, coordinate, buffer.clone());
            return DecodeOutcome::AlreadyLoaded(buffer);
        }

        let Some(_permit) = self.pool.acquire(cancellation).await else {
            return DecodeOutcome::Cancelled;
        };
        if cancellation.is_cancelled() {
            return DecodeOutcome::Cancelled;
        }

        // Another task may have filled the tile while we waited for a slot
        if let Some(buffer) = resident(tile) {
            self.services.sink.on_tile_ready(level, coordinate, buffer.clone());
            return DecodeOutcome::AlreadyLoaded(buffer);
        }

        let source_ref = tile.source().clone();
        let bytes = match self.read(&source_ref).await {
            Ok(bytes) => bytes,
            Err(error) => return self.fail(level, coordinate, error),
        };
        if cancellation.is_cancelled() {
            return DecodeOutcome::Cancelled;
        }

        let buffer = match self.decode(&source_ref, bytes).await {
            Ok(buffer) => buffer,
            Err(error) => return self.fail(level, coordinate, error),
        };

        if !tile.store_unless_cancelled(buffer.clone(), cancellation) {
            return DecodeOutcome::Cancelled;
        }

        log_debug!(
            self.services.logger,
            "Loaded tile {} on level {} ({}x{})",
            coordinate,
            level,
            buffer.width(),
            buffer.height()
        );

        if !cancellation.is_cancelled() {
            self.services.sink.on_tile_ready(level, coordinate, buffer.clone());
        }
        DecodeOutcome::Loaded(buffer)
    }

    async fn read(&self, source_ref: &SourceRef) -> Result<Bytes, TileLoadError> {
        let source = Arc::clone(&self.services.source);
        let target = source_ref.clone();
        match self.blocking.execute_blocking(move || source.read_bytes(&target)).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(error)) => Err(TileLoadError::Io {
                source_ref: source_ref.clone(),
                error,
            }),
            Err(e) => Err(TileLoadError::Aborted {
                source_ref: source_ref.clone(),
                reason: e.to_string(),
            }),
        }
    }

    async fn decode(
        &self,
        source_ref: &SourceRef,
        bytes: Bytes,
    ) -> Result<RasterBuffer, TileLoadError> {
        let decoder = Arc::clone(&self.services.decoder);
        match self.blocking.execute_blocking(move || decoder.decode(&bytes)).await {
            Ok(Ok(buffer)) => Ok(buffer),
            Ok(Err(error)) => Err(TileLoadError::Decode {
                source_ref: source_ref.clone(),
                reason: error.reason().to_string(),
            }),
            Err(e) => Err(TileLoadError::Aborted {
                source_ref: source_ref.clone(),
                reason: e.to_string(),
            }),
        }
    }

    fn fail(&self, level: usize, coordinate: Coordinate, error: TileLoadError) -> DecodeOutcome {
        log_warn!(
            self.services.logger,
            "Failed to load tile {} on level {}: {}",
            coordinate,
            level,
            error
        );
        DecodeOutcome::Failed(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::traits::InlineExecutor;
    use crate::log::{LogLevel, MemoryLogger};
    use crate::sink::{ChannelSink, NullSink, SurfaceEvent};
    use crate::source::{DecodeError, ImageDecoder, MemorySourceProvider};
    use image::{ImageFormat, RgbaImage};
    use parking_lot::Mutex;
    use std::io::{self, Cursor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn png(width: u32, height: u32) -> Bytes {
        let mut out = Cursor::new(Vec::new());
        RgbaImage::new(width, height)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        Bytes::from(out.into_inner())
    }

    fn grid() -> Arc<TileGrid> {
        Arc::new(
            TileGrid::from_sources(Coordinate::new(3, 3), Coordinate::new(4, 4), 1.0, |c| {
                SourceRef::new(format!("{}_{}.png", c.x, c.y))
            })
            .unwrap(),
        )
    }

    fn provider_for(grid: &TileGrid) -> Arc<MemorySourceProvider> {
        let provider = Arc::new(MemorySourceProvider::new());
        for (_, tile) in grid.tiles() {
            provider.insert(tile.source().clone(), png(4, 4));
        }
        provider
    }

    fn image_services(grid: &TileGrid, sink: Arc<dyn TileSink>) -> LoadServices {
        LoadServices::new(provider_for(grid), Arc::new(ImageDecoder), sink)
    }

    fn request(grid: &Arc<TileGrid>, x: i32, y: i32) -> LoadRequest {
        LoadRequest::new(Arc::clone(grid), 0, Coordinate::new(x, y), CancellationToken::new())
    }

    /// Decoder that counts calls and delegates to the image decoder.
    #[derive(Default)]
    struct CountingDecoder {
        calls: AtomicUsize,
    }

    impl RasterDecoder for CountingDecoder {
        fn decode(&self, bytes: &Bytes) -> Result<RasterBuffer, DecodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ImageDecoder.decode(bytes)
        }
    }

    /// Source that blocks until released, to hold tasks mid-read.
    struct GatedSource {
        inner: Arc<MemorySourceProvider>,
        gate: Arc<Mutex<()>>,
    }

    impl SourceProvider for GatedSource {
        fn read_bytes(&self, source: &SourceRef) -> io::Result<Bytes> {
            let _open = self.gate.lock();
            self.inner.read_bytes(source)
        }
    }

    #[tokio::test]
    async fn test_loads_and_delivers_tile() {
        let grid = grid();
        let (sink, mut events) = ChannelSink::new();
        let services = image_services(&grid, Arc::new(sink));
        let executor = DecodeExecutor::new(Handle::current(), services, DecodeConfig::default());

        let outcome = executor.submit(request(&grid, 1, 2)).wait().await;

        assert!(matches!(outcome, DecodeOutcome::Loaded(_)));
        assert!(grid.tile(Coordinate::new(1, 2)).unwrap().is_loaded());
        match events.recv().await.unwrap() {
            SurfaceEvent::TileReady { level, coordinate, buffer } => {
                assert_eq!(level, 0);
                assert_eq!(coordinate, Coordinate::new(1, 2));
                assert_eq!((buffer.width(), buffer.height()), (4, 4));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(executor.live_tasks(), 0);
        assert_eq!(executor.stats().decoded, 1);
    }

    #[tokio::test]
    async fn test_already_loaded_tile_is_not_decoded_again() {
        let grid = grid();
        let decoder = Arc::new(CountingDecoder::default());
        let services = LoadServices::new(provider_for(&grid), decoder.clone(), Arc::new(NullSink));
        let executor = DecodeExecutor::with_blocking_executor(
            Handle::current(),
            InlineExecutor,
            services,
            DecodeConfig::default(),
        );

        let first = executor.submit(request(&grid, 0, 0)).wait().await;
        let second = executor.submit(request(&grid, 0, 0)).wait().await;

        assert!(matches!(second, DecodeOutcome::AlreadyLoaded(_)));
        assert!(first.payload().unwrap().ptr_eq(second.payload().unwrap()));
        assert_eq!(decoder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(executor.stats().reused, 1);
    }

    #[tokio::test]
    async fn test_already_loaded_tile_is_redelivered() {
        let grid = grid();
        let (sink, mut events) = ChannelSink::new();
        let services = image_services(&grid, Arc::new(sink));
        let executor = DecodeExecutor::new(Handle::current(), services, DecodeConfig::default());

        executor.submit(request(&grid, 2, 2)).wait().await;
        executor.submit(request(&grid, 2, 2)).wait().await;

        let mut ready = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event, SurfaceEvent::TileReady { .. }) {
                ready += 1;
            }
        }
        assert_eq!(ready, 2);
    }

    #[tokio::test]
    async fn test_missing_source_fails_and_logs() {
        let grid = grid();
        let logger = Arc::new(MemoryLogger::new());
        let services = LoadServices::new(
            Arc::new(MemorySourceProvider::new()),
            Arc::new(ImageDecoder),
            Arc::new(NullSink),
        )
        .with_logger(logger.clone());
        let executor = DecodeExecutor::new(Handle::current(), services, DecodeConfig::default());

        let outcome = executor.submit(request(&grid, 1, 1)).wait().await;

        match outcome {
            DecodeOutcome::Failed(error) => assert_eq!(error.kind(), "io"),
            other => panic!("expected failure, got {}", other),
        }
        assert!(!grid.tile(Coordinate::new(1, 1)).unwrap().is_loaded());
        let warnings = logger.messages_at(LogLevel::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("(1, 1)"));
        assert_eq!(executor.stats().failed, 1);
    }

    #[tokio::test]
    async fn test_corrupt_bytes_fail_decode() {
        let grid = grid();
        let provider = Arc::new(MemorySourceProvider::new());
        provider.insert("0_0.png", Bytes::from_static(b"not an image"));
        let services = LoadServices::new(provider, Arc::new(ImageDecoder), Arc::new(NullSink));
        let executor = DecodeExecutor::new(Handle::current(), services, DecodeConfig::default());

        let outcome = executor.submit(request(&grid, 0, 0)).wait().await;

        assert!(matches!(outcome, DecodeOutcome::Failed(TileLoadError::Decode { .. })));
        assert!(!grid.tile(Coordinate::ZERO).unwrap().is_loaded());
    }

    #[tokio::test]
    async fn test_out_of_range_coordinate_fails() {
        let grid = grid();
        let services = image_services(&grid, Arc::new(NullSink));
        let executor = DecodeExecutor::new(Handle::current(), services, DecodeConfig::default());

        let outcome = executor.submit(request(&grid, 5, 0)).wait().await;

        assert!(matches!(outcome, DecodeOutcome::Failed(TileLoadError::OutOfRange { .. })));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_does_nothing() {
        let grid = grid();
        let decoder = Arc::new(CountingDecoder::default());
        let (sink, mut events) = ChannelSink::new();
        let services = LoadServices::new(provider_for(&grid), decoder.clone(), Arc::new(sink));
        let executor = DecodeExecutor::new(Handle::current(), services, DecodeConfig::default());

        let req = request(&grid, 0, 1);
        req.cancellation.cancel();
        let outcome = executor.submit(req).wait().await;

        assert!(outcome.is_cancelled());
        assert_eq!(decoder.calls.load(Ordering::SeqCst), 0);
        assert!(!grid.tile(Coordinate::new(0, 1)).unwrap().is_loaded());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancel_all_stops_in_flight_tasks() {
        let grid = grid();
        let gate = Arc::new(Mutex::new(()));
        let source = GatedSource {
            inner: provider_for(&grid),
            gate: Arc::clone(&gate),
        };
        let (sink, mut events) = ChannelSink::new();
        let services = LoadServices::new(Arc::new(source), Arc::new(ImageDecoder), Arc::new(sink));
        let config = DecodeConfig { max_concurrent: 1 };
        let executor = DecodeExecutor::new(Handle::current(), services, config);

        let closed = gate.lock();
        let handles: Vec<_> = (0..3).map(|x| executor.submit(request(&grid, x, 0))).collect();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(executor.cancel_all(), 3);
        drop(closed);

        for handle in handles {
            assert!(handle.wait().await.is_cancelled());
        }
        assert_eq!(grid.loaded_count(), 0);
        assert!(events.try_recv().is_err());
        assert_eq!(executor.live_tasks(), 0);
    }

    #[tokio::test]
    async fn test_cancelling_one_handle_leaves_others() {
        let grid = grid();
        let services = image_services(&grid, Arc::new(NullSink));
        let executor = DecodeExecutor::new(Handle::current(), services, DecodeConfig::default());

        let kept = executor.submit(request(&grid, 0, 0));
        let dropped = executor.submit(request(&grid, 1, 0));
        dropped.cancel();

        assert!(kept.wait().await.is_success());
        let dropped_outcome = dropped.wait().await;
        let dropped_loaded = grid.tile(Coordinate::new(1, 0)).unwrap().is_loaded();
        assert!(dropped_outcome.is_cancelled() || dropped_loaded);
    }

    #[test]
    fn test_task_dropped_before_first_poll_deregisters() {
        let grid = grid();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let services = image_services(&grid, Arc::new(NullSink));
        let handle = runtime.handle().clone();
        let executor = DecodeExecutor::new(handle, services, DecodeConfig::default());

        let handles: Vec<_> = (0..3).map(|x| executor.submit(request(&grid, x, 0))).collect();
        assert_eq!(executor.live_tasks(), 3);

        // Shutting the runtime down drops the spawned tasks without polling them.
        drop(runtime);

        assert_eq!(executor.live_tasks(), 0);
        assert_eq!(grid.loaded_count(), 0);
        let waiter = tokio::runtime::Builder::new_current_thread().build().unwrap();
        for handle in handles {
            assert!(waiter.block_on(handle.wait()).is_cancelled());
        }
    }

    #[test]
    fn test_zero_concurrency_is_raised() {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let services = LoadServices::new(
            Arc::new(MemorySourceProvider::new()),
            Arc::new(ImageDecoder),
            Arc::new(NullSink),
        );
        let config = DecodeConfig { max_concurrent: 0 };
        let executor = DecodeExecutor::new(runtime.handle().clone(), services, config);
        assert_eq!(executor.max_concurrent(), 1);
    }
}
