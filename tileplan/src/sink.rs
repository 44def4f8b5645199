//! Delivery of decoded tiles to the presentation layer.
//!
//! The engine never draws. It reports what became presentable, what was
//! evicted, and when a whole level's surfaces should be dropped.

use tokio::sync::mpsc;

use crate::coord::Coordinate;
use crate::tile::RasterBuffer;

/// Receives tile surface updates. Called from runtime worker threads.
pub trait TileSink: Send + Sync {
    /// A tile on `level` has a payload ready to present.
    fn on_tile_ready(&self, level: usize, coordinate: Coordinate, buffer: RasterBuffer);

    /// A tile on `level` lost its payload to eviction.
    fn on_tile_evicted(&self, _level: usize, _coordinate: Coordinate) {}

    /// Every surface materialized for `level` should be discarded.
    fn on_surfaces_discarded(&self, _level: usize) {}
}

/// Sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TileSink for NullSink {
    fn on_tile_ready(&self, _level: usize, _coordinate: Coordinate, _buffer: RasterBuffer) {}
}

/// One notification forwarded by [`ChannelSink`].
#[derive(Debug, Clone)]
pub enum SurfaceEvent {
    TileReady {
        level: usize,
        coordinate: Coordinate,
        buffer: RasterBuffer,
    },
    TileEvicted {
        level: usize,
        coordinate: Coordinate,
    },
    SurfacesDiscarded {
        level: usize,
    },
}

/// Forwards every notification into an unbounded channel.
///
/// Sends after the receiver is dropped are silently discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SurfaceEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SurfaceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl TileSink for ChannelSink {
    fn on_tile_ready(&self, level: usize, coordinate: Coordinate, buffer: RasterBuffer) {
        let _ = self.tx.send(SurfaceEvent::TileReady {
            level,
            coordinate,
            buffer,
        });
    }

    fn on_tile_evicted(&self, level: usize, coordinate: Coordinate) {
        let _ = self.tx.send(SurfaceEvent::TileEvicted { level, coordinate });
    }

    fn on_surfaces_discarded(&self, level: usize) {
        let _ = self.tx.send(SurfaceEvent::SurfacesDiscarded { level });
    }
}
