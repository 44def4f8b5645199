//! Tiles and their raster payloads.
//!
//! A [`Tile`] is one cell of a [`TileGrid`](crate::grid::TileGrid). Its size and
//! source never change after construction; its payload moves between empty
//! and loaded as decode tasks complete and the eviction policy reclaims
//! memory.
//!
//! The payload slot is owned by the tile alone. Readers receive cheap
//! [`RasterBuffer`] clones and never hold the slot itself.

mod error;
mod raster;
mod source_ref;

pub use error::TileLoadError;
pub use raster::RasterBuffer;
pub use source_ref::SourceRef;

use crate::coord::Coordinate;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

/// One cell of a tile grid.
#[derive(Debug)]
pub struct Tile {
    size: Coordinate,
    source: SourceRef,
    payload: RwLock<Option<RasterBuffer>>,
}

impl Tile {
    /// Creates an unloaded tile.
    pub fn new(size: Coordinate, source: SourceRef) -> Self {
        Self {
            size,
            source,
            payload: RwLock::new(None),
        }
    }

    /// Pixel dimensions of the tile within its grid.
    pub fn size(&self) -> Coordinate {
        self.size
    }

    /// Locator of the tile's raster bytes.
    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    /// True iff a non-empty payload is resident.
    pub fn is_loaded(&self) -> bool {
        self.payload
            .read()
            .as_ref()
            .is_some_and(|buffer| !buffer.is_empty())
    }

    /// Returns a handle to the resident payload, if any.
    pub fn payload(&self) -> Option<RasterBuffer> {
        self.payload.read().clone()
    }

    /// Bytes held by the resident payload, zero when unloaded.
    pub fn resident_bytes(&self) -> usize {
        self.payload.read().as_ref().map_or(0, RasterBuffer::byte_len)
    }

    /// Stores a payload unconditionally.
    pub fn store(&self, buffer: RasterBuffer) {
        *self.payload.write() = Some(buffer);
    }

    /// Stores a payload unless `cancellation` has fired.
    ///
    /// The token is checked while holding the write lock so a cancelled task
    /// can never publish a payload after the cancelling side has observed the
    /// slot. Returns `true` if the payload was stored.
    pub fn store_unless_cancelled(
        &self,
        buffer: RasterBuffer,
        cancellation: &CancellationToken,
    ) -> bool {
        let mut slot = self.payload.write();
        if cancellation.is_cancelled() {
            return false;
        }
        *slot = Some(buffer);
        true
    }

    /// Drops the payload, returning the tile to the unloaded state.
    pub fn forget(&self) -> Option<RasterBuffer> {
        self.payload.write().take()
    }
}

impl PartialEq for Tile {
    /// Tiles are equal when source, size and payload identity all match.
    fn eq(&self, other: &Self) -> bool {
        if self.source != other.source || self.size != other.size {
            return false;
        }
        match (self.payload().as_ref(), other.payload().as_ref()) {
            (None, None) => true,
            (Some(a), Some(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}
