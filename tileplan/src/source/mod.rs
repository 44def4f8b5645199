//! Host-supplied primitives for reading and decoding tile bytes.
//!
//! Both traits are synchronous and may block. The decode executor only
//! calls them from blocking worker threads.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────┐      ┌────────────────────────┐
//! │    DecodeExecutor     │─────▶│  SourceProvider        │  read_bytes(&SourceRef)
//! │  (blocking workers)   │      │  • FileSourceProvider  │
//! │                       │      │  • MemorySourceProvider│
//! │                       │      └────────────────────────┘
//! │                       │      ┌────────────────────────┐
//! │                       │─────▶│  RasterDecoder         │  decode(&Bytes)
//! └───────────────────────┘      │  • ImageDecoder        │
//!                                └────────────────────────┘
//! ```

mod decode;
mod file;
mod memory;

pub use decode::{DecodeError, ImageDecoder};
pub use file::FileSourceProvider;
pub use memory::MemorySourceProvider;

use crate::tile::{RasterBuffer, SourceRef};
use bytes::Bytes;
use std::io;

/// Reads the raw bytes behind a [`SourceRef`].
pub trait SourceProvider: Send + Sync + 'static {
    fn read_bytes(&self, source: &SourceRef) -> io::Result<Bytes>;
}

/// Turns encoded bytes into a raster. Pure and CPU-bound.
pub trait RasterDecoder: Send + Sync + 'static {
    fn decode(&self, bytes: &Bytes) -> Result<RasterBuffer, DecodeError>;
}
