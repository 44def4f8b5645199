//! Raster decoding via the `image` crate.

use super::RasterDecoder;
use crate::tile::RasterBuffer;
use bytes::Bytes;
use thiserror::Error;

/// Bytes that could not be decoded into a raster.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct DecodeError {
    reason: String,
}

impl DecodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Decodes PNG and JPEG bytes to RGBA8, guessing the format from content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl ImageDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl RasterDecoder for ImageDecoder {
    fn decode(&self, bytes: &Bytes) -> Result<RasterBuffer, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::new("empty input"));
        }
        let image = image::load_from_memory(bytes).map_err(|e| DecodeError::new(e.to_string()))?;
        Ok(RasterBuffer::new(image.to_rgba8()))
    }
}
