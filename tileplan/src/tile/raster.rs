//! Decoded raster payload handle.

use image::RgbaImage;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a decoded RGBA raster.
///
/// Cloning is cheap. Two handles are the "same payload" iff they point at the
/// same allocation ([`RasterBuffer::ptr_eq`]).
#[derive(Clone)]
pub struct RasterBuffer {
    image: Arc<RgbaImage>,
}

impl RasterBuffer {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Size of the pixel data in bytes.
    pub fn byte_len(&self) -> usize {
        self.image.as_raw().len()
    }

    pub fn is_empty(&self) -> bool {
        self.byte_len() == 0
    }

    /// True if both handles share one allocation.
    pub fn ptr_eq(&self, other: &RasterBuffer) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

impl fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl From<RgbaImage> for RasterBuffer {
    fn from(image: RgbaImage) -> Self {
        Self::new(image)
    }
}
