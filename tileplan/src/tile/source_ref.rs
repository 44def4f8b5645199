//! Opaque locator of a tile's raster bytes.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Opaque reference to where a tile's bytes live.
///
/// Interpreted only by a [`SourceProvider`](crate::source::SourceProvider).
/// Many tiles may share one reference, so clones share the backing string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRef(Arc<str>);

impl SourceRef {
    pub fn new(locator: impl AsRef<str>) -> Self {
        Self(Arc::from(locator.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SourceRef {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}
