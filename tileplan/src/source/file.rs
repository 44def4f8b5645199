//! Filesystem-backed source provider.

use super::SourceProvider;
use crate::tile::SourceRef;
use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};

/// Reads tile sources as file paths.
///
/// Relative references are resolved against `root` when one is set, and
/// against the process working directory otherwise.
#[derive(Debug, Clone, Default)]
pub struct FileSourceProvider {
    root: Option<PathBuf>,
}

impl FileSourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Path a source reference resolves to.
    pub fn resolve(&self, source: &SourceRef) -> PathBuf {
        let path = source.as_path();
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}

impl SourceProvider for FileSourceProvider {
    fn read_bytes(&self, source: &SourceRef) -> io::Result<Bytes> {
        std::fs::read(self.resolve(source)).map(Bytes::from)
    }
}
