//! In-memory source provider for bundled assets.

use super::SourceProvider;
use crate::tile::SourceRef;
use bytes::Bytes;
use dashmap::DashMap;
use std::io;

/// Serves tile bytes registered up front, e.g. from an asset bundle.
#[derive(Debug, Default)]
pub struct MemorySourceProvider {
    entries: DashMap<SourceRef, Bytes>,
}

impl MemorySourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the bytes for `source`.
    pub fn insert(&self, source: impl Into<SourceRef>, bytes: impl Into<Bytes>) {
        self.entries.insert(source.into(), bytes.into());
    }

    pub fn remove(&self, source: &SourceRef) -> Option<Bytes> {
        self.entries.remove(source).map(|(_, bytes)| bytes)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SourceProvider for MemorySourceProvider {
    fn read_bytes(&self, source: &SourceRef) -> io::Result<Bytes> {
        self.entries
            .get(source)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no asset registered for '{}'", source),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_read() {
        let provider = MemorySourceProvider::new();
        provider.insert("a", Bytes::from_static(b"xyz"));
        assert_eq!(provider.len(), 1);
        assert_eq!(&provider.read_bytes(&SourceRef::new("a")).unwrap()[..], b"xyz");
    }

    #[test]
    fn test_unknown_source_is_not_found() {
        let provider = MemorySourceProvider::new();
        let err = provider.read_bytes(&SourceRef::new("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(provider.is_empty());
    }

    #[test]
    fn test_remove() {
        let provider = MemorySourceProvider::new();
        provider.insert("a", vec![1u8, 2, 3]);
        assert!(provider.remove(&SourceRef::new("a")).is_some());
        assert!(provider.read_bytes(&SourceRef::new("a")).is_err());
    }
}
