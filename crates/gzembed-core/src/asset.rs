//! Data model for an embed run
//!
//! A run moves bytes through three stages: the source asset read from disk,
//! the transient gzip artifact, and the rendered array text.

use crate::error::{Error, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Gzip stream magic bytes
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Asset bytes as read from persistent storage
#[derive(Clone)]
pub struct SourceAsset {
    path: PathBuf,
    data: Bytes,
}

impl SourceAsset {
    /// Read an asset from disk
    ///
    /// A missing file is reported as `SourceNotFound` rather than a bare IO error.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        Ok(Self::new(path, data))
    }

    /// Wrap bytes that were already loaded
    pub fn new(path: impl Into<PathBuf>, data: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl std::fmt::Debug for SourceAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceAsset")
            .field("path", &self.path)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Gzip encoding of a source asset
#[derive(Clone, PartialEq, Eq)]
pub struct CompressedArtifact {
    data: Bytes,
}

impl CompressedArtifact {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Check for the gzip header magic
    pub fn is_gzip(&self) -> bool {
        self.data.starts_with(&GZIP_MAGIC)
    }

    /// Compressed size as a fraction of `original` bytes
    pub fn ratio(&self, original: usize) -> f64 {
        if original == 0 {
            return 0.0;
        }
        self.data.len() as f64 / original as f64
    }
}

impl std::fmt::Debug for CompressedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressedArtifact")
            .field("size", &self.data.len())
            .field("gzip", &self.is_gzip())
            .finish()
    }
}

/// Bytes rendered as a source-code array initializer
#[derive(Clone, PartialEq, Eq)]
pub struct EmbeddedRepresentation {
    /// Array symbol; the length constant is `<symbol>_len`
    pub symbol: String,
    /// Number of bytes in the array
    pub byte_len: usize,
    text: String,
}

impl EmbeddedRepresentation {
    pub fn new(symbol: impl Into<String>, byte_len: usize, text: String) -> Self {
        Self {
            symbol: symbol.into(),
            byte_len,
            text,
        }
    }

    /// Rendered source text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Name of the length constant
    pub fn len_symbol(&self) -> String {
        format!("{}_len", self.symbol)
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl std::fmt::Debug for EmbeddedRepresentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedRepresentation")
            .field("symbol", &self.symbol)
            .field("byte_len", &self.byte_len)
            .field("text_len", &self.text.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_missing_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.html");
        match SourceAsset::read(&path) {
            Err(Error::SourceNotFound(p)) => assert_eq!(p, path),
            other => panic!("expected SourceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_read_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, b"<html></html>").unwrap();

        let asset = SourceAsset::read(&path).unwrap();
        assert_eq!(asset.size(), 13);
        assert_eq!(asset.data(), b"<html></html>");
        assert_eq!(asset.path(), path.as_path());
    }

    #[test]
    fn test_artifact_magic() {
        assert!(CompressedArtifact::new(vec![0x1f, 0x8b, 0x08]).is_gzip());
        assert!(!CompressedArtifact::new(vec![0x00, 0x8b]).is_gzip());
        assert!(!CompressedArtifact::new(Vec::new()).is_gzip());
    }

    #[test]
    fn test_artifact_ratio() {
        let artifact = CompressedArtifact::new(vec![0u8; 25]);
        assert!((artifact.ratio(100) - 0.25).abs() < f64::EPSILON);
        assert_eq!(artifact.ratio(0), 0.0);
    }
}
