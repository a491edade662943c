//! In-process gzip encoding with a reproducible header
//!
//! The header carries no timestamp, file name or comment, and the OS byte is
//! fixed to "unknown", so identical input always yields identical output.

use flate2::read::GzDecoder;
use flate2::{Compression, GzBuilder};
use gzembed_core::{CompressedArtifact, Error, Result, MAX_LEVEL};
use std::io::{Read, Write};
use tracing::debug;

/// OS byte meaning "unknown" in the gzip header
const OS_UNKNOWN: u8 = 255;

/// Gzip encoder with a fixed compression level
#[derive(Debug, Clone, Copy)]
pub struct GzipEncoder {
    level: u32,
}

impl GzipEncoder {
    /// Create a new encoder
    pub fn new(level: u32) -> Result<Self> {
        if level > MAX_LEVEL {
            return Err(Error::Config(format!(
                "Invalid compression level: {}. Use 0-{}",
                level, MAX_LEVEL
            )));
        }
        Ok(Self { level })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Compress `data` into `writer`, returning the writer once the trailer is flushed
    pub fn encode_to<W: Write>(&self, data: &[u8], writer: W) -> Result<W> {
        let mut encoder = GzBuilder::new()
            .mtime(0)
            .operating_system(OS_UNKNOWN)
            .write(writer, Compression::new(self.level));

        encoder
            .write_all(data)
            .map_err(|e| Error::Compression(format!("Failed to write deflate stream: {}", e)))?;

        encoder
            .finish()
            .map_err(|e| Error::Compression(format!("Failed to finish gzip stream: {}", e)))
    }

    /// Compress `data` into memory
    pub fn encode(&self, data: &[u8]) -> Result<CompressedArtifact> {
        let compressed = self.encode_to(data, Vec::with_capacity(data.len() / 2 + 32))?;
        debug!(
            "Gzip level {}: {} -> {} bytes",
            self.level,
            data.len(),
            compressed.len()
        );
        Ok(CompressedArtifact::new(compressed))
    }
}

impl Default for GzipEncoder {
    fn default() -> Self {
        Self { level: MAX_LEVEL }
    }
}

/// Decompress a gzip stream
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| Error::Compression(format!("Failed to decode gzip stream: {}", e)))?;
    Ok(out)
}
