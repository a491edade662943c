//! Transient compressed artifact on disk
//!
//! The `.gz` file only lives for the duration of one run. `TempArtifact`
//! owns it and removes it on drop, so an early return after creation never
//! leaves it behind.

use gzembed_codec::GzipEncoder;
use gzembed_core::{CompressedArtifact, Error, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Guard over the temporary gzip file
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    removed: bool,
}

impl TempArtifact {
    /// Compress `data` into a fresh file at `path`
    ///
    /// A stale file left at `path` by an earlier run is deleted first.
    pub fn create(path: &Path, data: &[u8], encoder: &GzipEncoder) -> Result<Self> {
        if path.exists() {
            warn!("Removing stale artifact {:?}", path);
            std::fs::remove_file(path)?;
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // From here on the guard is responsible for the file
        let artifact = Self {
            path: path.to_path_buf(),
            removed: false,
        };

        let file = File::create(path)?;
        let writer = encoder.encode_to(data, BufWriter::new(file))?;
        writer
            .into_inner()
            .map_err(|e| Error::Compression(format!("Failed to flush {:?}: {}", path, e.error())))?
            .sync_all()?;

        if !path.is_file() {
            return Err(Error::ArtifactMissing(path.to_path_buf()));
        }

        debug!("Wrote compressed artifact {:?}", path);
        Ok(artifact)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the compressed bytes back from disk
    pub fn read(&self) -> Result<CompressedArtifact> {
        if !self.path.is_file() {
            return Err(Error::ArtifactMissing(self.path.clone()));
        }
        Ok(CompressedArtifact::new(std::fs::read(&self.path)?))
    }

    /// Delete the file, reporting failure instead of swallowing it
    pub fn remove(mut self) -> Result<()> {
        self.removed = true;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed compressed artifact {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        // Best-effort; there is no caller left to report to
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove artifact {:?}: {}", self.path, e);
            }
        }
    }
}
