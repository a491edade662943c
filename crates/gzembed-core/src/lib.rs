//! gzembed Core - Shared types and configuration
//!
//! This crate provides the foundational types used across all gzembed components.

pub mod asset;
pub mod config;
pub mod error;

pub use asset::{CompressedArtifact, EmbeddedRepresentation, SourceAsset, GZIP_MAGIC};
pub use config::{is_c_identifier, EmbedConfig, MAX_LEVEL, TEMP_SUFFIX};
pub use error::{Error, Result};
