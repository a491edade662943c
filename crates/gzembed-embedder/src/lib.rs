//! gzembed Embedder - asset to C array pipeline
//!
//! Reads one asset, stages its gzip encoding in a transient `.gz` file,
//! renders that file as a C array definition and writes it out.
//!
//! # Example
//!
//! ```no_run
//! use gzembed_core::EmbedConfig;
//! use gzembed_embedder::AssetEmbedder;
//!
//! let config = EmbedConfig::new()
//!     .with_input("include/ElegantOTA.html")
//!     .with_output("src/elop.cpp")
//!     .with_symbol("ELEGANT_HTML");
//!
//! let report = AssetEmbedder::new(config)?.embed()?;
//! println!("{} is {} bytes", report.symbol, report.compressed_size);
//! # Ok::<(), gzembed_core::Error>(())
//! ```

pub mod artifact;
pub mod embedder;
pub mod output;

pub use artifact::TempArtifact;
pub use embedder::{embed, verify_output, AssetEmbedder, EmbedReport};
pub use output::{fingerprint, write_atomic};
