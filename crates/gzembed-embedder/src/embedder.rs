//! The embed pipeline: source -> temp `.gz` -> array source file

use crate::artifact::TempArtifact;
use crate::output::{fingerprint, write_atomic};
use gzembed_codec::{
    decode, mime_for, parse_array, render_header, symbol_from_path, ArrayOptions, ArrayRenderer,
    GzipEncoder,
};
use gzembed_core::{EmbedConfig, Error, Result, SourceAsset};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReport {
    /// Array symbol written to the output
    pub symbol: String,
    /// Source size in bytes
    pub source_size: usize,
    /// Gzip stream size in bytes, equal to `<symbol>_len`
    pub compressed_size: usize,
    /// SHA-256 of the gzip stream
    pub fingerprint: String,
    pub output: PathBuf,
    pub header: Option<PathBuf>,
    /// Whether the written output was decoded and compared with the source
    pub verified: bool,
}

/// Compresses one asset and writes it out as a C array
pub struct AssetEmbedder {
    config: EmbedConfig,
    encoder: GzipEncoder,
    renderer: ArrayRenderer,
}

impl AssetEmbedder {
    /// Create an embedder, rejecting invalid configuration up front
    pub fn new(config: EmbedConfig) -> Result<Self> {
        config.validate()?;
        let encoder = GzipEncoder::new(config.level)?;
        let renderer = ArrayRenderer::new(ArrayOptions::from(&config));

        Ok(Self {
            config,
            encoder,
            renderer,
        })
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    /// Symbol used for the array, explicit or derived from `<input>.gz`
    pub fn symbol(&self) -> String {
        self.config
            .symbol
            .clone()
            .unwrap_or_else(|| symbol_from_path(&self.config.sibling_temp_path()))
    }

    /// Run the pipeline
    ///
    /// A missing source is detected before any file is touched, so the
    /// output is neither created nor overwritten in that case.
    pub fn embed(&self) -> Result<EmbedReport> {
        let config = &self.config;
        info!("Generating array source: {:?} -> {:?}", config.input, config.output);

        let source = SourceAsset::read(&config.input)?;
        debug!("Read {} bytes from {:?}", source.size(), source.path());

        let temp = TempArtifact::create(&config.temp_path(), source.data(), &self.encoder)?;
        let compressed = temp.read()?;
        let digest = fingerprint(compressed.data());

        let symbol = self.symbol();
        let rendered = self.renderer.render(&symbol, compressed.data())?;
        write_atomic(&config.output, rendered.text().as_bytes())?;

        if let Some(header_path) = &config.header {
            let header = render_header(
                header_path,
                &symbol,
                &mime_for(&config.input),
                self.renderer.options(),
            );
            write_atomic(header_path, header.as_bytes())?;
            info!("Wrote header {:?}", header_path);
        }

        temp.remove()?;

        if config.verify {
            verify_output(&config.output, source.data())?;
            info!("Verified {:?} against {:?}", config.output, config.input);
        }

        info!(
            "Embedded {} as {}[{}] ({} -> {} bytes, {:.1}%)",
            config.input.display(),
            symbol,
            compressed.size(),
            source.size(),
            compressed.size(),
            compressed.ratio(source.size()) * 100.0
        );
        info!("gzip sha256: {}", digest);

        Ok(EmbedReport {
            symbol,
            source_size: source.size(),
            compressed_size: compressed.size(),
            fingerprint: digest,
            output: config.output.clone(),
            header: config.header.clone(),
            verified: config.verify,
        })
    }
}

/// Embed `source` into `output` with default settings
pub fn embed(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Result<EmbedReport> {
    let config = EmbedConfig::new().with_input(source).with_output(output);
    AssetEmbedder::new(config)?.embed()
}

/// Decode a generated array file and compare it with the original bytes
pub fn verify_output(output: &Path, original: &[u8]) -> Result<()> {
    let text = std::fs::read_to_string(output)?;
    let parsed = parse_array(&text)
        .and_then(|parsed| parsed.check_len().map(|_| parsed))
        .map_err(|e| Error::Verification(format!("{:?}: {}", output, e)))?;

    let decoded = decode(&parsed.bytes)
        .map_err(|e| Error::Verification(format!("{:?}: {}", output, e)))?;

    if decoded != original {
        let first_diff = decoded
            .iter()
            .zip(original)
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| decoded.len().min(original.len()));
        return Err(Error::Verification(format!(
            "{:?} decodes to {} bytes, source has {} (first difference at byte {})",
            output,
            decoded.len(),
            original.len(),
            first_diff
        )));
    }
    Ok(())
}
