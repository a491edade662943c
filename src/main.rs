//! gzembed - embed gzip-compressed web assets in firmware
//!
//! Compresses an asset (by default the ElegantOTA page) and writes it as a C
//! byte array that the firmware serves with `Content-Encoding: gzip`.

use anyhow::{Context, Result};
use clap::Parser;
use gzembed_core::EmbedConfig;
use gzembed_embedder::AssetEmbedder;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

/// gzembed - gzip an asset and emit it as a C array
#[derive(Parser, Debug)]
#[command(name = "gzembed")]
#[command(version, about, long_about = None)]
struct Args {
    /// Source asset [default: include/ElegantOTA.html]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Generated source file [default: src/elop.cpp]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a header with extern declarations
    #[arg(long)]
    header: Option<PathBuf>,

    /// Array symbol name (derived from "<input>.gz" when omitted)
    #[arg(short = 'n', long = "name")]
    symbol: Option<String>,

    /// Gzip compression level, 0-9 [default: 9]
    #[arg(short, long)]
    level: Option<u32>,

    /// Bytes per line [default: 12]
    #[arg(short, long)]
    columns: Option<usize>,

    /// Uppercase hex digits
    #[arg(short, long, overrides_with = "no_uppercase")]
    uppercase: bool,

    /// Lowercase hex digits, overriding the config file
    #[arg(long, overrides_with = "uppercase")]
    no_uppercase: bool,

    /// Emit const + PROGMEM so the array stays in flash
    #[arg(long, overrides_with = "no_progmem")]
    progmem: bool,

    /// Plain xxd types, overriding the config file
    #[arg(long, overrides_with = "progmem")]
    no_progmem: bool,

    /// Directory for the transient .gz file (next to the input by default)
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Decode the written output and compare it with the input
    #[arg(long, overrides_with = "no_verify")]
    verify: bool,

    /// Skip verification, overriding the config file
    #[arg(long, overrides_with = "verify")]
    no_verify: bool,

    /// JSON configuration file; command-line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Layer command-line flags over the file (or default) configuration
    fn into_config(self) -> Result<EmbedConfig> {
        let mut config = match &self.config {
            Some(path) => EmbedConfig::load(path)
                .with_context(|| format!("Failed to load config {:?}", path))?,
            None => EmbedConfig::new(),
        };

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(header) = self.header {
            config.header = Some(header);
        }
        if let Some(symbol) = self.symbol {
            config.symbol = Some(symbol);
        }
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(temp_dir) = self.temp_dir {
            config.temp_dir = Some(temp_dir);
        }
        config.uppercase = switch(config.uppercase, self.uppercase, self.no_uppercase);
        config.progmem = switch(config.progmem, self.progmem, self.no_progmem);
        config.verify = switch(config.verify, self.verify, self.no_verify);

        Ok(config)
    }
}

/// Resolve a `--flag` / `--no-flag` pair against the file value
fn switch(current: bool, on: bool, off: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        current
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    debug!("gzembed v{}", env!("CARGO_PKG_VERSION"));

    let config = args.into_config()?;
    debug!("Configuration: {:?}", config);

    let embedder = AssetEmbedder::new(config).context("Invalid configuration")?;
    let report = embedder.embed().with_context(|| {
        format!(
            "Failed to embed {:?} into {:?}",
            embedder.config().input,
            embedder.config().output
        )
    })?;

    debug!("{:?}", report);
    Ok(())
}
