//! Configuration types for gzembed

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Suffix appended to the source path to form the transient artifact path
pub const TEMP_SUFFIX: &str = ".gz";

/// Highest gzip compression level
pub const MAX_LEVEL: u32 = 9;

/// Main configuration for an embed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EmbedConfig {
    /// Asset to compress
    pub input: PathBuf,
    /// Generated source file holding the array definition
    pub output: PathBuf,
    /// Optional companion header with extern declarations
    pub header: Option<PathBuf>,
    /// Directory for the transient `.gz` file (next to the source if None)
    pub temp_dir: Option<PathBuf>,
    /// Array symbol name (derived from the temp path if None)
    pub symbol: Option<String>,
    /// Gzip compression level, 0-9
    pub level: u32,
    /// Bytes rendered per line
    pub columns: usize,
    /// Render hex digits in uppercase
    pub uppercase: bool,
    /// Emit `const` + `PROGMEM` storage qualifiers
    pub progmem: bool,
    /// Decode the written output and compare it with the source
    pub verify: bool,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("include/ElegantOTA.html"),
            output: PathBuf::from("src/elop.cpp"),
            header: None,
            temp_dir: None,
            symbol: None,
            level: MAX_LEVEL,
            columns: 12,
            uppercase: false,
            progmem: false,
            verify: false,
        }
    }
}

impl EmbedConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file
    ///
    /// Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Builder pattern: set input path
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    /// Builder pattern: set output path
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Builder pattern: set header path
    pub fn with_header(mut self, header: impl Into<PathBuf>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Builder pattern: set temp directory
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Builder pattern: set symbol name
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Builder pattern: set compression level
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Builder pattern: set bytes per line
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    /// Builder pattern: set uppercase hex
    pub fn with_uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    /// Builder pattern: set PROGMEM storage
    pub fn with_progmem(mut self, progmem: bool) -> Self {
        self.progmem = progmem;
        self
    }

    /// Builder pattern: set verification
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Check value ranges and path collisions before a run
    pub fn validate(&self) -> Result<()> {
        if self.level > MAX_LEVEL {
            return Err(Error::Config(format!(
                "Invalid compression level: {}. Use 0-{}",
                self.level, MAX_LEVEL
            )));
        }
        if self.columns == 0 {
            return Err(Error::Config("columns must be at least 1".to_string()));
        }
        if let Some(symbol) = &self.symbol {
            if !is_c_identifier(symbol) {
                return Err(Error::Config(format!(
                    "Invalid symbol name: {:?} is not a C identifier",
                    symbol
                )));
            }
        }
        if self.input.file_name().is_none() {
            return Err(Error::Config(format!(
                "Input path has no file name: {:?}",
                self.input
            )));
        }
        self.check_paths()
    }

    /// Reject outputs that would land on the source or the transient artifact
    fn check_paths(&self) -> Result<()> {
        let input = resolve_path(&self.input);
        let temp = resolve_path(&self.temp_path());
        let sibling = resolve_path(&self.sibling_temp_path());
        let output = resolve_path(&self.output);

        let reserved = [("input", &input), ("temp artifact", &temp), ("temp artifact", &sibling)];
        for (what, path) in reserved {
            if output == *path {
                return Err(Error::Config(format!(
                    "Output {:?} collides with the {} path",
                    self.output, what
                )));
            }
        }

        if let Some(header_path) = &self.header {
            let header = resolve_path(header_path);
            if header == output {
                return Err(Error::Config(format!(
                    "Header {:?} collides with the output path",
                    header_path
                )));
            }
            for (what, path) in reserved {
                if header == *path {
                    return Err(Error::Config(format!(
                        "Header {:?} collides with the {} path",
                        header_path, what
                    )));
                }
            }
        }
        Ok(())
    }

    /// Sibling path of the source with the `.gz` suffix appended
    ///
    /// This is also the path the default symbol name is derived from.
    pub fn sibling_temp_path(&self) -> PathBuf {
        let mut path = OsString::from(self.input.as_os_str());
        path.push(TEMP_SUFFIX);
        PathBuf::from(path)
    }

    /// Where the transient compressed artifact is written
    pub fn temp_path(&self) -> PathBuf {
        match (&self.temp_dir, self.input.file_name()) {
            (Some(dir), Some(name)) => {
                let mut name = name.to_os_string();
                name.push(TEMP_SUFFIX);
                dir.join(name)
            }
            _ => self.sibling_temp_path(),
        }
    }
}

/// Best-effort absolute form of `path` for collision checks
///
/// The parent is canonicalized when it exists, so `./a/b` and `a/../a/b`
/// compare equal; the file itself need not exist yet.
fn resolve_path(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (std::fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect(),
    }
}

/// Check whether `s` is usable as a C identifier
pub fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_firmware_layout() {
        let config = EmbedConfig::default();
        assert_eq!(config.input, PathBuf::from("include/ElegantOTA.html"));
        assert_eq!(config.output, PathBuf::from("src/elop.cpp"));
        assert_eq!(config.columns, 12);
        assert_eq!(config.level, 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_temp_path() {
        let config = EmbedConfig::new().with_input("include/page.html");
        assert_eq!(config.temp_path(), PathBuf::from("include/page.html.gz"));

        let config = config.with_temp_dir("/tmp/build");
        assert_eq!(config.temp_path(), PathBuf::from("/tmp/build/page.html.gz"));
        assert_eq!(
            config.sibling_temp_path(),
            PathBuf::from("include/page.html.gz")
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(EmbedConfig::new().with_level(10).validate().is_err());
        assert!(EmbedConfig::new().with_columns(0).validate().is_err());
        assert!(EmbedConfig::new().with_symbol("1abc").validate().is_err());
        assert!(EmbedConfig::new().with_symbol("my-page").validate().is_err());
        assert!(EmbedConfig::new().with_symbol("ELEGANT_HTML").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_path_collisions() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("page.html");
        let base = EmbedConfig::new()
            .with_input(&input)
            .with_output(dir.path().join("page.cpp"));
        assert!(base.validate().is_ok());

        let cases = [
            base.clone().with_output(&input),
            base.clone().with_output(dir.path().join("page.html.gz")),
            base.clone().with_output(dir.path().join(".").join("page.html")),
            base.clone().with_header(&input),
            base.clone().with_header(dir.path().join("page.cpp")),
            base.clone().with_header(dir.path().join("page.html.gz")),
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(Error::Config(_))),
                "accepted {:?}",
                config
            );
        }

        let staged = base.with_temp_dir(dir.path().join("tmp"));
        assert!(matches!(
            staged.clone().with_output(dir.path().join("tmp").join("page.html.gz")).validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            staged.with_output(dir.path().join("page.html.gz")).validate(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_c_identifier() {
        assert!(is_c_identifier("_x1"));
        assert!(is_c_identifier("ELEGANT_HTML"));
        assert!(!is_c_identifier(""));
        assert!(!is_c_identifier("9lives"));
        assert!(!is_c_identifier("a.b"));
    }

    #[test]
    fn test_load_partial_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gzembed.json");
        std::fs::write(
            &path,
            r#"{ "input": "web/index.html", "symbol": "INDEX_HTML", "progmem": true }"#,
        )
        .unwrap();

        let config = EmbedConfig::load(&path).unwrap();
        assert_eq!(config.input, PathBuf::from("web/index.html"));
        assert_eq!(config.symbol.as_deref(), Some("INDEX_HTML"));
        assert!(config.progmem);
        // Untouched keys keep defaults
        assert_eq!(config.output, PathBuf::from("src/elop.cpp"));
        assert_eq!(config.columns, 12);
    }

    #[test]
    fn test_load_rejects_unknown_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(EmbedConfig::load(&path), Err(Error::Json(_))));
    }
}
