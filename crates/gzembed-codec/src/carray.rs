//! C array initializer rendering in the layout of `xxd -i`
//!
//! ```text
//! unsigned char include_index_html_gz[] = {
//!   0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0xff, 0xcb, 0x48,
//!   0x00
//! };
//! unsigned int include_index_html_gz_len = 13;
//! ```

use gzembed_core::{is_c_identifier, EmbedConfig, EmbeddedRepresentation, Error, Result};
use std::fmt::Write;
use std::path::Path;

/// Include line prepended to PROGMEM output
pub const ARDUINO_INCLUDE: &str = "#include <Arduino.h>";

/// Layout options for rendered arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayOptions {
    /// Bytes per line
    pub columns: usize,
    /// Uppercase hex digits
    ///
    /// Only the digits change; the prefix stays `0x`, so this is not
    /// byte-identical to `xxd -i -u`, which prints `0X1F`.
    pub uppercase: bool,
    /// `const` + `PROGMEM` storage
    pub progmem: bool,
}

impl Default for ArrayOptions {
    fn default() -> Self {
        Self {
            columns: 12,
            uppercase: false,
            progmem: false,
        }
    }
}

impl From<&EmbedConfig> for ArrayOptions {
    fn from(config: &EmbedConfig) -> Self {
        Self {
            columns: config.columns,
            uppercase: config.uppercase,
            progmem: config.progmem,
        }
    }
}

impl ArrayOptions {
    /// Type prefix for the array definition
    pub fn array_type(&self) -> &'static str {
        if self.progmem {
            "const unsigned char"
        } else {
            "unsigned char"
        }
    }

    /// Type prefix for the length definition
    pub fn len_type(&self) -> &'static str {
        if self.progmem {
            "const unsigned int"
        } else {
            "unsigned int"
        }
    }

    /// Attribute placed after the array declarator
    pub fn storage_attr(&self) -> &'static str {
        if self.progmem {
            " PROGMEM"
        } else {
            ""
        }
    }
}

/// Derive an array symbol from a file path the way `xxd -i` does
///
/// Every byte that is not ASCII alphanumeric becomes `_`, so a multi-byte
/// UTF-8 character turns into one underscore per byte. A leading digit gets
/// a `__` prefix.
pub fn symbol_from_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut symbol = String::with_capacity(raw.len() + 2);
    if raw.starts_with(|c: char| c.is_ascii_digit()) {
        symbol.push_str("__");
    }
    symbol.extend(raw.bytes().map(|b| {
        if b.is_ascii_alphanumeric() {
            b as char
        } else {
            '_'
        }
    }));
    if symbol.is_empty() {
        symbol.push('_');
    }
    symbol
}

/// Renders bytes as a C array definition plus a length constant
#[derive(Debug, Clone, Default)]
pub struct ArrayRenderer {
    options: ArrayOptions,
}

impl ArrayRenderer {
    pub fn new(options: ArrayOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ArrayOptions {
        &self.options
    }

    /// Render `data` under `symbol`
    pub fn render(&self, symbol: &str, data: &[u8]) -> Result<EmbeddedRepresentation> {
        if !is_c_identifier(symbol) {
            return Err(Error::Render(format!(
                "{:?} is not a valid C identifier",
                symbol
            )));
        }
        if self.options.columns == 0 {
            return Err(Error::Render("columns must be at least 1".to_string()));
        }

        // "0x.., " is six characters per byte
        let mut out = String::with_capacity(data.len() * 6 + symbol.len() * 2 + 96);
        self.write_array(&mut out, symbol, data)
            .map_err(|e| Error::Render(e.to_string()))?;

        Ok(EmbeddedRepresentation::new(symbol, data.len(), out))
    }

    fn write_array(&self, out: &mut String, symbol: &str, data: &[u8]) -> std::fmt::Result {
        let opts = &self.options;

        if opts.progmem {
            writeln!(out, "{}", ARDUINO_INCLUDE)?;
            writeln!(out)?;
        }

        writeln!(
            out,
            "{} {}[]{} = {{",
            opts.array_type(),
            symbol,
            opts.storage_attr()
        )?;

        let mut chunks = data.chunks(opts.columns).peekable();
        while let Some(chunk) = chunks.next() {
            out.push_str("  ");
            for (i, byte) in chunk.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if opts.uppercase {
                    write!(out, "0x{:02X}", byte)?;
                } else {
                    write!(out, "0x{:02x}", byte)?;
                }
            }
            if chunks.peek().is_some() {
                out.push(',');
            }
            out.push('\n');
        }

        writeln!(out, "}};")?;
        writeln!(
            out,
            "{} {}_len = {};",
            opts.len_type(),
            symbol,
            data.len()
        )
    }
}

/// An array recovered from rendered source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArray {
    pub symbol: String,
    pub bytes: Vec<u8>,
    /// Value of the `<symbol>_len` constant
    pub declared_len: usize,
}

impl ParsedArray {
    /// Check that the element count agrees with the length constant
    pub fn check_len(&self) -> Result<()> {
        if self.bytes.len() != self.declared_len {
            return Err(Error::Parse(format!(
                "{} has {} elements but {}_len = {}",
                self.symbol,
                self.bytes.len(),
                self.symbol,
                self.declared_len
            )));
        }
        Ok(())
    }
}

/// Parse the first array definition and its length constant out of `text`
pub fn parse_array(text: &str) -> Result<ParsedArray> {
    let open = text
        .find('{')
        .ok_or_else(|| Error::Parse("missing array initializer '{'".to_string()))?;

    let declaration = &text[..open];
    let symbol = declaration
        .split('[')
        .next()
        .and_then(|head| head.split_whitespace().last())
        .filter(|s| is_c_identifier(s))
        .ok_or_else(|| Error::Parse(format!("no array symbol in {:?}", declaration.trim())))?
        .to_string();

    let body_start = open + 1;
    let body_len = text[body_start..]
        .find("};")
        .ok_or_else(|| Error::Parse(format!("unterminated initializer for {}", symbol)))?;
    let body = &text[body_start..body_start + body_len];

    let first_line = declaration.matches('\n').count() + 1;
    let mut bytes = Vec::new();
    for (idx, line) in body.lines().enumerate() {
        for token in line.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .ok_or_else(|| {
                    Error::parse_at(first_line + idx, format!("expected hex literal, found {:?}", token))
                })?;
            let byte = u8::from_str_radix(digits, 16).map_err(|e| {
                Error::parse_at(first_line + idx, format!("bad byte {:?}: {}", token, e))
            })?;
            bytes.push(byte);
        }
    }

    let rest = &text[body_start + body_len + 2..];
    let len_symbol = format!("{}_len", symbol);
    let declared_len = rest
        .find(&len_symbol)
        .and_then(|pos| {
            let after = rest[pos + len_symbol.len()..].trim_start().strip_prefix('=')?;
            let end = after.find(';')?;
            after[..end].trim().parse::<usize>().ok()
        })
        .ok_or_else(|| Error::Parse(format!("missing or malformed {}", len_symbol)))?;

    Ok(ParsedArray {
        symbol,
        bytes,
        declared_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &[u8] = b"hello world!\n";

    #[test]
    fn test_matches_xxd_layout() {
        let rendered = ArrayRenderer::default().render("hello_txt", HELLO).unwrap();
        let expected = concat!(
            "unsigned char hello_txt[] = {\n",
            "  0x68, 0x65, 0x6c, 0x6c, 0x6f, 0x20, 0x77, 0x6f, 0x72, 0x6c, 0x64, 0x21,\n",
            "  0x0a\n",
            "};\n",
            "unsigned int hello_txt_len = 13;\n",
        );
        assert_eq!(rendered.text(), expected);
        assert_eq!(rendered.byte_len, 13);
        assert_eq!(rendered.len_symbol(), "hello_txt_len");
    }

    #[test]
    fn test_exact_multiple_of_columns() {
        let options = ArrayOptions {
            columns: 4,
            ..Default::default()
        };
        let rendered = ArrayRenderer::new(options)
            .render("x", &[1, 2, 3, 4, 5, 6, 7, 8])
            .unwrap();
        let expected = "unsigned char x[] = {\n  0x01, 0x02, 0x03, 0x04,\n  0x05, 0x06, 0x07, 0x08\n};\nunsigned int x_len = 8;\n";
        assert_eq!(rendered.text(), expected);
    }

    #[test]
    fn test_empty_array() {
        let rendered = ArrayRenderer::default().render("empty", &[]).unwrap();
        assert_eq!(
            rendered.text(),
            "unsigned char empty[] = {\n};\nunsigned int empty_len = 0;\n"
        );
    }

    #[test]
    fn test_progmem_and_uppercase() {
        let options = ArrayOptions {
            columns: 12,
            uppercase: true,
            progmem: true,
        };
        let rendered = ArrayRenderer::new(options)
            .render("ELEGANT_HTML", &[0x1f, 0x8b, 0xab])
            .unwrap();
        let text = rendered.text();
        assert!(text.starts_with("#include <Arduino.h>\n\n"));
        assert!(text.contains("const unsigned char ELEGANT_HTML[] PROGMEM = {\n  0x1F, 0x8B, 0xAB\n};"));
        assert!(text.ends_with("const unsigned int ELEGANT_HTML_len = 3;\n"));
    }

    #[test]
    fn test_rejects_bad_symbol() {
        let renderer = ArrayRenderer::default();
        assert!(matches!(renderer.render("9x", HELLO), Err(Error::Render(_))));
        assert!(matches!(renderer.render("a-b", HELLO), Err(Error::Render(_))));
    }

    #[test]
    fn test_symbol_from_path() {
        assert_eq!(
            symbol_from_path(Path::new("include/ElegantOTA.html.gz")),
            "include_ElegantOTA_html_gz"
        );
        assert_eq!(symbol_from_path(Path::new("404.html.gz")), "__404_html_gz");
        assert_eq!(symbol_from_path(Path::new("../a b.gz")), "___a_b_gz");
        // Two-byte UTF-8 character, two underscores
        assert_eq!(symbol_from_path(Path::new("caf\u{e9}.gz")), "caf___gz");
        assert!(is_c_identifier(&symbol_from_path(Path::new("0"))));
    }

    #[test]
    fn test_parse_rendered() {
        let data: Vec<u8> = (0..=255).collect();
        for options in [
            ArrayOptions::default(),
            ArrayOptions {
                columns: 7,
                uppercase: true,
                progmem: true,
            },
        ] {
            let rendered = ArrayRenderer::new(options).render("blob", &data).unwrap();
            let parsed = parse_array(rendered.text()).unwrap();
            assert_eq!(parsed.symbol, "blob");
            assert_eq!(parsed.declared_len, 256);
            assert_eq!(parsed.bytes, data);
            parsed.check_len().unwrap();
        }
    }

    #[test]
    fn test_parse_length_mismatch() {
        let text = "unsigned char a[] = {\n  0x01, 0x02\n};\nunsigned int a_len = 3;\n";
        let parsed = parse_array(text).unwrap();
        assert_eq!(parsed.bytes, vec![1, 2]);
        assert!(matches!(parsed.check_len(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_array("no braces here").is_err());
        assert!(parse_array("unsigned char a[] = {\n  0x01\n").is_err());
        assert!(parse_array("unsigned char a[] = {\n  0x01\n};\n").is_err());

        let err = parse_array("unsigned char a[] = {\n  0x01, 12\n};\nunsigned int a_len = 2;\n")
            .unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
    }
}
