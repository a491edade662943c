//! Companion header with extern declarations for a rendered array

use crate::carray::{ArrayOptions, ARDUINO_INCLUDE};
use std::path::Path;

/// Fallback when the source extension is unknown
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Guess the Content-Type of the source asset from its extension
pub fn mime_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_MIME.to_string())
}

/// Include guard derived from the header file name, e.g. `elop.h` -> `ELOP_H`
pub fn guard_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut guard: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();

    if guard.is_empty() || guard.starts_with(|c: char| c.is_ascii_digit()) {
        guard.insert(0, '_');
    }
    guard
}

/// Render the header text for `symbol`
pub fn render_header(
    header_path: &Path,
    symbol: &str,
    mime: &str,
    options: &ArrayOptions,
) -> String {
    let guard = guard_from_path(header_path);

    let mut out = format!("#ifndef {guard}\n#define {guard}\n\n");
    if options.progmem {
        out.push_str(ARDUINO_INCLUDE);
        out.push_str("\n\n");
    }
    out.push_str(&format!("#define {}_MIME \"{}\"\n\n", symbol, mime));
    out.push_str(&format!(
        "extern {} {}[]{};\n",
        options.array_type(),
        symbol,
        options.storage_attr()
    ));
    out.push_str(&format!("extern {} {}_len;\n", options.len_type(), symbol));
    out.push_str("\n#endif\n");
    out
}
