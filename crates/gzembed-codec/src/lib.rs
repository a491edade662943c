//! gzembed Codec - gzip encoding and C array rendering
//!
//! This crate turns asset bytes into a reproducible gzip stream and renders
//! that stream as source text a firmware build can compile in directly.

pub mod carray;
pub mod gzip;
pub mod header;

pub use carray::{parse_array, symbol_from_path, ArrayOptions, ArrayRenderer, ParsedArray};
pub use gzip::{decode, GzipEncoder};
pub use header::{guard_from_path, mime_for, render_header};
