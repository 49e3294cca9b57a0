//! # Scrawl
//!
//! A page-native notebook renderer. Lightly marked-up text goes in; a PDF
//! that looks hand-written on ruled paper comes out.
//!
//! The page is the unit of layout. Every line is wrapped against real glyph
//! metrics and placed with the current page's remaining space as a hard
//! constraint, so headings are never stranded at a page bottom and no line
//! ever runs past the margin.
//!
//! ## Architecture
//!
//! ```text
//! text
//!   ↓
//! [parser]   lines → Blocks (heading, list item, dialogue, paragraph, ...)
//!   ↓
//! [layout]   wrap + paginate, driving:
//!   ├── [render]   font resolution per (role, size), jitter
//!   └── [page]     paper, page numbers, page lifecycle
//!   ↓
//! [pdf]      CompiledDocument → bytes
//! ```
//!
//! [`catalog`] and [`config`] are built once up front and only read after.

pub mod catalog;
pub mod config;
pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod page;
pub mod parser;
pub mod pdf;
pub mod render;
pub mod style;
pub mod text;

use std::path::Path;

use catalog::ResourceCatalog;
use config::Config;
use error::ScrawlError;
use layout::LayoutEngine;
use page::CompiledDocument;
use pdf::PdfWriter;

/// Build the resource catalog for a run: the resource directory plus the
/// generic fallback fonts found in the configured system font directories.
pub fn load_catalog(resources: &Path, config: &Config) -> ResourceCatalog {
    ResourceCatalog::load(resources).with_system_fonts(config.system_font_dirs.as_slice())
}

/// Parse and lay out a document without serializing it.
pub fn compile(text: &str, catalog: &ResourceCatalog, config: &Config) -> CompiledDocument {
    let blocks = parser::parse_text(text);
    LayoutEngine::new(config, catalog).layout(&blocks)
}

/// Render a document to PDF bytes.
///
/// Missing fonts and images degrade the output but never fail it.
pub fn render(text: &str, catalog: &ResourceCatalog, config: &Config) -> Result<Vec<u8>, ScrawlError> {
    let document = compile(text, catalog, config);
    PdfWriter::new().write(&document)
}

/// Read `input` and render it. An unreadable input is the one fatal error.
pub fn render_file(input: &Path, catalog: &ResourceCatalog, config: &Config) -> Result<Vec<u8>, ScrawlError> {
    let text = std::fs::read_to_string(input).map_err(|source| ScrawlError::Input {
        path: input.to_path_buf(),
        source,
    })?;
    render(&text, catalog, config)
}
