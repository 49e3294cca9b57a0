//! # Font Management
//!
//! A per-document arena of font faces. Index 0 is always the built-in
//! Helvetica, which needs no embedding and can never fail to load. TrueType
//! files are read once per path and measured with real glyph advances from
//! `ttf-parser`; the PDF writer embeds them whole.

pub mod metrics;

use std::collections::HashMap;
use std::path::PathBuf;

use log::debug;

pub use metrics::StandardFontMetrics;

use crate::catalog::FontHandle;
use crate::error::ScrawlError;

/// Index of a face inside a [`FontRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(usize);

impl FontId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The standard PDF font used when nothing else resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
        }
    }

    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::Helvetica => StandardFontMetrics::HELVETICA,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FontData {
    /// A standard PDF font. No embedding needed.
    Builtin(StandardFont),
    /// A TrueType font embedded whole into the output.
    TrueType {
        data: Vec<u8>,
        metrics: TrueTypeMetrics,
    },
}

/// Metrics parsed from a TrueType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct TrueTypeMetrics {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    advance_widths: HashMap<char, u16>,
    glyph_ids: HashMap<char, u16>,
    default_advance: u16,
}

impl TrueTypeMetrics {
    /// Parse metrics, rejecting fonts that cannot be embedded as FontFile2.
    pub fn from_font_data(data: &[u8]) -> Result<Self, ScrawlError> {
        let face = ttf_parser::Face::parse(data, 0)
            .map_err(|e| ScrawlError::Font(format!("unparseable font data: {}", e)))?;
        if face.tables().glyf.is_none() {
            return Err(ScrawlError::Font(
                "font has no TrueType outlines (CFF fonts cannot be embedded)".to_string(),
            ));
        }

        let mut codepoints: Vec<u32> = Vec::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if subtable.is_unicode() {
                    subtable.codepoints(|cp| codepoints.push(cp));
                }
            }
        }

        let mut advance_widths = HashMap::new();
        let mut glyph_ids = HashMap::new();
        for ch in codepoints.into_iter().filter_map(char::from_u32) {
            if let Some(gid) = face.glyph_index(ch) {
                advance_widths.insert(ch, face.glyph_hor_advance(gid).unwrap_or(0));
                glyph_ids.insert(ch, gid.0);
            }
        }

        let units_per_em = face.units_per_em();
        let default_advance = match advance_widths.get(&' ') {
            Some(&w) if w > 0 => w,
            _ => units_per_em / 2,
        };

        Ok(Self {
            units_per_em,
            ascender: face.ascender(),
            descender: face.descender(),
            advance_widths,
            glyph_ids,
            default_advance,
        })
    }

    /// Advance width of a character in points. Unmapped characters render
    /// as glyph 0 and are measured with the default advance.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    /// Glyph ID of a character, 0 (`.notdef`) when the font lacks it.
    pub fn glyph_id(&self, ch: char) -> u16 {
        self.glyph_ids.get(&ch).copied().unwrap_or(0)
    }

    /// Advance of a glyph in 1/1000 em, for the PDF /W array.
    pub fn glyph_width_pdf_units(&self, ch: char) -> u32 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 * 1000.0 / self.units_per_em as f64) as u32
    }
}

/// One loaded face.
#[derive(Debug, Clone)]
pub struct FontFace {
    pub name: String,
    pub data: FontData,
}

impl FontFace {
    /// Measure the width of a string in points.
    pub fn measure(&self, text: &str, font_size: f64) -> f64 {
        match &self.data {
            FontData::Builtin(std_font) => std_font.metrics().measure_string(text, font_size),
            FontData::TrueType { metrics, .. } => {
                text.chars().map(|ch| metrics.char_width(ch, font_size)).sum()
            }
        }
    }
}

/// Faces registered for one document.
#[derive(Debug, Clone)]
pub struct FontRegistry {
    faces: Vec<FontFace>,
    by_path: HashMap<PathBuf, FontId>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        Self {
            faces: vec![FontFace {
                name: StandardFont::Helvetica.pdf_name().to_string(),
                data: FontData::Builtin(StandardFont::Helvetica),
            }],
            by_path: HashMap::new(),
        }
    }

    /// The always-available built-in face.
    pub fn builtin(&self) -> FontId {
        FontId(0)
    }

    /// Load a catalog font, reusing the face when the path was seen before.
    pub fn register(&mut self, handle: &FontHandle) -> Result<FontId, ScrawlError> {
        if let Some(&id) = self.by_path.get(&handle.path) {
            return Ok(id);
        }
        let data = std::fs::read(&handle.path).map_err(|e| {
            ScrawlError::Font(format!("failed to read '{}': {}", handle.path.display(), e))
        })?;
        let id = self.register_data(&handle.name, data)?;
        self.by_path.insert(handle.path.clone(), id);
        debug!("registered font '{}' from {}", handle.name, handle.path.display());
        Ok(id)
    }

    /// Register raw TrueType bytes under a display name.
    pub fn register_data(&mut self, name: &str, data: Vec<u8>) -> Result<FontId, ScrawlError> {
        let metrics = TrueTypeMetrics::from_font_data(&data)
            .map_err(|e| ScrawlError::Font(format!("'{}': {}", name, e)))?;
        let id = FontId(self.faces.len());
        self.faces.push(FontFace {
            name: name.to_string(),
            data: FontData::TrueType { data, metrics },
        });
        Ok(id)
    }

    pub fn face(&self, id: FontId) -> &FontFace {
        &self.faces[id.0]
    }

    /// Measure a string with the given face.
    pub fn measure(&self, id: FontId, text: &str, font_size: f64) -> f64 {
        self.face(id).measure(text, font_size)
    }

    /// Iterate over all registered faces.
    pub fn iter(&self) -> impl Iterator<Item = (FontId, &FontFace)> {
        self.faces.iter().enumerate().map(|(i, f)| (FontId(i), f))
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
