//! # Style Table
//!
//! One [`StyleSpec`] per renderable block kind, plus the two decorations the
//! layout engine draws on its own: the month banner and the page number.
//! Styles name a logical font role rather than a font file; the renderer
//! resolves the role through the resource catalog.

use serde::{Deserialize, Serialize};

use crate::catalog::ResourceCatalog;
use crate::model::{BlockKind, HeadingLevel};

/// An RGB color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build a color from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    pub fn gray(level: f64) -> Self {
        Self::rgb(level, level, level)
    }
}

/// Maximum random displacement per drawn line. Offsets are drawn uniformly
/// from `-x..=x`, `-y..=y`, and `-rotation..=rotation` (degrees).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Jitter {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

impl Jitter {
    pub const NONE: Jitter = Jitter {
        x: 0.0,
        y: 0.0,
        rotation: 0.0,
    };

    pub fn new(x: f64, y: f64, rotation: f64) -> Self {
        Self { x, y, rotation }
    }
}

/// How one kind of line is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSpec {
    pub font_role: String,
    pub size: f64,
    pub color: Color,
    pub line_spacing: f64,
    #[serde(default)]
    pub jitter: Jitter,
}

impl StyleSpec {
    pub fn new(font_role: &str, size: f64, color: Color, line_spacing: f64, jitter: Jitter) -> Self {
        Self {
            font_role: font_role.to_string(),
            size,
            color,
            line_spacing,
            jitter,
        }
    }

    /// Vertical advance of one line of this style.
    pub fn line_height(&self, line_height_base: f64) -> f64 {
        line_height_base * self.line_spacing
    }
}

/// Roles tried, in order, when a style's own role has no catalog entry.
const ROLE_FALLBACKS: &[(&str, &[&str])] = &[
    ("title", &["cover", "main"]),
    ("dialogue", &["body", "main"]),
    ("body", &["main"]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleTable {
    pub paragraph: StyleSpec,
    pub heading: StyleSpec,
    pub list_item: StyleSpec,
    pub dialogue: StyleSpec,
    pub month_banner: StyleSpec,
    pub page_number: StyleSpec,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            paragraph: StyleSpec::new(
                "body",
                12.0,
                Color::rgb8(25, 25, 35),
                1.2,
                Jitter::new(1.2, 0.6, 0.15),
            ),
            heading: StyleSpec::new(
                "title",
                15.0,
                Color::rgb8(15, 15, 25),
                1.25,
                Jitter::new(1.3, 0.7, 0.18),
            ),
            list_item: StyleSpec::new(
                "body",
                11.0,
                Color::rgb8(30, 30, 40),
                1.15,
                Jitter::new(1.0, 0.5, 0.12),
            ),
            dialogue: StyleSpec::new(
                "dialogue",
                11.0,
                Color::rgb8(40, 20, 60),
                1.3,
                Jitter::new(1.5, 0.7, 0.2),
            ),
            month_banner: StyleSpec::new("title", 18.0, Color::rgb8(15, 15, 25), 1.3, Jitter::NONE),
            page_number: StyleSpec::new("body", 10.0, Color::rgb8(60, 60, 70), 1.0, Jitter::NONE),
        }
    }
}

impl StyleTable {
    /// The style for a block kind, or `None` for kinds that never draw text.
    pub fn for_kind(&self, kind: BlockKind) -> Option<&StyleSpec> {
        match kind {
            BlockKind::Paragraph => Some(&self.paragraph),
            BlockKind::Heading(HeadingLevel::Day) => Some(&self.heading),
            BlockKind::ListItem => Some(&self.list_item),
            BlockKind::Dialogue => Some(&self.dialogue),
            BlockKind::Heading(HeadingLevel::Title | HeadingLevel::Minor)
            | BlockKind::Blank
            | BlockKind::Skip => None,
        }
    }

    /// Rewrite roles the catalog has no font for onto roles it does have.
    ///
    /// A style keeps its role when no alternative is mapped either; the
    /// renderer's fallback chain takes it from there.
    pub fn adapted_to(&self, catalog: &ResourceCatalog) -> StyleTable {
        let mut table = self.clone();
        for spec in [
            &mut table.paragraph,
            &mut table.heading,
            &mut table.list_item,
            &mut table.dialogue,
            &mut table.month_banner,
            &mut table.page_number,
        ] {
            if let Some(role) = adapt_role(&spec.font_role, catalog) {
                spec.font_role = role.to_string();
            }
        }
        table
    }
}

fn adapt_role(role: &str, catalog: &ResourceCatalog) -> Option<&'static str> {
    if catalog.has_role(role) {
        return None;
    }
    let (_, alternatives) = ROLE_FALLBACKS.iter().find(|(r, _)| *r == role)?;
    alternatives.iter().copied().find(|alt| catalog.has_role(alt))
}
