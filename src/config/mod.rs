//! # Configuration
//!
//! Every layout constant the engine uses, loaded once from JSON before
//! layout begins. All fields are optional; anything left out takes the
//! notebook defaults.
//!
//! ```json
//! {
//!   "paper": "plain",
//!   "page": { "size": "A4", "lineHeightBase": 22 },
//!   "orphans": { "minFollowingLines": 2 },
//!   "seed": 7
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScrawlError;
use crate::model::{Edges, PageSize};
use crate::style::{Color, StyleTable};

/// The paper the document is written on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperStyle {
    /// Wide notebook margins; uses the background image when one exists.
    #[default]
    Notebook,
    /// Narrower margins, always the drawn ruled pattern.
    Plain,
}

impl PaperStyle {
    pub fn default_margins(self) -> Edges {
        match self {
            PaperStyle::Notebook => Edges::new(85.0, 78.0, 15.0, 60.0),
            PaperStyle::Plain => Edges::new(72.0, 60.0, 15.0, 60.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaperStyle::Notebook => "notebook",
            PaperStyle::Plain => "plain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSettings {
    pub size: PageSize,
    /// Overrides the paper style's margins when set.
    pub margins: Option<Edges>,
    /// Gap between the left margin and the text.
    pub text_area_padding: f64,
    /// Ruled-line height: spacing of the paper rules and unit of vertical advance.
    pub line_height_base: f64,
    /// Distance from the top margin down to the first baseline.
    pub top_offset: f64,
    /// Baseline of the page number.
    pub page_number_y: f64,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            size: PageSize::Letter,
            margins: None,
            text_area_padding: 5.0,
            line_height_base: 24.0,
            top_offset: 15.0,
            page_number_y: 0.55 * 72.0,
        }
    }
}

/// The procedurally drawn notebook paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RulingSettings {
    pub rule_color: Color,
    pub rule_width: f64,
    pub margin_rule_color: Color,
    pub margin_rule_width: f64,
    /// How far left of the left margin the red rule sits.
    pub margin_rule_offset: f64,
    pub binder_holes: bool,
    pub hole_x: f64,
    pub hole_radius: f64,
    /// Hole centers as fractions of the page height.
    pub hole_positions: Vec<f64>,
    pub hole_fill: Color,
    pub hole_stroke: Color,
}

impl Default for RulingSettings {
    fn default() -> Self {
        Self {
            rule_color: Color::rgb(0.7, 0.85, 0.95),
            rule_width: 0.5,
            margin_rule_color: Color::rgb(1.0, 0.4, 0.4),
            margin_rule_width: 1.2,
            margin_rule_offset: 25.0,
            binder_holes: true,
            hole_x: 35.0,
            hole_radius: 10.0,
            hole_positions: vec![0.15, 0.5, 0.85],
            hole_fill: Color::gray(0.92),
            hole_stroke: Color::gray(0.8),
        }
    }
}

/// Spacing multiples and indents used by the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpacingSettings {
    /// Advance of a blank block, as a multiple of the ruled-line height.
    pub blank_line: f64,
    /// Extra advance after a paragraph, as a multiple of its line height.
    pub after_paragraph: f64,
    pub before_heading: f64,
    pub after_heading: f64,
    pub dialogue_indent: f64,
    /// Dialogue is wrapped this much short of the right edge.
    pub dialogue_right_inset: f64,
    pub list_indent: f64,
    /// Bullet center, measured from the text start.
    pub bullet_offset: f64,
    /// Bullet radius as a fraction of the font size.
    pub bullet_radius: f64,
    /// Bullet center height above the baseline, as a fraction of the font size.
    pub bullet_rise: f64,
}

impl Default for SpacingSettings {
    fn default() -> Self {
        Self {
            blank_line: 0.5,
            after_paragraph: 0.0,
            before_heading: 0.4,
            after_heading: 0.3,
            dialogue_indent: 20.0,
            dialogue_right_inset: 20.0,
            list_indent: 20.0,
            bullet_offset: 8.0,
            bullet_radius: 0.15,
            bullet_rise: 0.30,
        }
    }
}

/// Thresholds for keeping day headings away from the bottom of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrphanSettings {
    pub min_following_lines: usize,
    /// Space left under the heading, as a fraction of the page height,
    /// below which the heading may be deferred.
    pub min_page_fraction: f64,
    /// How many blocks after the heading are inspected.
    pub lookahead_blocks: usize,
}

impl Default for OrphanSettings {
    fn default() -> Self {
        Self {
            min_following_lines: 3,
            min_page_fraction: 0.25,
            lookahead_blocks: 4,
        }
    }
}

fn default_system_font_dirs() -> Vec<PathBuf> {
    [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/Library/Fonts",
        "/System/Library/Fonts",
        "C:\\Windows\\Fonts",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub paper: PaperStyle,
    pub page: PageSettings,
    pub ruling: RulingSettings,
    pub spacing: SpacingSettings,
    pub orphans: OrphanSettings,
    pub styles: StyleTable,
    /// Catalog image name used as the notebook background.
    pub background_image: String,
    /// Fixed jitter seed. Unset means a fresh seed per document.
    pub seed: Option<u64>,
    /// Where generic fallback fonts are looked up.
    pub system_font_dirs: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paper: PaperStyle::Notebook,
            page: PageSettings::default(),
            ruling: RulingSettings::default(),
            spacing: SpacingSettings::default(),
            orphans: OrphanSettings::default(),
            styles: StyleTable::default(),
            background_image: "single_page".to_string(),
            seed: None,
            system_font_dirs: default_system_font_dirs(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ScrawlError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ScrawlError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScrawlError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Explicit margins, or the paper style's.
    pub fn margins(&self) -> Edges {
        self.page.margins.unwrap_or_else(|| self.paper.default_margins())
    }

    pub fn page_dimensions(&self) -> (f64, f64) {
        self.page.size.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_the_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_json(
            r#"{ "paper": "plain", "orphans": { "minFollowingLines": 2 }, "seed": 42 }"#,
        )
        .unwrap();
        assert_eq!(config.paper, PaperStyle::Plain);
        assert_eq!(config.orphans.min_following_lines, 2);
        assert_eq!(config.orphans.lookahead_blocks, 4);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.margins(), Edges::new(72.0, 60.0, 15.0, 60.0));
    }

    #[test]
    fn explicit_margins_win() {
        let config = Config::from_json(
            r#"{ "page": { "margins": { "top": 10, "right": 10, "bottom": 10, "left": 10 } } }"#,
        )
        .unwrap();
        assert_eq!(config.margins().left, 10.0);
        assert_eq!(config.page.line_height_base, 24.0);
    }

    #[test]
    fn custom_page_size() {
        let config =
            Config::from_json(r#"{ "page": { "size": { "Custom": { "width": 400, "height": 500 } } } }"#)
                .unwrap();
        assert_eq!(config.page_dimensions(), (400.0, 500.0));
    }

    #[test]
    fn bad_json_is_a_config_error() {
        let err = Config::from_json(r#"{ "seed": "many" }"#).unwrap_err();
        assert!(matches!(err, ScrawlError::Config { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load(Path::new("/no/such/scrawl.json")).unwrap_err();
        assert!(matches!(err, ScrawlError::Io { .. }));
    }
}
