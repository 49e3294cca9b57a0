//! # Document Model
//!
//! The parsed representation of a notebook document. The parser turns every
//! input line into a [`Block`]; the layout engine consumes the blocks in order.
//!
//! Page geometry types live here too, since both the configuration layer and
//! the page compiler need them.

use serde::{Deserialize, Serialize};

/// One classified unit of input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Normalized text, ready to draw.
    pub text: String,
    /// The source line exactly as it appeared in the input.
    pub raw: String,
}

impl Block {
    pub fn new(kind: BlockKind, text: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            raw: raw.into(),
        }
    }

    /// A blank block with no source line, used for paragraph spacing.
    pub fn blank() -> Self {
        Self::new(BlockKind::Blank, "", "")
    }

    /// Whether this block contributes anything to the page.
    pub fn is_rendered(&self) -> bool {
        self.kind.is_rendered()
    }
}

/// The kind of a [`Block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading(HeadingLevel),
    ListItem,
    Dialogue,
    Paragraph,
    Blank,
    Skip,
}

impl BlockKind {
    /// Whether the layout engine draws blocks of this kind.
    ///
    /// Titles and minor headings are parsed as distinct kinds but, like
    /// `Skip`, never reach the page.
    pub fn is_rendered(self) -> bool {
        match self {
            BlockKind::Heading(HeadingLevel::Day) => true,
            BlockKind::Heading(HeadingLevel::Title | HeadingLevel::Minor) => false,
            BlockKind::ListItem | BlockKind::Dialogue | BlockKind::Paragraph | BlockKind::Blank => {
                true
            }
            BlockKind::Skip => false,
        }
    }

    /// Whether this kind is body content (counted by the orphan lookahead).
    pub fn is_content(self) -> bool {
        matches!(
            self,
            BlockKind::ListItem | BlockKind::Dialogue | BlockKind::Paragraph
        )
    }
}

/// Heading depth, after the weekday filter has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    /// A single-`#` document title.
    Title,
    /// A `##`/`###` heading that names a weekday.
    Day,
    /// A `####` (or deeper) emphasis heading.
    Minor,
}

/// Document metadata embedded in the output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
}

impl Metadata {
    /// Take the first document title among the blocks, if any.
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let title = blocks
            .iter()
            .find(|b| b.kind == BlockKind::Heading(HeadingLevel::Title))
            .map(|b| b.text.clone())
            .filter(|t| !t.is_empty());
        Self { title }
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    Letter,
    A4,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for page margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }
}
