//! # Page Compiler
//!
//! Owns the page lifecycle. `begin_page` paints the paper and stamps the
//! page number, the layout engine and renderer draw onto [`PageCompiler::surface`],
//! `finalize` closes the page, and `finish_document` hands every closed
//! page, the document's fonts, and its images to the PDF writer.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner.

use log::{debug, warn};

use crate::catalog::ResourceCatalog;
use crate::config::{Config, PaperStyle, RulingSettings};
use crate::font::FontRegistry;
use crate::image_loader::{load_background, LoadedImage};
use crate::model::{Edges, Metadata};
use crate::render::Renderer;
use crate::style::{Color, StyleSpec};

/// Why a line of text was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Heading,
    Paragraph,
    ListItem,
    Dialogue,
    MonthBanner,
    PageNumber,
}

/// One drawn line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub text: String,
    /// Baseline start, after jitter.
    pub x: f64,
    pub y: f64,
    /// Degrees, counter-clockwise.
    pub rotation: f64,
    pub font: crate::font::FontId,
    pub size: f64,
    pub color: Color,
    pub role: LineRole,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextOp),
    Line {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Color,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Option<Color>,
        stroke: Option<Color>,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    /// An image from [`CompiledDocument::images`] stretched over a rectangle.
    Image {
        index: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Image(usize),
    Ruled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: u32,
    pub background: Background,
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn new(number: u32, background: Background) -> Self {
        Self {
            number,
            background,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// All text drawn on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn texts_with_role(&self, role: LineRole) -> impl Iterator<Item = &TextOp> {
        self.texts().filter(move |t| t.role == role)
    }
}

/// Everything the PDF writer needs.
#[derive(Debug, Clone)]
pub struct CompiledDocument {
    pub width: f64,
    pub height: f64,
    pub pages: Vec<Page>,
    pub fonts: FontRegistry,
    pub images: Vec<LoadedImage>,
    pub metadata: Metadata,
}

pub struct PageCompiler {
    width: f64,
    height: f64,
    margins: Edges,
    line_height_base: f64,
    ruling: RulingSettings,
    page_number_style: StyleSpec,
    page_number_y: f64,
    background: Background,
    images: Vec<LoadedImage>,
    open: Option<Page>,
    pages: Vec<Page>,
}

impl PageCompiler {
    /// Set up the paper. A notebook background image that is missing or
    /// undecodable degrades to the ruled pattern with a warning.
    pub fn new(config: &Config, catalog: &ResourceCatalog, page_number_style: StyleSpec) -> Self {
        let (width, height) = config.page_dimensions();
        let mut images = Vec::new();
        let background = match config.paper {
            PaperStyle::Plain => Background::Ruled,
            PaperStyle::Notebook => match catalog.get_image(&config.background_image) {
                Some(handle) => match load_background(&handle.path) {
                    Ok(image) => {
                        debug!("background image {}", handle.path.display());
                        images.push(image);
                        Background::Image(0)
                    }
                    Err(e) => {
                        warn!("background image unusable, drawing ruled paper: {}", e);
                        Background::Ruled
                    }
                },
                None => {
                    warn!(
                        "no '{}' background image, drawing ruled paper",
                        config.background_image
                    );
                    Background::Ruled
                }
            },
        };

        Self {
            width,
            height,
            margins: config.margins(),
            line_height_base: config.page.line_height_base,
            ruling: config.ruling.clone(),
            page_number_style,
            page_number_y: config.page.page_number_y,
            background,
            images,
            open: None,
            pages: Vec::new(),
        }
    }

    /// Open a new page: paper first, then the centered page number.
    pub fn begin_page(&mut self, number: u32, renderer: &mut Renderer) {
        self.finalize();
        let mut page = Page::new(number, self.background);
        match self.background {
            Background::Image(index) => page.push(DrawOp::Image {
                index,
                x: 0.0,
                y: 0.0,
                width: self.width,
                height: self.height,
            }),
            Background::Ruled => self.draw_ruled_paper(&mut page),
        }

        let label = number.to_string();
        let label_width = renderer.measure(&self.page_number_style, &label);
        let x = (self.width - label_width) / 2.0;
        renderer.draw_steady(
            &mut page,
            &label,
            x,
            self.page_number_y,
            &self.page_number_style,
            LineRole::PageNumber,
        );

        debug!("page {} opened", number);
        self.open = Some(page);
    }

    fn draw_ruled_paper(&self, page: &mut Page) {
        let r = &self.ruling;
        page.push(DrawOp::FillRect {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.height,
            color: Color::WHITE,
        });

        let top = self.height - self.margins.top;
        let mut y = top;
        while y >= self.margins.bottom && self.line_height_base > 0.0 {
            page.push(DrawOp::Line {
                from: (self.margins.left, y),
                to: (self.width - self.margins.right, y),
                width: r.rule_width,
                color: r.rule_color,
            });
            y -= self.line_height_base;
        }

        let margin_x = self.margins.left - r.margin_rule_offset;
        page.push(DrawOp::Line {
            from: (margin_x, top),
            to: (margin_x, self.margins.bottom),
            width: r.margin_rule_width,
            color: r.margin_rule_color,
        });

        if r.binder_holes {
            for fraction in &r.hole_positions {
                page.push(DrawOp::Circle {
                    cx: r.hole_x,
                    cy: self.height * fraction,
                    r: r.hole_radius,
                    fill: Some(r.hole_fill),
                    stroke: Some(r.hole_stroke),
                });
            }
        }
    }

    /// The page currently being drawn on. Opens a bare page (no paper, no
    /// number) if layout draws before any `begin_page`.
    pub fn surface(&mut self) -> &mut Page {
        let number = self.pages.len() as u32 + 1;
        let background = self.background;
        self.open.get_or_insert_with(|| Page::new(number, background))
    }

    pub fn current(&self) -> Option<&Page> {
        self.open.as_ref()
    }

    /// Close the open page, if any, and append it to the document.
    pub fn finalize(&mut self) {
        if let Some(page) = self.open.take() {
            self.pages.push(page);
        }
    }

    /// Closed pages so far.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn finish_document(mut self, fonts: FontRegistry, metadata: Metadata) -> CompiledDocument {
        self.finalize();
        CompiledDocument {
            width: self.width,
            height: self.height,
            pages: self.pages,
            fonts,
            images: self.images,
            metadata,
        }
    }
}
