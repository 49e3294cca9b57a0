//! # Layout Engine
//!
//! The page-aware core. Blocks are consumed strictly in order; each one is a
//! state transition `(Block, LayoutState) -> (draw ops, LayoutState')`.
//!
//! ## Vertical model
//!
//! `cursor_y` is the baseline of the next line, in PDF points measured up
//! from the bottom edge. Every drawn line advances it by
//! `line_height_base * style.line_spacing`. Before any line is drawn the
//! page-break rule runs: when `cursor_y < bottom_margin + line_height` the
//! page is finalized, a fresh one is begun, and `cursor_y` returns to the
//! top baseline. A `Blank` block right after a break is swallowed.
//!
//! ## Day headings
//!
//! Before a day heading the engine looks ahead a few blocks, wraps the
//! content it finds, and lets [`page_break::decide_heading_break`] decide
//! whether the heading should open the next page instead. The first time a
//! month is named in a heading's source line, a centered month banner is
//! drawn above it.
//!
//! Wrapping and pagination depend only on the input and font metrics. The
//! renderer's jitter is applied to final positions and never feeds back.

pub mod page_break;

use std::collections::BTreeSet;

use log::debug;

use crate::catalog::ResourceCatalog;
use crate::config::Config;
use crate::model::{Block, BlockKind, HeadingLevel, Metadata};
use crate::page::{CompiledDocument, LineRole, Page, PageCompiler};
use crate::render::Renderer;
use crate::style::{StyleSpec, StyleTable};
use crate::text::{TextLayout, WrappedLine};

use page_break::{decide_heading_break, BreakDecision, HeadingRoom};

const MONTHS: [(&str, &str); 12] = [
    ("january", "January"),
    ("february", "February"),
    ("march", "March"),
    ("april", "April"),
    ("may", "May"),
    ("june", "June"),
    ("july", "July"),
    ("august", "August"),
    ("september", "September"),
    ("october", "October"),
    ("november", "November"),
    ("december", "December"),
];

/// The first month named as a whole word in `text`, capitalized.
pub fn month_in(text: &str) -> Option<&'static str> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .find_map(|word| {
            let word = word.to_lowercase();
            MONTHS
                .iter()
                .find(|(lower, _)| *lower == word)
                .map(|(_, name)| *name)
        })
}

/// Running state of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    /// Baseline of the next line.
    pub cursor_y: f64,
    pub page_number: u32,
    /// True until the first line is drawn on the current page.
    pub at_page_start: bool,
    /// Lower-cased months whose banner has been drawn.
    pub months_seen: BTreeSet<String>,
}

/// Page geometry derived once from the configuration.
#[derive(Debug, Clone, Copy)]
struct Geometry {
    width: f64,
    height: f64,
    text_x: f64,
    content_width: f64,
    top_y: f64,
    bottom: f64,
}

impl Geometry {
    fn from_config(config: &Config) -> Self {
        let (width, height) = config.page_dimensions();
        let margins = config.margins();
        let padding = config.page.text_area_padding;
        Self {
            width,
            height,
            text_x: margins.left + padding,
            content_width: width - margins.horizontal() - 2.0 * padding,
            top_y: height - margins.top - config.page.top_offset,
            bottom: margins.bottom,
        }
    }
}

pub struct LayoutEngine<'a> {
    config: &'a Config,
    catalog: &'a ResourceCatalog,
    seed: Option<u64>,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a Config, catalog: &'a ResourceCatalog) -> Self {
        Self {
            config,
            catalog,
            seed: config.seed,
        }
    }

    /// Fix the jitter sequence, overriding the configured seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Start a document: page 1 is open and the cursor is at its top.
    pub fn session(&self) -> LayoutSession<'a> {
        LayoutSession::new(self.config, self.catalog, self.seed)
    }

    /// Lay out a whole block sequence.
    pub fn layout(&self, blocks: &[Block]) -> CompiledDocument {
        let mut session = self.session();
        for index in 0..blocks.len() {
            session.process(blocks, index);
        }
        session.finish(Metadata::from_blocks(blocks))
    }
}

/// One document in progress.
pub struct LayoutSession<'a> {
    config: &'a Config,
    styles: StyleTable,
    geometry: Geometry,
    renderer: Renderer<'a>,
    compiler: PageCompiler,
    text: TextLayout,
    state: LayoutState,
}

impl<'a> LayoutSession<'a> {
    fn new(config: &'a Config, catalog: &'a ResourceCatalog, seed: Option<u64>) -> Self {
        let styles = config.styles.adapted_to(catalog);
        let geometry = Geometry::from_config(config);
        let mut renderer = Renderer::new(catalog, seed);
        let mut compiler = PageCompiler::new(config, catalog, styles.page_number.clone());
        compiler.begin_page(1, &mut renderer);

        Self {
            config,
            styles,
            geometry,
            renderer,
            compiler,
            text: TextLayout::new(),
            state: LayoutState {
                cursor_y: geometry.top_y,
                page_number: 1,
                at_page_start: true,
                months_seen: BTreeSet::new(),
            },
        }
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    /// The page being drawn on.
    pub fn current_page(&self) -> Option<&Page> {
        self.compiler.current()
    }

    /// Left edge of body text.
    pub fn text_x(&self) -> f64 {
        self.geometry.text_x
    }

    /// Advance of one line in the given style.
    pub fn line_height(&self, style: &StyleSpec) -> f64 {
        style.line_height(self.config.page.line_height_base)
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Process `blocks[index]`. The rest of the slice is only read, for the
    /// orphan-heading lookahead.
    pub fn process(&mut self, blocks: &[Block], index: usize) {
        let Some(block) = blocks.get(index) else {
            return;
        };
        match block.kind {
            BlockKind::Blank => self.blank(),
            BlockKind::Skip | BlockKind::Heading(HeadingLevel::Title | HeadingLevel::Minor) => {}
            BlockKind::Heading(HeadingLevel::Day) => self.day_heading(blocks, index),
            BlockKind::Paragraph => self.paragraph(block),
            BlockKind::ListItem => self.list_item(block),
            BlockKind::Dialogue => self.dialogue(block),
        }
    }

    /// Close the last page and hand everything over for serialization.
    pub fn finish(self, metadata: Metadata) -> CompiledDocument {
        let fonts = self.renderer.into_fonts();
        self.compiler.finish_document(fonts, metadata)
    }

    fn blank(&mut self) {
        if self.state.at_page_start {
            return;
        }
        self.state.cursor_y -= self.config.page.line_height_base * self.config.spacing.blank_line;
    }

    fn paragraph(&mut self, block: &Block) {
        let style = self.styles.paragraph.clone();
        let lines = self.wrap(&block.text, &style, self.geometry.content_width);
        let x = self.geometry.text_x;
        self.draw_lines(&lines, x, &style, LineRole::Paragraph, None);
        self.state.cursor_y -= self.line_height(&style) * self.config.spacing.after_paragraph;
    }

    fn list_item(&mut self, block: &Block) {
        let style = self.styles.list_item.clone();
        let spacing = &self.config.spacing;
        let width = self.geometry.content_width - spacing.list_indent;
        let x = self.geometry.text_x + spacing.list_indent;
        let bullet = Bullet {
            x: self.geometry.text_x + spacing.bullet_offset,
            rise: style.size * spacing.bullet_rise,
            radius: style.size * spacing.bullet_radius,
        };
        let lines = self.wrap(&block.text, &style, width);
        self.draw_lines(&lines, x, &style, LineRole::ListItem, Some(bullet));
    }

    fn dialogue(&mut self, block: &Block) {
        let style = self.styles.dialogue.clone();
        let spacing = &self.config.spacing;
        let width = self.geometry.content_width - spacing.dialogue_indent - spacing.dialogue_right_inset;
        let x = self.geometry.text_x + spacing.dialogue_indent;
        let lines = self.wrap(&block.text, &style, width);
        self.draw_lines(&lines, x, &style, LineRole::Dialogue, None);
    }

    fn day_heading(&mut self, blocks: &[Block], index: usize) {
        let block = &blocks[index];
        let style = self.styles.heading.clone();
        let line_height = self.line_height(&style);
        let spacing = &self.config.spacing;

        let month = month_in(&block.raw)
            .filter(|m| !self.state.months_seen.contains(&m.to_lowercase()));
        let banner_height = match month {
            Some(_) => self.line_height(&self.styles.month_banner),
            None => 0.0,
        };
        let before = if self.state.at_page_start {
            0.0
        } else {
            line_height * spacing.before_heading
        };
        let room = HeadingRoom {
            needed: before + banner_height + line_height,
            after: line_height * spacing.after_heading,
        };

        let following = self.lookahead_lines(blocks, index);
        let available = self.state.cursor_y - self.geometry.bottom;
        let decision = decide_heading_break(
            available,
            room,
            &following,
            self.geometry.height,
            &self.config.orphans,
        );
        if decision == BreakDecision::MoveToNextPage && !self.state.at_page_start {
            debug!("deferring heading '{}' to avoid an orphan", block.text);
            self.break_page();
        }

        if !self.state.at_page_start {
            self.state.cursor_y -= line_height * self.config.spacing.before_heading;
        }
        if let Some(month) = month {
            self.month_banner(month);
        }

        let lines = self.wrap(&block.text, &style, self.geometry.content_width);
        let x = self.geometry.text_x;
        self.draw_lines(&lines, x, &style, LineRole::Heading, None);
        self.state.cursor_y -= line_height * self.config.spacing.after_heading;
    }

    fn month_banner(&mut self, month: &str) {
        let style = self.styles.month_banner.clone();
        let line_height = self.line_height(&style);
        self.ensure_room(line_height);

        let width = self.renderer.measure(&style, month);
        let x = (self.geometry.width - width) / 2.0;
        let y = self.state.cursor_y;
        self.renderer
            .draw_steady(self.compiler.surface(), month, x, y, &style, LineRole::MonthBanner);

        self.state.months_seen.insert(month.to_lowercase());
        self.state.cursor_y -= line_height;
        self.state.at_page_start = false;
    }

    /// Heights of the content lines that follow a heading, up to the next
    /// day heading or the lookahead limit. Blank advances and paragraph
    /// spacing are folded into the height of the line after them.
    fn lookahead_lines(&mut self, blocks: &[Block], index: usize) -> Vec<f64> {
        let mut heights = Vec::new();
        let mut gap = 0.0;
        let limit = self.config.orphans.lookahead_blocks;
        for block in blocks.iter().skip(index + 1).take(limit) {
            match block.kind {
                BlockKind::Heading(HeadingLevel::Day) => break,
                BlockKind::Blank => {
                    gap += self.config.page.line_height_base * self.config.spacing.blank_line;
                    continue;
                }
                _ => {}
            }
            let Some((style, width)) = self.wrap_spec(block.kind) else {
                continue;
            };
            let font = self.renderer.set_style(&style.font_role, style.size);
            let fonts = self.renderer.fonts();
            let count = self
                .text
                .count_lines(&block.text, width, |s| fonts.measure(font, s, style.size));
            let line_height = self.line_height(&style);
            for _ in 0..count {
                heights.push(line_height + gap);
                gap = 0.0;
            }
            if block.kind == BlockKind::Paragraph {
                gap += line_height * self.config.spacing.after_paragraph;
            }
        }
        heights
    }

    /// Style and wrap width for a content kind.
    fn wrap_spec(&self, kind: BlockKind) -> Option<(StyleSpec, f64)> {
        if !kind.is_content() {
            return None;
        }
        let style = self.styles.for_kind(kind)?.clone();
        let spacing = &self.config.spacing;
        let width = match kind {
            BlockKind::ListItem => self.geometry.content_width - spacing.list_indent,
            BlockKind::Dialogue => {
                self.geometry.content_width - spacing.dialogue_indent - spacing.dialogue_right_inset
            }
            _ => self.geometry.content_width,
        };
        Some((style, width))
    }

    fn wrap(&mut self, text: &str, style: &StyleSpec, width: f64) -> Vec<WrappedLine> {
        let font = self.renderer.set_style(&style.font_role, style.size);
        let fonts = self.renderer.fonts();
        self.text
            .wrap(text, width, |s| fonts.measure(font, s, style.size))
    }

    fn draw_lines(
        &mut self,
        lines: &[WrappedLine],
        x: f64,
        style: &StyleSpec,
        role: LineRole,
        bullet: Option<Bullet>,
    ) {
        let line_height = self.line_height(style);
        for (i, line) in lines.iter().enumerate() {
            self.ensure_room(line_height);
            let y = self.state.cursor_y;
            let page = self.compiler.surface();
            if let (0, Some(b)) = (i, bullet) {
                self.renderer
                    .draw_bullet(page, b.x, y + b.rise, b.radius, style.color);
            }
            self.renderer.draw(page, &line.text, x, y, style, role);
            self.state.cursor_y -= line_height;
            self.state.at_page_start = false;
        }
    }

    /// Break the page if a line of `line_height` would not clear the bottom margin.
    fn ensure_room(&mut self, line_height: f64) {
        if self.state.cursor_y < self.geometry.bottom + line_height {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        self.state.page_number += 1;
        debug!("page break -> {}", self.state.page_number);
        self.compiler.begin_page(self.state.page_number, &mut self.renderer);
        self.state.cursor_y = self.geometry.top_y;
        self.state.at_page_start = true;
    }
}

#[derive(Debug, Clone, Copy)]
struct Bullet {
    x: f64,
    rise: f64,
    radius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::DrawOp;
    use crate::parser::parse_text;

    fn para(text: &str) -> Block {
        Block::new(BlockKind::Paragraph, text, text)
    }

    fn day(text: &str, raw: &str) -> Block {
        Block::new(BlockKind::Heading(HeadingLevel::Day), text, raw)
    }

    fn text_ops(page: &Page) -> usize {
        page.texts().count()
    }

    #[test]
    fn month_detection_needs_whole_words() {
        assert_eq!(month_in("## Monday, October 15th"), Some("October"));
        assert_eq!(month_in("## friday 3 MAY"), Some("May"));
        assert_eq!(month_in("## Mayday"), None);
    }

    #[test]
    fn simple_paragraph_advances_one_line() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let mut s = LayoutEngine::new(&config, &catalog).with_seed(1).session();
        let blocks = parse_text("This is a short sentence.");
        let before = s.state().cursor_y;
        s.process(&blocks, 0);

        let page = s.current_page().unwrap();
        assert_eq!(page.texts_with_role(LineRole::Paragraph).count(), 1);
        let lh = s.line_height(&s.styles().paragraph.clone());
        assert!((before - s.state().cursor_y - lh).abs() < 1e-9);
    }

    #[test]
    fn skip_draws_nothing_and_does_not_move() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let mut s = LayoutEngine::new(&config, &catalog).session();
        let blocks = parse_text("## Some Random Title");
        assert_eq!(blocks[0].kind, BlockKind::Skip);

        let ops_before = s.current_page().unwrap().ops.len();
        let state_before = s.state().clone();
        s.process(&blocks, 0);
        assert_eq!(s.current_page().unwrap().ops.len(), ops_before);
        assert_eq!(s.state(), &state_before);
    }

    #[test]
    fn blank_at_page_start_is_swallowed() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let mut s = LayoutEngine::new(&config, &catalog).session();
        let blocks = vec![para("one"), Block::blank()];

        let top = s.state().cursor_y;
        s.process(&blocks, 1);
        assert_eq!(s.state().cursor_y, top);

        s.process(&blocks, 0);
        let after_line = s.state().cursor_y;
        s.process(&blocks, 1);
        assert!((after_line - s.state().cursor_y - 12.0).abs() < 1e-9);

        s.break_page();
        let fresh = s.state().cursor_y;
        s.process(&blocks, 1);
        assert_eq!(s.state().cursor_y, fresh);
    }

    #[test]
    fn list_items_share_indent_and_get_bullets() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let mut s = LayoutEngine::new(&config, &catalog).with_seed(4).session();
        let blocks = parse_text("- buy milk\n- walk dog");
        s.process(&blocks, 0);
        s.process(&blocks, 1);

        let page = s.current_page().unwrap();
        let bullets: Vec<f64> = page
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Circle { cx, stroke: None, .. } => Some(*cx),
                _ => None,
            })
            .collect();
        assert_eq!(bullets.len(), 2);
        assert_eq!(bullets[0], bullets[1]);

        let indent = s.text_x() + config.spacing.list_indent;
        let jitter = s.styles().list_item.jitter.x;
        for op in page.texts_with_role(LineRole::ListItem) {
            assert!((op.x - indent).abs() <= jitter);
        }
    }

    #[test]
    fn dialogue_is_indented_and_keeps_quotes() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let mut s = LayoutEngine::new(&config, &catalog).with_seed(9).session();
        let blocks = parse_text("\"Hello there!\"");
        s.process(&blocks, 0);

        let op = s
            .current_page()
            .unwrap()
            .texts_with_role(LineRole::Dialogue)
            .next()
            .unwrap()
            .clone();
        assert_eq!(op.text, "\"Hello there!\"");
        let jitter = s.styles().dialogue.jitter.x;
        assert!(op.x - s.text_x() >= config.spacing.dialogue_indent - jitter);
    }

    #[test]
    fn long_text_paginates_with_increasing_numbers() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let blocks: Vec<Block> = (0..120).map(|i| para(&format!("line number {}", i))).collect();
        let doc = LayoutEngine::new(&config, &catalog).with_seed(2).layout(&blocks);

        assert!(doc.pages.len() > 1);
        for (i, page) in doc.pages.iter().enumerate() {
            assert_eq!(page.number, i as u32 + 1);
            let stamped = page.texts_with_role(LineRole::PageNumber).next().unwrap();
            assert_eq!(stamped.text, page.number.to_string());
        }
        let drawn: usize = doc
            .pages
            .iter()
            .map(|p| p.texts_with_role(LineRole::Paragraph).count())
            .sum();
        assert_eq!(drawn, 120);
    }

    #[test]
    fn lines_never_start_below_the_break_line() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let blocks: Vec<Block> = (0..80).map(|_| para("filler text that wraps a little")).collect();
        let doc = LayoutEngine::new(&config, &catalog).with_seed(2).layout(&blocks);
        let lh = config.styles.paragraph.line_height(config.page.line_height_base);
        let jitter = config.styles.paragraph.jitter.y;
        for page in &doc.pages {
            for op in page.texts_with_role(LineRole::Paragraph) {
                assert!(op.y >= config.margins().bottom + lh - jitter);
            }
        }
    }

    /// Feed one-line paragraphs until the cursor is inside the bottom 20% of
    /// the page, then return how many were fed.
    fn fill_to_bottom_fifth(s: &mut LayoutSession, blocks: &[Block]) -> usize {
        let (_, height) = Config::default().page_dimensions();
        let limit = Config::default().margins().bottom + 0.2 * height;
        let mut fed = 0;
        while s.state().cursor_y >= limit {
            s.process(blocks, 0);
            fed += 1;
            assert!(fed < 100);
        }
        fed
    }

    fn heading_page(config: &Config) -> (u32, u32) {
        let catalog = ResourceCatalog::empty();
        let mut s = LayoutEngine::new(config, &catalog).with_seed(3).session();
        let filler = vec![para("Filler line.")];
        fill_to_bottom_fifth(&mut s, &filler);
        let page_before = s.state().page_number;

        let tail = vec![day("Tuesday", "## Tuesday"), para("Short.")];
        s.process(&tail, 0);
        s.process(&tail, 1);
        let doc = s.finish(Metadata::default());
        let heading_page = doc
            .pages
            .iter()
            .find(|p| p.texts_with_role(LineRole::Heading).next().is_some())
            .map(|p| p.number)
            .unwrap();
        (page_before, heading_page)
    }

    #[test]
    fn heading_near_page_bottom_is_deferred() {
        let (before, heading) = heading_page(&Config::default());
        assert_eq!(before, 1);
        assert_eq!(heading, 2);
    }

    #[test]
    fn naive_placement_keeps_heading_on_the_page() {
        let mut config = Config::default();
        config.orphans.min_page_fraction = 0.0;
        let (before, heading) = heading_page(&config);
        assert_eq!(before, 1);
        assert_eq!(heading, 1);
    }

    /// Page number of the first text op matching `pred`.
    fn page_of(doc: &CompiledDocument, pred: impl Fn(&crate::page::TextOp) -> bool) -> Option<u32> {
        doc.pages
            .iter()
            .find(|p| p.texts().any(|t| pred(t)))
            .map(|p| p.number)
    }

    /// A session whose cursor sits `under` points below a day heading's
    /// room, measured from the bottom margin.
    fn session_with_room<'a>(config: &'a Config, catalog: &'a ResourceCatalog, under: f64) -> LayoutSession<'a> {
        let mut s = LayoutEngine::new(config, catalog).with_seed(5).session();
        let heading = s.line_height(&s.styles().heading.clone());
        let spacing = &config.spacing;
        s.state.at_page_start = false;
        s.state.cursor_y = config.margins().bottom
            + heading * (spacing.before_heading + 1.0 + spacing.after_heading)
            + under;
        s
    }

    #[test]
    fn heading_stays_with_its_line_across_the_page_bottom() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let tail = vec![day("Tuesday", "## Tuesday"), para("Short.")];
        let mut stranded = Vec::new();
        for y in 62..=220 {
            let mut s = LayoutEngine::new(&config, &catalog).with_seed(5).session();
            s.state.cursor_y = y as f64;
            s.state.at_page_start = false;
            s.process(&tail, 0);
            s.process(&tail, 1);
            let doc = s.finish(Metadata::default());
            let heading = page_of(&doc, |t| t.role == LineRole::Heading);
            let line = page_of(&doc, |t| t.text == "Short.");
            if heading != line {
                stranded.push(y);
            }
        }
        assert!(stranded.is_empty(), "heading apart from its line at cursor_y {:?}", stranded);
    }

    #[test]
    fn parsed_heading_near_bottom_keeps_its_line() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let mut input = "Filler line.\n".repeat(18);
        input.push_str("\"Hi.\"\n\"Bye.\"\n\n## Tuesday\nShort.");
        let doc = LayoutEngine::new(&config, &catalog)
            .with_seed(6)
            .layout(&parse_text(&input));
        let heading = page_of(&doc, |t| t.role == LineRole::Heading);
        assert!(heading.is_some());
        assert_eq!(heading, page_of(&doc, |t| t.text == "Short."));
    }

    #[test]
    fn lookahead_stops_at_the_next_day_heading() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let long = "a long paragraph that keeps going ".repeat(20);
        let blocks = vec![
            day("Monday", "## Monday"),
            para("Short."),
            day("Tuesday", "## Tuesday"),
            para(&long),
        ];

        let lh = config.styles.paragraph.line_height(config.page.line_height_base);
        let mut s = session_with_room(&config, &catalog, 4.0 * lh + 1.0);
        assert_eq!(s.lookahead_lines(&blocks, 0).len(), 1);

        // Room for four lines, but only one belongs to Monday
        s.process(&blocks, 0);
        let doc = s.finish(Metadata::default());
        assert_eq!(page_of(&doc, |t| t.text == "Monday"), Some(2));
    }

    #[test]
    fn skip_uses_up_the_lookahead_budget() {
        let mut config = Config::default();
        config.orphans.lookahead_blocks = 1;
        let catalog = ResourceCatalog::empty();
        let blocks = vec![
            day("Tuesday", "## Tuesday"),
            Block::new(BlockKind::Skip, "Shopping List", "## Shopping List"),
            para("Short."),
        ];

        let lh = config.styles.paragraph.line_height(config.page.line_height_base);
        let mut s = session_with_room(&config, &catalog, lh + 5.0);
        assert!(s.lookahead_lines(&blocks, 0).is_empty());

        for i in 0..blocks.len() {
            s.process(&blocks, i);
        }
        let doc = s.finish(Metadata::default());
        assert_eq!(page_of(&doc, |t| t.text == "Tuesday"), Some(1));
        assert_eq!(page_of(&doc, |t| t.text == "Short."), Some(1));
    }

    #[test]
    fn lookahead_counts_the_blank_before_content() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let blocks = vec![day("Tuesday", "## Tuesday"), Block::blank(), para("Short.")];
        let mut s = LayoutEngine::new(&config, &catalog).session();

        let lh = s.line_height(&s.styles().paragraph.clone());
        let blank = config.page.line_height_base * config.spacing.blank_line;
        let heights = s.lookahead_lines(&blocks, 0);
        assert_eq!(heights.len(), 1);
        assert!((heights[0] - lh - blank).abs() < 1e-9);
    }

    #[test]
    fn month_banner_appears_once() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let blocks = parse_text(
            "## Monday, October 1st\nOne.\n## Tuesday, October 2nd\nTwo.\n## Wednesday, October 3rd\nThree.",
        );
        let doc = LayoutEngine::new(&config, &catalog).with_seed(8).layout(&blocks);
        let page = &doc.pages[0];

        let banners: Vec<_> = page.texts_with_role(LineRole::MonthBanner).collect();
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].text, "October");

        let first_banner = page.ops.iter().position(|op| matches!(op, DrawOp::Text(t) if t.role == LineRole::MonthBanner));
        let first_heading = page.ops.iter().position(|op| matches!(op, DrawOp::Text(t) if t.role == LineRole::Heading));
        assert!(first_banner < first_heading);
        assert_eq!(page.texts_with_role(LineRole::Heading).count(), 3);
    }

    #[test]
    fn banner_is_centered_and_steady() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let blocks = parse_text("## Friday, March 3");
        let doc = LayoutEngine::new(&config, &catalog).with_seed(8).layout(&blocks);
        let banner = doc.pages[0].texts_with_role(LineRole::MonthBanner).next().unwrap();
        assert_eq!(banner.rotation, 0.0);
        let width = doc.fonts.measure(banner.font, "March", banner.size);
        assert!((banner.x + width / 2.0 - 306.0).abs() < 1e-9);
    }

    #[test]
    fn empty_document_is_one_numbered_page() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let doc = LayoutEngine::new(&config, &catalog).layout(&[]);
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(text_ops(&doc.pages[0]), 1);
    }

    #[test]
    fn titles_become_metadata_not_ink() {
        let config = Config::default();
        let catalog = ResourceCatalog::empty();
        let blocks = parse_text("# Greg's Week\n\n## Monday\nHi.");
        let doc = LayoutEngine::new(&config, &catalog).with_seed(1).layout(&blocks);
        assert_eq!(doc.metadata.title.as_deref(), Some("Greg's Week"));
        assert!(doc.pages[0].texts().all(|t| t.text != "Greg's Week"));
    }
}
