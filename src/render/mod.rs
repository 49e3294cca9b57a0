//! # Renderer
//!
//! Turns "draw this text here in this style" into a positioned, perturbed
//! [`TextOp`] on the current page.
//!
//! Fonts are resolved per `(role, size)` and cached for the life of one
//! document. The resolution chain is: the catalog's answer for the role,
//! then each generic system fallback, then built-in Helvetica. A candidate
//! that fails to load is logged and skipped, so resolution always succeeds.
//!
//! Jitter comes from a seedable [`fastrand::Rng`] owned by the renderer and
//! only ever touches final positions, never wrapping or pagination.

use std::collections::HashMap;

use log::warn;

use crate::catalog::{FontHandle, ResourceCatalog};
use crate::font::{FontId, FontRegistry};
use crate::page::{DrawOp, LineRole, Page, TextOp};
use crate::style::{Color, Jitter, StyleSpec};

pub struct Renderer<'a> {
    catalog: &'a ResourceCatalog,
    fonts: FontRegistry,
    cache: HashMap<(String, u32), FontId>,
    rng: fastrand::Rng,
}

impl<'a> Renderer<'a> {
    /// A renderer with its own font registry. `seed` fixes the jitter sequence.
    pub fn new(catalog: &'a ResourceCatalog, seed: Option<u64>) -> Self {
        Self {
            catalog,
            fonts: FontRegistry::new(),
            cache: HashMap::new(),
            rng: match seed {
                Some(seed) => fastrand::Rng::with_seed(seed),
                None => fastrand::Rng::new(),
            },
        }
    }

    /// Resolve (and cache) the face for a role at a size.
    pub fn set_style(&mut self, role: &str, size: f64) -> FontId {
        let key = (role.to_string(), (size * 100.0).round() as u32);
        if let Some(&id) = self.cache.get(&key) {
            return id;
        }
        let id = self.resolve(role);
        self.cache.insert(key, id);
        id
    }

    fn resolve(&mut self, role: &str) -> FontId {
        let candidates: Vec<FontHandle> = self
            .catalog
            .get_font(role)
            .into_iter()
            .chain(self.catalog.system_fallbacks())
            .cloned()
            .collect();

        for handle in &candidates {
            match self.fonts.register(handle) {
                Ok(id) => return id,
                Err(e) => warn!("font for role '{}' unusable, trying next: {}", role, e),
            }
        }

        if candidates.is_empty() {
            warn!("no font for role '{}', using built-in Helvetica", role);
        }
        self.fonts.builtin()
    }

    /// Width of `text` in the style's face and size.
    pub fn measure(&mut self, style: &StyleSpec, text: &str) -> f64 {
        let font = self.set_style(&style.font_role, style.size);
        self.fonts.measure(font, text, style.size)
    }

    /// Draw one line with the style's jitter.
    pub fn draw(&mut self, page: &mut Page, text: &str, x: f64, y: f64, style: &StyleSpec, role: LineRole) {
        self.draw_with_jitter(page, text, x, y, style, style.jitter, role);
    }

    /// Draw one line exactly where asked.
    pub fn draw_steady(&mut self, page: &mut Page, text: &str, x: f64, y: f64, style: &StyleSpec, role: LineRole) {
        self.draw_with_jitter(page, text, x, y, style, Jitter::NONE, role);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_with_jitter(
        &mut self,
        page: &mut Page,
        text: &str,
        x: f64,
        y: f64,
        style: &StyleSpec,
        jitter: Jitter,
        role: LineRole,
    ) {
        let font = self.set_style(&style.font_role, style.size);
        let dx = self.offset(jitter.x);
        let dy = self.offset(jitter.y);
        let rotation = self.offset(jitter.rotation);
        page.push(DrawOp::Text(TextOp {
            text: text.to_string(),
            x: x + dx,
            y: y + dy,
            rotation,
            font,
            size: style.size,
            color: style.color,
            role,
        }));
    }

    /// A filled list bullet, drawn as geometry so no font needs a bullet glyph.
    pub fn draw_bullet(&mut self, page: &mut Page, cx: f64, cy: f64, radius: f64, color: Color) {
        page.push(DrawOp::Circle {
            cx,
            cy,
            r: radius,
            fill: Some(color),
            stroke: None,
        });
    }

    /// Uniform offset in `-range..=range`.
    fn offset(&mut self, range: f64) -> f64 {
        if range <= 0.0 {
            return 0.0;
        }
        (self.rng.f64() * 2.0 - 1.0) * range
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Hand the registry to the document once layout is done.
    pub fn into_fonts(self) -> FontRegistry {
        self.fonts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FontFormat;
    use crate::page::Background;
    use crate::style::StyleTable;
    use std::path::PathBuf;

    fn page() -> Page {
        Page::new(1, Background::Ruled)
    }

    #[test]
    fn missing_fonts_fall_back_to_builtin() {
        let catalog = ResourceCatalog::empty();
        let mut renderer = Renderer::new(&catalog, Some(1));
        let id = renderer.set_style("dialogue", 11.0);
        assert_eq!(id, renderer.fonts().builtin());
    }

    #[test]
    fn broken_catalog_font_falls_through() {
        let mut catalog = ResourceCatalog::empty();
        catalog.insert_role(
            "body",
            FontHandle::new("body", PathBuf::from("/no/such/body.ttf"), FontFormat::TrueType),
        );
        let mut renderer = Renderer::new(&catalog, Some(1));
        assert_eq!(renderer.set_style("body", 12.0), renderer.fonts().builtin());
    }

    #[test]
    fn cache_is_keyed_by_role_and_size() {
        let catalog = ResourceCatalog::empty();
        let mut renderer = Renderer::new(&catalog, Some(1));
        renderer.set_style("body", 12.0);
        renderer.set_style("body", 12.0);
        renderer.set_style("body", 11.0);
        renderer.set_style("title", 12.0);
        assert_eq!(renderer.cache.len(), 3);
    }

    #[test]
    fn jitter_stays_within_configured_range() {
        let catalog = ResourceCatalog::empty();
        let mut renderer = Renderer::new(&catalog, Some(99));
        let style = StyleTable::default().dialogue;
        let mut page = page();
        for _ in 0..200 {
            renderer.draw(&mut page, "hi", 100.0, 200.0, &style, LineRole::Dialogue);
        }
        for op in page.texts() {
            assert!((op.x - 100.0).abs() <= style.jitter.x);
            assert!((op.y - 200.0).abs() <= style.jitter.y);
            assert!(op.rotation.abs() <= style.jitter.rotation);
        }
    }

    #[test]
    fn same_seed_same_jitter() {
        let catalog = ResourceCatalog::empty();
        let style = StyleTable::default().paragraph;
        let run = |seed| {
            let mut renderer = Renderer::new(&catalog, Some(seed));
            let mut page = page();
            renderer.draw(&mut page, "a", 0.0, 0.0, &style, LineRole::Paragraph);
            page.texts().map(|t| (t.x, t.y, t.rotation)).collect::<Vec<_>>()
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn steady_draw_is_exact() {
        let catalog = ResourceCatalog::empty();
        let mut renderer = Renderer::new(&catalog, None);
        let style = StyleTable::default().paragraph;
        let mut page = page();
        renderer.draw_steady(&mut page, "7", 300.0, 40.0, &style, LineRole::PageNumber);
        let op = page.texts().next().unwrap();
        assert_eq!((op.x, op.y, op.rotation), (300.0, 40.0, 0.0));
    }
}
