//! # PDF Serializer
//!
//! Writes a [`CompiledDocument`] as a PDF 1.7 file. The writer is
//! from-scratch: every object is formatted by hand, content streams are
//! deflated with `miniz_oxide`, and the cross-reference table is built from
//! the byte offsets recorded while serializing.
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree, fonts, images, pages
//! ...
//! xref                <- byte offset of each object
//! trailer             <- root and info references
//! %%EOF
//! ```
//!
//! The built-in Helvetica is a Type1 font with WinAnsiEncoding. TrueType
//! faces are embedded whole as CIDFontType2 with Identity-H encoding, five
//! objects per face: FontFile2, FontDescriptor, CIDFont, ToUnicode CMap and
//! the Type0 root. Only faces that some page actually draws with are written.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::ScrawlError;
use crate::font::{FontData, FontFace, TrueTypeMetrics};
use crate::image_loader::{ImagePixelData, LoadedImage};
use crate::model::Metadata;
use crate::page::{CompiledDocument, DrawOp, Page, TextOp};
use crate::style::Color;

/// Bézier control distance for a quarter circle of radius 1.
const KAPPA: f64 = 0.5523;

#[derive(Default)]
pub struct PdfWriter;

/// Objects allocated while writing. Index 0 is the free-list head.
struct PdfBuilder {
    objects: Vec<Vec<u8>>,
}

impl PdfBuilder {
    fn new() -> Self {
        Self { objects: vec![Vec::new()] }
    }

    fn reserve(&mut self) -> usize {
        self.objects.push(Vec::new());
        self.objects.len() - 1
    }

    fn add(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len() - 1
    }

    fn add_stream(&mut self, dict_extra: &str, raw: &[u8]) -> usize {
        let compressed = compress_to_vec_zlib(raw, 6);
        let mut data: Vec<u8> = Vec::new();
        let _ = write!(
            data,
            "<< /Length {} /Filter /FlateDecode{} >>\nstream\n",
            compressed.len(),
            dict_extra
        );
        data.extend_from_slice(&compressed);
        data.extend_from_slice(b"\nendstream");
        self.add(data)
    }
}

/// A font as it appears in page resources.
struct EmbeddedFont {
    object_id: usize,
    kind: FontKind,
}

enum FontKind {
    WinAnsi,
    Identity,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Serialize the document.
    pub fn write(&self, doc: &CompiledDocument) -> Result<Vec<u8>, ScrawlError> {
        let mut builder = PdfBuilder::new();
        let catalog_id = builder.reserve();
        let pages_id = builder.reserve();

        let fonts = Self::write_fonts(&mut builder, doc)?;
        let images: Vec<usize> = doc
            .images
            .iter()
            .map(|image| Self::write_image_xobject(&mut builder, image))
            .collect();

        let font_resources = fonts
            .iter()
            .map(|(index, font)| format!("/F{} {} 0 R", index, font.object_id))
            .collect::<Vec<_>>()
            .join(" ");

        let mut page_ids = Vec::with_capacity(doc.pages.len());
        for page in &doc.pages {
            let content = Self::build_content_stream(page, &fonts, doc);
            let content_id = builder.add_stream("", content.as_bytes());

            let mut resources = format!("/Font << {} >>", font_resources);
            let used_images = Self::images_on_page(page);
            if !used_images.is_empty() {
                let entries = used_images
                    .iter()
                    .filter_map(|&i| images.get(i).map(|id| format!("/Im{} {} 0 R", i, id)))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = write!(resources, " /XObject << {} >>", entries);
            }

            let page_dict = format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                pages_id, doc.width, doc.height, content_id, resources
            );
            page_ids.push(builder.add(page_dict.into_bytes()));
        }

        builder.objects[catalog_id] =
            format!("<< /Type /Catalog /Pages {} 0 R >>", pages_id).into_bytes();
        let kids = page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[pages_id] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_ids.len()
        )
        .into_bytes();

        let info_id = builder.add(Self::info_dict(&doc.metadata).into_bytes());
        Ok(Self::serialize(&builder, catalog_id, info_id))
    }

    fn info_dict(metadata: &Metadata) -> String {
        let mut info = String::from("<< ");
        if let Some(title) = &metadata.title {
            let _ = write!(info, "/Title {} ", Self::text_string(title));
        }
        info.push_str("/Producer (scrawl) /Creator (scrawl) >>");
        info
    }

    /// Write every face some page draws with. Keys are registry indices,
    /// which double as the `/F{n}` resource names.
    fn write_fonts(
        builder: &mut PdfBuilder,
        doc: &CompiledDocument,
    ) -> Result<BTreeMap<usize, EmbeddedFont>, ScrawlError> {
        let mut used: BTreeMap<usize, BTreeSet<char>> = BTreeMap::new();
        for page in &doc.pages {
            for text in page.texts() {
                used.entry(text.font.index())
                    .or_default()
                    .extend(text.text.chars());
            }
        }

        let mut fonts = BTreeMap::new();
        for (id, face) in doc.fonts.iter() {
            let Some(chars) = used.get(&id.index()) else {
                continue;
            };
            let font = match &face.data {
                FontData::Builtin(std_font) => {
                    let dict = format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                         /Encoding /WinAnsiEncoding >>",
                        std_font.pdf_name()
                    );
                    EmbeddedFont {
                        object_id: builder.add(dict.into_bytes()),
                        kind: FontKind::WinAnsi,
                    }
                }
                FontData::TrueType { data, metrics } => EmbeddedFont {
                    object_id: Self::write_truetype_objects(builder, face, data, metrics, chars)?,
                    kind: FontKind::Identity,
                },
            };
            fonts.insert(id.index(), font);
        }
        Ok(fonts)
    }

    /// Write the five objects of an embedded TrueType face and return the
    /// Type0 root.
    fn write_truetype_objects(
        builder: &mut PdfBuilder,
        face: &FontFace,
        data: &[u8],
        metrics: &TrueTypeMetrics,
        used_chars: &BTreeSet<char>,
    ) -> Result<usize, ScrawlError> {
        let parsed = ttf_parser::Face::parse(data, 0)
            .map_err(|e| ScrawlError::Font(format!("cannot embed '{}': {}", face.name, e)))?;
        let font_name = Self::sanitize_font_name(&face.name);
        let scale = 1000.0 / metrics.units_per_em as f64;

        let fontfile_id = builder.add_stream(&format!(" /Length1 {}", data.len()), data);

        let bbox = parsed.global_bounding_box();
        let cap_height = parsed.capital_height().unwrap_or(metrics.ascender);
        let descriptor = format!(
            "<< /Type /FontDescriptor /FontName /{} /Flags 4 \
             /FontBBox [{} {} {} {}] /ItalicAngle 0 \
             /Ascent {} /Descent {} /CapHeight {} /StemV 80 \
             /FontFile2 {} 0 R >>",
            font_name,
            (bbox.x_min as f64 * scale) as i32,
            (bbox.y_min as f64 * scale) as i32,
            (bbox.x_max as f64 * scale) as i32,
            (bbox.y_max as f64 * scale) as i32,
            (metrics.ascender as f64 * scale) as i32,
            (metrics.descender as f64 * scale) as i32,
            (cap_height as f64 * scale) as i32,
            fontfile_id,
        );
        let descriptor_id = builder.add(descriptor.into_bytes());

        let glyphs: BTreeMap<u16, char> = used_chars
            .iter()
            .map(|&ch| (metrics.glyph_id(ch), ch))
            .filter(|&(gid, _)| gid != 0)
            .collect();

        let cidfont = format!(
            "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} \
             /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
             /FontDescriptor {} 0 R /DW {} /W {} /CIDToGIDMap /Identity >>",
            font_name,
            descriptor_id,
            metrics.glyph_width_pdf_units(' '),
            Self::build_w_array(&glyphs, metrics),
        );
        let cidfont_id = builder.add(cidfont.into_bytes());

        let cmap = Self::build_tounicode_cmap(&glyphs, &font_name);
        let tounicode_id = builder.add_stream("", cmap.as_bytes());

        let type0 = format!(
            "<< /Type /Font /Subtype /Type0 /BaseFont /{} /Encoding /Identity-H \
             /DescendantFonts [{} 0 R] /ToUnicode {} 0 R >>",
            font_name, cidfont_id, tounicode_id
        );
        Ok(builder.add(type0.into_bytes()))
    }

    /// `[gid [width] ...]`, one entry per used glyph.
    fn build_w_array(glyphs: &BTreeMap<u16, char>, metrics: &TrueTypeMetrics) -> String {
        let mut w = String::from("[");
        for (gid, &ch) in glyphs {
            let _ = write!(w, " {} [{}]", gid, metrics.glyph_width_pdf_units(ch));
        }
        w.push_str(" ]");
        w
    }

    fn build_tounicode_cmap(glyphs: &BTreeMap<u16, char>, font_name: &str) -> String {
        let mut cmap = String::new();
        cmap.push_str("/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n");
        cmap.push_str("/CIDSystemInfo\n<< /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        let _ = writeln!(cmap, "/CMapName /{}-UTF16 def", font_name);
        cmap.push_str("/CMapType 2 def\n1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

        let entries: Vec<(&u16, &char)> = glyphs.iter().collect();
        // At most 100 entries per bfchar block
        for chunk in entries.chunks(100) {
            let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
            for (gid, ch) in chunk {
                let mut units = [0u16; 2];
                let hex: String = ch
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|u| format!("{:04X}", u))
                    .collect();
                let _ = writeln!(cmap, "<{:04X}> <{}>", gid, hex);
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
        cmap
    }

    fn write_image_xobject(builder: &mut PdfBuilder, image: &LoadedImage) -> usize {
        match &image.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                let mut obj: Vec<u8> = Vec::new();
                let _ = write!(
                    obj,
                    "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace {} /BitsPerComponent 8 /Filter /DCTDecode \
                     /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    color_space.pdf_name(),
                    data.len()
                );
                obj.extend_from_slice(data);
                obj.extend_from_slice(b"\nendstream");
                builder.add(obj)
            }
            ImagePixelData::Decoded { rgb, alpha } => {
                let dims = format!(
                    " /Type /XObject /Subtype /Image /Width {} /Height {} /BitsPerComponent 8",
                    image.width_px, image.height_px
                );
                let smask = alpha.as_ref().map(|alpha| {
                    builder.add_stream(&format!("{} /ColorSpace /DeviceGray", dims), alpha)
                });
                let smask_ref = smask
                    .map(|id| format!(" /SMask {} 0 R", id))
                    .unwrap_or_default();
                builder.add_stream(&format!("{} /ColorSpace /DeviceRGB{}", dims, smask_ref), rgb)
            }
        }
    }

    fn images_on_page(page: &Page) -> BTreeSet<usize> {
        page.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    fn build_content_stream(
        page: &Page,
        fonts: &BTreeMap<usize, EmbeddedFont>,
        doc: &CompiledDocument,
    ) -> String {
        let mut stream = String::new();
        for op in &page.ops {
            match op {
                DrawOp::Text(text) => Self::write_text(&mut stream, text, fonts, doc),
                DrawOp::Line { from, to, width, color } => {
                    let _ = writeln!(
                        stream,
                        "q\n{} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ",
                        Self::color_operands(*color),
                        width,
                        from.0,
                        from.1,
                        to.0,
                        to.1
                    );
                }
                DrawOp::Circle { cx, cy, r, fill, stroke } => {
                    Self::write_circle(&mut stream, *cx, *cy, *r, *fill, *stroke);
                }
                DrawOp::FillRect { x, y, width, height, color } => {
                    let _ = writeln!(
                        stream,
                        "q\n{} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ",
                        Self::color_operands(*color),
                        x,
                        y,
                        width,
                        height
                    );
                }
                DrawOp::Image { index, x, y, width, height } => {
                    if *index < doc.images.len() {
                        let _ = writeln!(
                            stream,
                            "q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm\n/Im{} Do\nQ",
                            width, height, x, y, index
                        );
                    }
                }
            }
        }
        stream
    }

    fn write_text(
        stream: &mut String,
        text: &TextOp,
        fonts: &BTreeMap<usize, EmbeddedFont>,
        doc: &CompiledDocument,
    ) {
        let index = text.font.index();
        let Some(font) = fonts.get(&index) else {
            return;
        };
        let encoded = match (&font.kind, &doc.fonts.face(text.font).data) {
            (FontKind::Identity, FontData::TrueType { metrics, .. }) => text
                .text
                .chars()
                .map(|ch| format!("{:04X}", metrics.glyph_id(ch)))
                .collect::<String>(),
            _ => text
                .text
                .chars()
                .map(|ch| format!("{:02X}", Self::unicode_to_winansi(ch).unwrap_or(b'?')))
                .collect::<String>(),
        };

        let (sin, cos) = text.rotation.to_radians().sin_cos();
        let _ = writeln!(
            stream,
            "BT\n/F{} {:.2} Tf\n{} rg\n{:.4} {:.4} {:.4} {:.4} {:.2} {:.2} Tm\n<{}> Tj\nET",
            index,
            text.size,
            Self::color_operands(text.color),
            cos,
            sin,
            -sin,
            cos,
            text.x,
            text.y,
            encoded
        );
    }

    /// Four Bézier quadrants approximating a circle.
    fn write_circle(
        stream: &mut String,
        cx: f64,
        cy: f64,
        r: f64,
        fill: Option<Color>,
        stroke: Option<Color>,
    ) {
        let paint = match (fill, stroke) {
            (Some(_), Some(_)) => "B",
            (Some(_), None) => "f",
            (None, Some(_)) => "S",
            (None, None) => return,
        };
        let k = KAPPA * r;

        stream.push_str("q\n");
        if let Some(c) = fill {
            let _ = writeln!(stream, "{} rg", Self::color_operands(c));
        }
        if let Some(c) = stroke {
            let _ = writeln!(stream, "{} RG", Self::color_operands(c));
        }
        let _ = writeln!(stream, "{:.2} {:.2} m", cx + r, cy);
        let _ = writeln!(stream, "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c", cx + r, cy + k, cx + k, cy + r, cx, cy + r);
        let _ = writeln!(stream, "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c", cx - k, cy + r, cx - r, cy + k, cx - r, cy);
        let _ = writeln!(stream, "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c", cx - r, cy - k, cx - k, cy - r, cx, cy - r);
        let _ = writeln!(stream, "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c", cx + k, cy - r, cx + r, cy - k, cx + r, cy);
        let _ = writeln!(stream, "{}\nQ", paint);
    }

    fn color_operands(c: Color) -> String {
        format!("{:.3} {:.3} {:.3}", c.r, c.g, c.b)
    }

    /// A PDF text string: literal when ASCII, UTF-16BE hex otherwise.
    fn text_string(s: &str) -> String {
        if s.is_ascii() {
            return format!("({})", Self::escape_pdf_string(s));
        }
        let hex: String = s.encode_utf16().map(|u| format!("{:04X}", u)).collect();
        format!("<FEFF{}>", hex)
    }

    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Strip a face name down to characters allowed in a PDF name.
    fn sanitize_font_name(name: &str) -> String {
        let clean: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if clean.is_empty() {
            "ScrawlFont".to_string()
        } else {
            clean
        }
    }

    /// Map a character to its WinAnsiEncoding byte (Windows-1252).
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80),
            0x201A => Some(0x82),
            0x0192 => Some(0x83),
            0x201E => Some(0x84),
            0x2026 => Some(0x85),
            0x2020 => Some(0x86),
            0x2021 => Some(0x87),
            0x02C6 => Some(0x88),
            0x2030 => Some(0x89),
            0x0160 => Some(0x8A),
            0x2039 => Some(0x8B),
            0x0152 => Some(0x8C),
            0x017D => Some(0x8E),
            0x2018 => Some(0x91),
            0x2019 => Some(0x92),
            0x201C => Some(0x93),
            0x201D => Some(0x94),
            0x2022 => Some(0x95),
            0x2013 => Some(0x96),
            0x2014 => Some(0x97),
            0x02DC => Some(0x98),
            0x2122 => Some(0x99),
            0x0161 => Some(0x9A),
            0x203A => Some(0x9B),
            0x0153 => Some(0x9C),
            0x017E => Some(0x9E),
            0x0178 => Some(0x9F),
            _ => None,
        }
    }

    fn serialize(builder: &PdfBuilder, root_id: usize, info_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, data) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            root_id,
            info_id,
            xref_offset
        );
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontRegistry;
    use crate::page::{Background, LineRole};

    fn doc_with(pages: Vec<Page>, metadata: Metadata) -> CompiledDocument {
        CompiledDocument {
            width: 612.0,
            height: 792.0,
            pages,
            fonts: FontRegistry::new(),
            images: Vec::new(),
            metadata,
        }
    }

    fn text_page(text: &str) -> Page {
        let fonts = FontRegistry::new();
        let mut page = Page::new(1, Background::Ruled);
        page.push(DrawOp::Text(TextOp {
            text: text.to_string(),
            x: 90.0,
            y: 700.0,
            rotation: 0.0,
            font: fonts.builtin(),
            size: 12.0,
            color: Color::rgb8(25, 25, 35),
            role: LineRole::Paragraph,
        }));
        page
    }

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn escapes_parens_and_backslashes() {
        assert_eq!(PdfWriter::escape_pdf_string("Hello (World)"), "Hello \\(World\\)");
        assert_eq!(PdfWriter::escape_pdf_string("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn empty_document_is_well_formed() {
        let doc = doc_with(vec![Page::new(1, Background::Ruled)], Metadata::default());
        let bytes = PdfWriter::new().write(&doc).unwrap();
        let text = as_text(&bytes);
        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(text.contains("xref"));
        assert!(text.contains("trailer"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/Producer (scrawl)"));
    }

    #[test]
    fn title_lands_in_info_dict() {
        let metadata = Metadata {
            title: Some("Camp (Week 2)".to_string()),
        };
        let doc = doc_with(vec![Page::new(1, Background::Ruled)], metadata);
        let text = as_text(&PdfWriter::new().write(&doc).unwrap());
        assert!(text.contains("/Title (Camp \\(Week 2\\))"));
    }

    #[test]
    fn non_ascii_title_is_utf16() {
        assert_eq!(PdfWriter::text_string("é"), "<FEFF00E9>");
    }

    #[test]
    fn helvetica_is_written_once_when_used() {
        let doc = doc_with(vec![text_page("hi"), text_page("there")], Metadata::default());
        let text = as_text(&PdfWriter::new().write(&doc).unwrap());
        assert_eq!(text.matches("/BaseFont /Helvetica").count(), 1);
        assert!(!text.contains("CIDFontType2"));
        assert!(text.contains("/Count 2"));
    }

    #[test]
    fn unused_fonts_are_not_written() {
        let doc = doc_with(vec![Page::new(1, Background::Ruled)], Metadata::default());
        let text = as_text(&PdfWriter::new().write(&doc).unwrap());
        assert!(!text.contains("/Type /Font"));
    }

    #[test]
    fn text_is_hex_encoded_winansi() {
        let doc = doc_with(vec![text_page("A\u{2019}")], Metadata::default());
        let fonts = PdfWriter::write_fonts(&mut PdfBuilder::new(), &doc).unwrap();
        let stream = PdfWriter::build_content_stream(&doc.pages[0], &fonts, &doc);
        assert!(stream.contains("<4192> Tj"));
        assert!(stream.contains("/F0 12.00 Tf"));
    }

    #[test]
    fn rotation_goes_into_the_text_matrix() {
        let mut page = text_page("x");
        if let Some(DrawOp::Text(t)) = page.ops.first_mut() {
            t.rotation = 90.0;
        }
        let doc = doc_with(vec![page], Metadata::default());
        let fonts = PdfWriter::write_fonts(&mut PdfBuilder::new(), &doc).unwrap();
        let stream = PdfWriter::build_content_stream(&doc.pages[0], &fonts, &doc);
        assert!(stream.contains("0.0000 1.0000 -1.0000 0.0000 90.00 700.00 Tm"));
    }

    #[test]
    fn circles_fill_and_stroke() {
        let mut s = String::new();
        PdfWriter::write_circle(&mut s, 35.0, 100.0, 10.0, Some(Color::gray(0.92)), Some(Color::gray(0.8)));
        assert!(s.contains("45.00 100.00 m"));
        assert_eq!(s.matches(" c\n").count(), 4);
        assert!(s.contains("B\nQ"));

        let mut bullet = String::new();
        PdfWriter::write_circle(&mut bullet, 0.0, 0.0, 1.0, Some(Color::WHITE), None);
        assert!(bullet.contains("f\nQ"));
    }

    #[test]
    fn tounicode_maps_glyphs_to_utf16() {
        let glyphs: BTreeMap<u16, char> = [(36u16, 'A'), (3, ' ')].into_iter().collect();
        let cmap = PdfWriter::build_tounicode_cmap(&glyphs, "Hand");
        assert!(cmap.contains("2 beginbfchar"));
        assert!(cmap.contains("<0003> <0020>"));
        assert!(cmap.contains("<0024> <0041>"));
        assert!(cmap.contains("/CMapName /Hand-UTF16 def"));
    }

    #[test]
    fn font_names_are_sanitized() {
        assert_eq!(PdfWriter::sanitize_font_name("my hand (v2)"), "myhandv2");
        assert_eq!(PdfWriter::sanitize_font_name("   "), "ScrawlFont");
    }

    #[test]
    fn image_pages_reference_their_xobject() {
        let image = LoadedImage {
            pixel_data: ImagePixelData::Decoded {
                rgb: vec![255; 12],
                alpha: None,
            },
            width_px: 2,
            height_px: 2,
        };
        let mut page = Page::new(1, Background::Image(0));
        page.push(DrawOp::Image {
            index: 0,
            x: 0.0,
            y: 0.0,
            width: 612.0,
            height: 792.0,
        });
        let mut doc = doc_with(vec![page], Metadata::default());
        doc.images.push(image);

        let text = as_text(&PdfWriter::new().write(&doc).unwrap());
        assert!(text.contains("/Subtype /Image"));
        assert!(text.contains("/XObject << /Im0"));
        assert!(!text.contains("/SMask"));
    }
}
