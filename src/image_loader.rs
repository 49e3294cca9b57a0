//! # Background Images
//!
//! Reads a page background from disk and prepares it for PDF embedding.
//! JPEG files pass through untouched (PDF decodes DCT natively); PNG and
//! WebP are decoded to RGB with a separate alpha plane for the soft mask.

use std::path::Path;

use crate::error::ScrawlError;

/// A decoded image ready for PDF embedding.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

#[derive(Debug, Clone)]
pub enum ImagePixelData {
    /// Raw JPEG bytes, embedded with DCTDecode.
    Jpeg {
        data: Vec<u8>,
        color_space: JpegColorSpace,
    },
    /// width * height * 3 RGB bytes, plus one alpha byte per pixel when any
    /// pixel is not fully opaque.
    Decoded { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegColorSpace {
    DeviceRGB,
    DeviceGray,
}

impl JpegColorSpace {
    pub fn pdf_name(self) -> &'static str {
        match self {
            JpegColorSpace::DeviceRGB => "/DeviceRGB",
            JpegColorSpace::DeviceGray => "/DeviceGray",
        }
    }
}

/// Read and decode an image file.
pub fn load_background(path: &Path) -> Result<LoadedImage, ScrawlError> {
    let bytes = std::fs::read(path)
        .map_err(|e| ScrawlError::Image(format!("failed to read '{}': {}", path.display(), e)))?;
    decode(&bytes).map_err(|e| match e {
        ScrawlError::Image(msg) => ScrawlError::Image(format!("'{}': {}", path.display(), msg)),
        other => other,
    })
}

/// Decode image bytes, keeping JPEG data as-is.
pub fn decode(bytes: &[u8]) -> Result<LoadedImage, ScrawlError> {
    if bytes.starts_with(&[0xFF, 0xD8]) {
        return passthrough_jpeg(bytes);
    }

    let img = image::load_from_memory(bytes)
        .map_err(|e| ScrawlError::Image(format!("unsupported or corrupt image: {}", e)))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    let mut alpha = Vec::with_capacity(rgba.len() / 4);
    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }
    let opaque = alpha.iter().all(|&a| a == 255);

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: (!opaque).then_some(alpha),
        },
        width_px: width,
        height_px: height,
    })
}

fn passthrough_jpeg(bytes: &[u8]) -> Result<LoadedImage, ScrawlError> {
    let (width, height) = image::io::Reader::with_format(
        std::io::Cursor::new(bytes),
        image::ImageFormat::Jpeg,
    )
    .into_dimensions()
    .map_err(|e| ScrawlError::Image(format!("unreadable JPEG header: {}", e)))?;

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: bytes.to_vec(),
            color_space: jpeg_color_space(bytes),
        },
        width_px: width,
        height_px: height,
    })
}

/// Walk the JPEG segments to the start-of-frame and read its component count.
fn jpeg_color_space(bytes: &[u8]) -> JpegColorSpace {
    let mut pos = 2;
    while pos + 3 < bytes.len() && bytes[pos] == 0xFF {
        let marker = bytes[pos + 1];
        let start_of_frame =
            matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if start_of_frame {
            return match bytes.get(pos + 9) {
                Some(1) => JpegColorSpace::DeviceGray,
                _ => JpegColorSpace::DeviceRGB,
            };
        }
        let segment = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        pos += 2 + segment;
    }
    JpegColorSpace::DeviceRGB
}
