//! Per-page raster transforms: scaling, color reduction, and encoding.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::debug;

use crate::error::TransformError;
use crate::source::PageSource;
use crate::Result;

/// Base PDF resolution in dots per inch.
pub const BASE_DPI: f32 = 72.0;

/// Lower bound for the render scale.
pub const MIN_SCALE: f32 = 1.0;

/// Upper bound for the render scale; caps memory use on large pages.
pub const MAX_SCALE: f32 = 2.0;

/// Color mode for rendered pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Color,
    Grayscale,
}

/// Encoding target for rendered pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// File extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Immutable configuration for one raster transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Render scale relative to the 72 DPI base, clamped to `[1, 2]`.
    pub scale: f32,

    /// Color mode applied before encoding.
    pub color_mode: ColorMode,

    /// Encoding target.
    pub format: OutputFormat,

    /// JPEG quality in `(0, 1]`. Ignored for PNG, which is lossless.
    pub quality: f32,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            scale: MAX_SCALE,
            color_mode: ColorMode::Color,
            format: OutputFormat::Jpeg,
            quality: 0.85,
        }
    }
}

impl TransformOptions {
    /// Derive options from a target DPI. `scale = dpi / 72`, clamped.
    pub fn from_dpi(dpi: u32) -> Self {
        Self {
            scale: (dpi as f32 / BASE_DPI).clamp(MIN_SCALE, MAX_SCALE),
            ..Self::default()
        }
    }

    /// Set the color mode.
    pub fn with_color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = color_mode;
        self
    }

    /// Set the encoding target.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the JPEG quality, clamped to `(0, 1]`.
    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality.clamp(0.01, 1.0);
        self
    }
}

/// One page rendered and encoded, ready for assembly or archiving.
#[derive(Debug, Clone)]
pub struct EncodedPage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Encoding of `bytes`.
    pub format: OutputFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Recompute the RGB channels of a raw RGBA byte buffer with luma weights,
/// leaving alpha untouched. The map is a projection: applying it twice gives
/// the same result as once.
pub fn grayscale_rgba_bytes(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        let v = (0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32).round() as u8;
        px[0] = v;
        px[1] = v;
        px[2] = v;
    }
}

/// Grayscale an image buffer in place. See [`grayscale_rgba_bytes`].
pub fn grayscale_in_place(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let v = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32).round() as u8;
        pixel.0 = [v, v, v, a];
    }
}

/// Encode an RGBA buffer as JPEG (lossy) or PNG (lossless).
pub fn encode_image(
    image: &RgbaImage,
    format: OutputFormat,
    quality: f32,
) -> std::result::Result<Vec<u8>, TransformError> {
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let q = (quality.clamp(0.01, 1.0) * 100.0).round() as u8;
            let mut cursor = Cursor::new(&mut bytes);
            let mut encoder = JpegEncoder::new_with_quality(&mut cursor, q);
            encoder
                .encode_image(&rgb)
                .map_err(|e| TransformError::Encode(e.to_string()))?;
        }
        OutputFormat::Png => {
            image
                .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
                .map_err(|e| TransformError::Encode(e.to_string()))?;
        }
    }
    Ok(bytes)
}

/// Render one source page and encode it according to `options`.
///
/// Output dimensions are a deterministic function of the page's intrinsic
/// size and the scale. Render failures identify the page at fault; no
/// degraded output is produced for a failing page.
pub fn rasterize_page(
    source: &dyn PageSource,
    index: u32,
    options: &TransformOptions,
) -> Result<EncodedPage> {
    let mut image = source.render_page(index, options.scale)?;
    if options.color_mode == ColorMode::Grayscale {
        grayscale_in_place(&mut image);
    }

    let (width, height) = (image.width(), image.height());
    let bytes = encode_image(&image, options.format, options.quality)?;
    debug!(
        "page {index} encoded to {} bytes ({width}x{height})",
        bytes.len()
    );

    Ok(EncodedPage {
        bytes,
        format: options.format,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_grayscale_pure_red() {
        let mut image = RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 0, 255]));
        grayscale_in_place(&mut image);
        assert_eq!(image.get_pixel(0, 0).0, [76, 76, 76, 255]);
    }

    #[test]
    fn test_grayscale_preserves_alpha() {
        let mut image = RgbaImage::from_pixel(1, 1, image::Rgba([10, 200, 50, 128]));
        grayscale_in_place(&mut image);
        assert_eq!(image.get_pixel(0, 0).0[3], 128);
    }

    #[test]
    fn test_grayscale_is_idempotent() {
        let mut once = RgbaImage::from_pixel(2, 2, image::Rgba([13, 77, 201, 255]));
        grayscale_in_place(&mut once);
        let mut twice = once.clone();
        grayscale_in_place(&mut twice);
        assert_eq!(once.as_raw(), twice.as_raw());
    }

    #[test]
    fn test_from_dpi_clamps_scale() {
        assert_eq!(TransformOptions::from_dpi(75).scale, 75.0 / 72.0);
        assert_eq!(TransformOptions::from_dpi(300).scale, MAX_SCALE);
        assert_eq!(TransformOptions::from_dpi(36).scale, MIN_SCALE);
    }

    #[test]
    fn test_with_quality_clamps() {
        assert_eq!(TransformOptions::default().with_quality(1.7).quality, 1.0);
        assert_eq!(TransformOptions::default().with_quality(-0.3).quality, 0.01);
    }

    #[test]
    fn test_encode_png_round_trips_dimensions() {
        let image = RgbaImage::from_pixel(7, 3, image::Rgba([0, 128, 255, 255]));
        let bytes = encode_image(&image, OutputFormat::Png, 1.0).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (7, 3));
    }

    #[test]
    fn test_encode_jpeg_produces_jpeg() {
        let image = RgbaImage::from_pixel(4, 4, image::Rgba([90, 90, 90, 255]));
        let bytes = encode_image(&image, OutputFormat::Jpeg, 0.65).unwrap();
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            image::ImageFormat::Jpeg
        );
    }
}
