//! Image-file page source: each input image is one renderable page.

use image::{imageops::FilterType, DynamicImage, RgbaImage};
use tracing::debug;

use super::PageSource;
use crate::error::SourceError;
use crate::Result;

/// An ordered list of decoded images presented as renderable pages.
///
/// "Rendering" a page scales the decoded bitmap; intrinsic size is the pixel
/// size of the image itself.
#[derive(Default)]
pub struct ImageSource {
    entries: Vec<ImageEntry>,
}

struct ImageEntry {
    name: String,
    image: DynamicImage,
}

impl ImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one image and append it as the next page. `name` is the source
    /// file stem, kept for naming derived outputs.
    pub fn push(&mut self, name: impl Into<String>, bytes: &[u8]) -> Result<()> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| SourceError::UnsupportedImage(e.to_string()))?;
        let name = name.into();
        debug!(
            "added image {name:?} ({}x{}) as page {}",
            image.width(),
            image.height(),
            self.entries.len() + 1
        );
        self.entries.push(ImageEntry { name, image });
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source file stem for a page.
    pub fn name(&self, index: u32) -> Option<&str> {
        self.entries
            .get(index.checked_sub(1)? as usize)
            .map(|e| e.name.as_str())
    }

    fn entry(&self, index: u32) -> Result<&ImageEntry> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i as usize))
            .ok_or_else(|| SourceError::InvalidPage(index).into())
    }
}

impl PageSource for ImageSource {
    fn page_count(&self) -> u32 {
        self.entries.len() as u32
    }

    fn page_size(&self, index: u32) -> Result<(f32, f32)> {
        let entry = self.entry(index)?;
        Ok((entry.image.width() as f32, entry.image.height() as f32))
    }

    fn render_page(&self, index: u32, scale: f32) -> Result<RgbaImage> {
        let entry = self.entry(index)?;
        if scale == 1.0 {
            return Ok(entry.image.to_rgba8());
        }

        let width = (entry.image.width() as f32 * scale).ceil() as u32;
        let height = (entry.image.height() as f32 * scale).ceil() as u32;
        Ok(entry
            .image
            .resize_exact(width.max(1), height.max(1), FilterType::Lanczos3)
            .to_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        bytes
    }

    #[test]
    fn test_pages_keep_input_order() {
        let mut source = ImageSource::new();
        source.push("first", &png_bytes(4, 4)).unwrap();
        source.push("second", &png_bytes(8, 2)).unwrap();

        assert_eq!(source.page_count(), 2);
        assert_eq!(source.name(1), Some("first"));
        assert_eq!(source.name(2), Some("second"));
        assert_eq!(source.page_size(2).unwrap(), (8.0, 2.0));
    }

    #[test]
    fn test_render_scales_dimensions() {
        let mut source = ImageSource::new();
        source.push("img", &png_bytes(10, 5)).unwrap();

        let rendered = source.render_page(1, 1.5).unwrap();
        assert_eq!((rendered.width(), rendered.height()), (15, 8));
    }

    #[test]
    fn test_invalid_index_is_rejected() {
        let source = ImageSource::new();
        assert!(source.render_page(1, 1.0).is_err());
    }

    #[test]
    fn test_undecodable_bytes_are_rejected() {
        let mut source = ImageSource::new();
        let result = source.push("bad", b"not an image");
        assert!(result.is_err());
    }
}
