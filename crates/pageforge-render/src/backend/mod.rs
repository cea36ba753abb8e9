//! Render backend implementations.

#[cfg(feature = "pdfium")]
pub mod pdfium;

use image::RgbaImage;

use crate::Result;

/// Trait for page rasterization backends.
///
/// A backend turns raw PDF bytes into an open [`RasterDocument`] that can
/// render individual pages. The open handle borrows both the backend and the
/// source bytes for its lifetime.
pub trait RasterBackend {
    /// Open a document for rendering.
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn RasterDocument + 'a>>;
}

/// An open document handle capable of rendering its pages.
///
/// Page indices are 0-based at this layer; the core crate maps its 1-based
/// page numbers down before calling in.
pub trait RasterDocument {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Intrinsic size of a page in PDF points (1/72 inch).
    fn page_size(&self, index: u32) -> Result<(f32, f32)>;

    /// Render one page at `scale` relative to its intrinsic size.
    ///
    /// The output bitmap is `ceil(width * scale)` by `ceil(height * scale)`
    /// pixels.
    fn render_page(&self, index: u32, scale: f32) -> Result<RgbaImage>;
}
