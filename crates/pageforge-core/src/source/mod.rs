//! Page sources: uniform views over ordered sequences of renderable pages.

mod images;
mod pdf;
#[cfg(feature = "render")]
mod rendered;

pub use images::ImageSource;
pub use pdf::PdfSource;
#[cfg(feature = "render")]
pub use rendered::RenderedPdfSource;

use image::RgbaImage;

use crate::Result;

/// Uniform view over an ordered sequence of renderable pages.
///
/// Pages are 1-indexed; the index set is contiguous `[1, page_count]` and
/// fixed once the source is loaded. Sources are read-only for the duration
/// of a job: rendering never mutates a page, it produces a new bitmap.
pub trait PageSource {
    /// Number of pages in the source.
    fn page_count(&self) -> u32;

    /// Intrinsic page size in source units (points for PDFs, pixels for
    /// images).
    fn page_size(&self, index: u32) -> Result<(f32, f32)>;

    /// Render one page at `scale`. The output bitmap is
    /// `ceil(width * scale)` by `ceil(height * scale)` pixels.
    fn render_page(&self, index: u32, scale: f32) -> Result<RgbaImage>;
}
