//! PDFium-backed rasterization.
//!
//! Binds the system PDFium library at runtime; nothing is linked at build
//! time, so this backend fails at construction (not at startup) when the
//! library is missing.

use image::RgbaImage;
use pdfium_render::prelude::*;
use tracing::debug;

use super::{RasterBackend, RasterDocument};
use crate::{RenderError, Result};

/// Rasterizes PDF pages through the PDFium library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Bind to the PDFium library installed on the system.
    pub fn new() -> Result<Self> {
        let bindings = Pdfium::bind_to_system_library()
            .map_err(|e| RenderError::BackendInit(format!("pdfium bind failed: {e}")))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Bind to a PDFium library at an explicit path.
    pub fn with_library(path: &str) -> Result<Self> {
        let bindings = Pdfium::bind_to_library(path)
            .map_err(|e| RenderError::BackendInit(format!("pdfium bind failed: {e}")))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl RasterBackend for PdfiumBackend {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn RasterDocument + 'a>> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| RenderError::DocumentOpen(format!("pdfium open failed: {e}")))?;
        debug!("opened document with {} pages", document.pages().len());
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl PdfiumDocument<'_> {
    fn page(&self, index: u32) -> Result<PdfPage<'_>> {
        let index_u16 = u16::try_from(index).map_err(|_| RenderError::PageAccess {
            page: index,
            reason: "page index exceeds the backend's u16 range".to_string(),
        })?;
        self.document
            .pages()
            .get(index_u16)
            .map_err(|e| RenderError::PageAccess {
                page: index,
                reason: format!("{e}"),
            })
    }
}

impl RasterDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> u32 {
        self.document.pages().len() as u32
    }

    fn page_size(&self, index: u32) -> Result<(f32, f32)> {
        let page = self.page(index)?;
        Ok((page.width().value, page.height().value))
    }

    fn render_page(&self, index: u32, scale: f32) -> Result<RgbaImage> {
        let page = self.page(index)?;
        let width = (page.width().value * scale).ceil() as i32;
        let height = (page.height().value * scale).ceil() as i32;

        let bitmap = page
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(width)
                    .set_target_height(height),
            )
            .map_err(|e| RenderError::RenderFailed {
                page: index,
                reason: format!("{e}"),
            })?;

        let rendered = bitmap.as_image().to_rgba8();
        debug!(
            "rendered page {} at {}x{}",
            index,
            rendered.width(),
            rendered.height()
        );
        Ok(rendered)
    }
}
