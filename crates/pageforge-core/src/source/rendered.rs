//! Adapter from an open render-backend document to the `PageSource` view.

use image::RgbaImage;
use pageforge_render::RasterDocument;

use super::PageSource;
use crate::error::{SourceError, TransformError};
use crate::Result;

/// A PDF opened for rasterization, presented as a 1-indexed [`PageSource`].
///
/// The wrapped handle is owned by one job for its whole run and must not be
/// shared with a concurrent job.
pub struct RenderedPdfSource<'a> {
    document: Box<dyn RasterDocument + 'a>,
    page_count: u32,
}

impl<'a> RenderedPdfSource<'a> {
    /// Wrap an open backend document.
    pub fn new(document: Box<dyn RasterDocument + 'a>) -> Result<Self> {
        let page_count = document.page_count();
        if page_count == 0 {
            return Err(SourceError::NoPages.into());
        }
        Ok(Self {
            document,
            page_count,
        })
    }

    /// Map a 1-indexed page number to the backend's 0-based index.
    fn backend_index(&self, index: u32) -> Result<u32> {
        if index < 1 || index > self.page_count {
            return Err(SourceError::InvalidPage(index).into());
        }
        Ok(index - 1)
    }
}

impl PageSource for RenderedPdfSource<'_> {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn page_size(&self, index: u32) -> Result<(f32, f32)> {
        let backend_index = self.backend_index(index)?;
        self.document
            .page_size(backend_index)
            .map_err(|e| render_failure(index, e))
    }

    fn render_page(&self, index: u32, scale: f32) -> Result<RgbaImage> {
        let backend_index = self.backend_index(index)?;
        self.document
            .render_page(backend_index, scale)
            .map_err(|e| render_failure(index, e))
    }
}

/// Backend errors carry the backend's 0-based index; report the page the
/// caller actually asked for.
fn render_failure(page: u32, error: pageforge_render::RenderError) -> crate::ForgeError {
    TransformError::Render {
        page,
        reason: error.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageforge_render::RenderError;
    use pretty_assertions::assert_eq;

    /// Fake backend document: page n is n+1 pixels wide at scale 1.
    struct FakeDocument {
        pages: u32,
    }

    impl RasterDocument for FakeDocument {
        fn page_count(&self) -> u32 {
            self.pages
        }

        fn page_size(&self, index: u32) -> pageforge_render::Result<(f32, f32)> {
            if index >= self.pages {
                return Err(RenderError::PageAccess {
                    page: index,
                    reason: "past end".into(),
                });
            }
            Ok(((index + 1) as f32, 10.0))
        }

        fn render_page(&self, index: u32, scale: f32) -> pageforge_render::Result<RgbaImage> {
            let (w, h) = self.page_size(index)?;
            Ok(RgbaImage::new(
                (w * scale).ceil() as u32,
                (h * scale).ceil() as u32,
            ))
        }
    }

    #[test]
    fn test_maps_one_based_indices_to_backend() {
        let source = RenderedPdfSource::new(Box::new(FakeDocument { pages: 3 })).unwrap();
        assert_eq!(source.page_count(), 3);
        // Page 1 is backend index 0.
        assert_eq!(source.page_size(1).unwrap(), (1.0, 10.0));
        assert_eq!(source.page_size(3).unwrap(), (3.0, 10.0));
    }

    #[test]
    fn test_rejects_out_of_range_indices() {
        let source = RenderedPdfSource::new(Box::new(FakeDocument { pages: 2 })).unwrap();
        assert!(source.page_size(0).is_err());
        assert!(source.render_page(3, 1.0).is_err());
    }

    /// Backend document that fails every render.
    struct BrokenDocument {
        pages: u32,
    }

    impl RasterDocument for BrokenDocument {
        fn page_count(&self) -> u32 {
            self.pages
        }

        fn page_size(&self, index: u32) -> pageforge_render::Result<(f32, f32)> {
            Err(RenderError::PageAccess {
                page: index,
                reason: "broken".into(),
            })
        }

        fn render_page(&self, index: u32, _scale: f32) -> pageforge_render::Result<RgbaImage> {
            Err(RenderError::RenderFailed {
                page: index,
                reason: "broken".into(),
            })
        }
    }

    #[test]
    fn test_render_failure_names_callers_page_number() {
        use crate::error::{ForgeError, TransformError};

        let source = RenderedPdfSource::new(Box::new(BrokenDocument { pages: 5 })).unwrap();
        let error = source.render_page(3, 1.0).unwrap_err();
        assert!(matches!(
            error,
            ForgeError::Transform(TransformError::Render { page: 3, .. })
        ));
        // The 1-based page the caller asked for, not the backend's index 2.
        assert!(error.to_string().contains("page 3"));

        let error = source.page_size(5).unwrap_err();
        assert!(matches!(
            error,
            ForgeError::Transform(TransformError::Render { page: 5, .. })
        ));
    }

    #[test]
    fn test_rejects_empty_document() {
        assert!(RenderedPdfSource::new(Box::new(FakeDocument { pages: 0 })).is_err());
    }
}
