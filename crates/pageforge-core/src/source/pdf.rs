//! PDF-backed page source.
//!
//! Parsing goes through lopdf; rasterization is delegated to a render
//! backend (see `RenderedPdfSource`). `PdfSource` itself serves the
//! vector-copy paths, which only need the raw bytes and the page count.

use lopdf::Document;
use tracing::debug;

use crate::error::SourceError;

/// A loaded PDF document: raw bytes plus the parsed object graph.
///
/// The page count is fixed at load time; the source is read-only for the
/// duration of a job and discarded when the job completes.
pub struct PdfSource {
    bytes: Vec<u8>,
    page_count: u32,
}

impl PdfSource {
    /// Parse a PDF from bytes.
    ///
    /// Malformed input fails here and is never retried: parsing the same
    /// bytes again cannot succeed.
    pub fn load(bytes: Vec<u8>) -> Result<Self, SourceError> {
        let document = Document::load_mem(&bytes).map_err(|e| SourceError::Parse(e.to_string()))?;
        if document.is_encrypted() {
            return Err(SourceError::Encrypted);
        }

        let page_count = document.get_pages().len() as u32;
        if page_count == 0 {
            return Err(SourceError::NoPages);
        }

        debug!("loaded PDF with {page_count} pages ({} bytes)", bytes.len());
        Ok(Self { bytes, page_count })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// The raw source bytes, for vector-copy assembly or re-rendering.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
