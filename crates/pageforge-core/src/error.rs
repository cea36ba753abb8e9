//! Error types for the pageforge-core library.
//!
//! All errors are local to one job invocation and none are retried: parsing
//! the same malformed bytes again cannot succeed, so callers surface the
//! failure and let the user retry with corrected input.

use thiserror::Error;

/// Main error type for the pageforge library.
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Page source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Page-range selection error (strict mode only).
    #[error("page range error: {0}")]
    Select(#[from] SelectError),

    /// Raster transform error.
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    /// Document assembly error.
    #[error("assembly error: {0}")]
    Assemble(#[from] AssembleError),

    /// Output materialization error.
    #[error("output error: {0}")]
    Materialize(#[from] MaterializeError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while loading or addressing a page source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The input bytes are not a parseable document.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// The document is encrypted and cannot be processed.
    #[error("document is encrypted")]
    Encrypted,

    /// The document is empty.
    #[error("document has no pages")]
    NoPages,

    /// Page index outside `[1, page_count]`.
    #[error("invalid page index: {0}")]
    InvalidPage(u32),

    /// An image input could not be decoded.
    #[error("unsupported image input: {0}")]
    UnsupportedImage(String),
}

/// Errors raised by the page-range selector in strict mode.
///
/// The default (lenient) resolver never fails; it drops malformed tokens
/// instead.
#[derive(Error, Debug)]
pub enum SelectError {
    /// A token could not be parsed as a page number or range.
    #[error("malformed range token: {0:?}")]
    MalformedToken(String),

    /// A range was written high-to-low.
    #[error("inverted range: {start}-{end}")]
    InvertedRange { start: u32, end: u32 },

    /// A page number falls outside the document.
    #[error("page {page} out of bounds (document has {page_count} pages)")]
    OutOfBounds { page: u32, page_count: u32 },
}

/// Errors raised while transforming a single page.
#[derive(Error, Debug)]
pub enum TransformError {
    /// Rendering failed; identifies the page at fault.
    #[error("failed to render page {page}: {reason}")]
    Render { page: u32, reason: String },

    /// Encoding the rendered bitmap failed.
    #[error("failed to encode page image: {0}")]
    Encode(String),
}

/// Errors raised while assembling the output document.
#[derive(Error, Debug)]
pub enum AssembleError {
    /// No pages were selected or appended; checked before any processing.
    #[error("no pages to process")]
    Empty,

    /// A source page could not be vector-copied.
    #[error("failed to copy pages: {0}")]
    PageCopy(String),

    /// An image could not be embedded as a page.
    #[error("failed to embed image: {0}")]
    ImageEmbed(String),

    /// Serializing the assembled document failed.
    #[error("failed to save document: {0}")]
    Save(String),
}

/// Errors raised while materializing final outputs.
#[derive(Error, Debug)]
pub enum MaterializeError {
    /// Archive construction failed.
    #[error("archive error: {0}")]
    Archive(String),

    /// I/O error while delivering an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the pageforge library.
pub type Result<T> = std::result::Result<T, ForgeError>;
