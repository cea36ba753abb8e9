//! Rasterization backend abstraction for pageforge.
//!
//! This crate provides a unified interface for turning PDF pages into pixel
//! buffers:
//! - `PdfiumBackend` binds the system PDFium library at runtime (native)
//! - browser deployments render with the host canvas and never touch this
//!   crate
//!
//! The render surface behind an open document is owned by one job at a time;
//! callers must not share a `RasterDocument` between concurrent jobs.

mod backend;
mod error;

pub use backend::{RasterBackend, RasterDocument};
pub use error::RenderError;

#[cfg(feature = "pdfium")]
pub use backend::pdfium::PdfiumBackend;

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;
