//! Error types for the render layer.

use thiserror::Error;

/// Errors that can occur while rasterizing PDF pages.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to bind the backend library.
    #[error("failed to initialize render backend: {0}")]
    BackendInit(String),

    /// The document could not be opened for rendering.
    #[error("failed to open document: {0}")]
    DocumentOpen(String),

    /// A page could not be accessed.
    #[error("failed to access page {page}: {reason}")]
    PageAccess { page: u32, reason: String },

    /// A page was opened but could not be rendered.
    #[error("failed to render page {page}: {reason}")]
    RenderFailed { page: u32, reason: String },
}
