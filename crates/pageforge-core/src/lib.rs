//! Core library for the pageforge document toolkit.
//!
//! This crate provides:
//! - Page sources (PDF bytes, loose images) exposing a uniform view of an
//!   ordered sequence of renderable pages
//! - Page-range resolution ("all", "1-3,5")
//! - Per-page raster transforms (scale, grayscale, JPEG/PNG encoding)
//! - Output document assembly (raster-embedded or vector-copied pages)
//! - Job orchestration with per-page progress reporting and archive bundling
//!
//! Jobs process pages strictly sequentially; one job owns its render handle
//! for its whole run and a failed job discards all partial output.

pub mod assemble;
pub mod config;
pub mod error;
pub mod jobs;
pub mod materialize;
pub mod progress;
pub mod select;
pub mod source;
pub mod transform;

pub use assemble::{OutputDocument, PagePlacement, A4_PORTRAIT};
pub use config::{ForgeConfig, QualityPreset};
pub use error::{ForgeError, Result};
pub use jobs::{
    CompressJob, ExtractImagesJob, ImagesToPdfJob, MergeInput, MergeJob, Orientation, SplitJob,
};
pub use materialize::{ArchiveBuilder, DirectorySink, MemorySink, OutputSink};
pub use progress::{JobProgress, NullObserver, ProgressObserver, ProgressReporter};
pub use select::{resolve_page_range, resolve_page_range_strict};
pub use source::{ImageSource, PageSource, PdfSource};
pub use transform::{ColorMode, EncodedPage, OutputFormat, TransformOptions};

#[cfg(feature = "render")]
pub use source::RenderedPdfSource;

/// Re-export render backend types.
#[cfg(feature = "render")]
pub use pageforge_render::{RasterBackend, RasterDocument, RenderError};

#[cfg(feature = "render")]
pub use pageforge_render::PdfiumBackend;
