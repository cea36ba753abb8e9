//! WASM bindings for PDF page transformation and assembly.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Rasterization is not available here; the browser host renders pages (via
//! its own PDF engine) and hands pixel buffers to the helpers below, while
//! vector-copy operations run entirely in WASM.

use wasm_bindgen::prelude::*;

use pageforge_core::{
    resolve_page_range, ArchiveBuilder, ImageSource, ImagesToPdfJob, JobProgress, MergeJob,
    Orientation, PdfSource, ProgressObserver, SplitJob,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    web_sys::console::debug_1(&format!("pageforge-wasm {}", version()).into());
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Resolve a page-range expression ("all", "1-3,5") against a page count.
///
/// Returns the selected 1-based page numbers in selection order. Malformed
/// tokens are dropped, never an error.
#[wasm_bindgen]
pub fn resolve_range(spec: &str, page_count: u32) -> Vec<u32> {
    resolve_page_range(spec, page_count)
}

/// Grayscale a raw RGBA pixel buffer in place (e.g. canvas ImageData bytes).
#[wasm_bindgen]
pub fn grayscale_rgba(pixels: &mut [u8]) {
    pageforge_core::transform::grayscale_rgba_bytes(pixels);
}

/// Extract a page range from a PDF into a new PDF, without rasterizing.
#[wasm_bindgen]
pub fn split_pdf(bytes: &[u8], range: &str) -> Result<Vec<u8>, JsValue> {
    let source = PdfSource::load(bytes.to_vec()).map_err(to_js)?;
    SplitJob::new(range)
        .run(&source, &mut NoopObserver)
        .map_err(to_js)
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_progress(&mut self, _progress: &JobProgress) {}
}

/// Adapter forwarding progress events to a JS callback
/// `(current, total, label) => void`.
struct JsObserver {
    callback: Option<js_sys::Function>,
}

impl ProgressObserver for JsObserver {
    fn on_progress(&mut self, progress: &JobProgress) {
        if let Some(callback) = &self.callback {
            let _ = callback.call3(
                &JsValue::NULL,
                &JsValue::from(progress.current),
                &JsValue::from(progress.total),
                &JsValue::from_str(&progress.label),
            );
        }
    }
}

/// Accumulates PDFs and images, then merges them into one PDF in input order.
#[wasm_bindgen]
pub struct MergeWorkbench {
    job: MergeJob,
}

#[wasm_bindgen]
impl MergeWorkbench {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            job: MergeJob::new(),
        }
    }

    /// Queue a whole PDF; all of its pages are vector-copied.
    #[wasm_bindgen]
    pub fn add_pdf(&mut self, bytes: &[u8]) {
        self.job.add_pdf(bytes.to_vec());
    }

    /// Queue an image; it becomes one full-bleed page.
    #[wasm_bindgen]
    pub fn add_image(&mut self, name: &str, bytes: &[u8]) {
        self.job.add_image(name, bytes.to_vec());
    }

    #[wasm_bindgen]
    pub fn input_count(&self) -> usize {
        self.job.input_count()
    }

    /// Run the merge. `on_progress` is called as `(current, total, label)`.
    #[wasm_bindgen]
    pub fn merge(&self, on_progress: Option<js_sys::Function>) -> Result<Vec<u8>, JsValue> {
        let mut observer = JsObserver {
            callback: on_progress,
        };
        self.job.run(&mut observer).map_err(to_js)
    }
}

impl Default for MergeWorkbench {
    fn default() -> Self {
        Self::new()
    }
}

/// Lays out images one per A4 page and produces a PDF.
#[wasm_bindgen]
pub struct PdfComposer {
    source: ImageSource,
    landscape: bool,
}

#[wasm_bindgen]
impl PdfComposer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            source: ImageSource::new(),
            landscape: false,
        }
    }

    #[wasm_bindgen]
    pub fn set_landscape(&mut self, landscape: bool) {
        self.landscape = landscape;
    }

    /// Append one image as the next page.
    #[wasm_bindgen]
    pub fn add_image(&mut self, name: &str, bytes: &[u8]) -> Result<(), JsValue> {
        self.source.push(name, bytes).map_err(to_js)
    }

    /// Produce the PDF. `on_progress` is called as `(current, total, label)`.
    #[wasm_bindgen]
    pub fn compose(&self, on_progress: Option<js_sys::Function>) -> Result<Vec<u8>, JsValue> {
        let orientation = if self.landscape {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };
        let mut observer = JsObserver {
            callback: on_progress,
        };
        ImagesToPdfJob::new(orientation)
            .run(&self.source, &mut observer)
            .map_err(to_js)
    }
}

impl Default for PdfComposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Bundles named outputs into one downloadable zip archive.
#[wasm_bindgen]
pub struct ArchiveBundle {
    builder: ArchiveBuilder,
}

#[wasm_bindgen]
impl ArchiveBundle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            builder: ArchiveBuilder::new(),
        }
    }

    #[wasm_bindgen]
    pub fn add_entry(&mut self, filename: &str, bytes: &[u8]) -> Result<(), JsValue> {
        self.builder.add_entry(filename, bytes).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn entry_count(&self) -> usize {
        self.builder.entry_count()
    }

    /// Finish the archive and return its bytes. Consumes the bundle.
    #[wasm_bindgen]
    pub fn finalize(self) -> Result<Vec<u8>, JsValue> {
        self.builder.finalize().map_err(to_js)
    }
}

impl Default for ArchiveBundle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_resolve_range() {
        assert_eq!(resolve_range("1-3,5", 10), vec![1, 2, 3, 5]);
        assert_eq!(resolve_range("all", 3), vec![1, 2, 3]);
    }

    #[wasm_bindgen_test]
    fn test_grayscale_rgba() {
        let mut pixels = [255, 0, 0, 255];
        grayscale_rgba(&mut pixels);
        assert_eq!(pixels, [76, 76, 76, 255]);
    }

    #[wasm_bindgen_test]
    fn test_workbench_counts_inputs() {
        let mut workbench = MergeWorkbench::new();
        workbench.add_pdf(b"%PDF-");
        assert_eq!(workbench.input_count(), 1);
    }
}
