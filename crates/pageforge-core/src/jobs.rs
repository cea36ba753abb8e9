//! Job orchestration: end-to-end pipelines tying sources, transforms, and
//! assembly together.
//!
//! Every job processes its units strictly sequentially and reports one
//! progress event per completed unit. A job that fails partway returns the
//! error and discards all partial output; nothing half-built is delivered.

use tracing::info;

use crate::assemble::{OutputDocument, PagePlacement, A4_PORTRAIT};
use crate::error::AssembleError;
use crate::progress::{ProgressObserver, ProgressReporter};
use crate::select::resolve_page_range;
use crate::source::{ImageSource, PageSource, PdfSource};
use crate::transform::{
    encode_image, rasterize_page, EncodedPage, OutputFormat, TransformOptions,
};
use crate::Result;

/// Page orientation for fixed-size output pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    fn page_size(self) -> (f32, f32) {
        let (w, h) = A4_PORTRAIT;
        match self {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Re-render selected pages as compressed raster images and reassemble them
/// into a new PDF.
#[derive(Debug, Clone)]
pub struct CompressJob {
    options: TransformOptions,
    range: String,
}

impl Default for CompressJob {
    fn default() -> Self {
        Self::new(TransformOptions::default())
    }
}

impl CompressJob {
    pub fn new(options: TransformOptions) -> Self {
        Self {
            options,
            range: "all".to_string(),
        }
    }

    /// Restrict processing to a page range ("all", "1-3,5").
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = range.into();
        self
    }

    pub fn run(
        &self,
        source: &dyn PageSource,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Vec<u8>> {
        let pages = resolve_page_range(&self.range, source.page_count());
        if pages.is_empty() {
            return Err(AssembleError::Empty.into());
        }

        info!(
            "compressing {} of {} pages at scale {}",
            pages.len(),
            source.page_count(),
            self.options.scale
        );
        let mut reporter = ProgressReporter::new(observer, pages.len() as u32);
        let mut output = OutputDocument::new();
        for &page in &pages {
            let encoded = rasterize_page(source, page, &self.options)?;
            output.append_rendered(&encoded)?;
            reporter.advance(format!("Page {page}"));
        }
        Ok(output.finalize()?)
    }
}

/// One input to a merge: a whole PDF or a single image.
pub enum MergeInput {
    Pdf(Vec<u8>),
    Image { name: String, bytes: Vec<u8> },
}

/// Concatenate PDFs and images into one PDF, in input order.
///
/// PDF pages are vector-copied; images become full-bleed pages sized to
/// their pixel dimensions.
#[derive(Default)]
pub struct MergeJob {
    inputs: Vec<MergeInput>,
}

impl MergeJob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pdf(&mut self, bytes: Vec<u8>) {
        self.inputs.push(MergeInput::Pdf(bytes));
    }

    pub fn add_image(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.inputs.push(MergeInput::Image {
            name: name.into(),
            bytes,
        });
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn run(&self, observer: &mut dyn ProgressObserver) -> Result<Vec<u8>> {
        if self.inputs.is_empty() {
            return Err(AssembleError::Empty.into());
        }

        info!("merging {} inputs", self.inputs.len());
        let mut reporter = ProgressReporter::new(observer, self.inputs.len() as u32);
        let mut output = OutputDocument::new();
        for (n, input) in self.inputs.iter().enumerate() {
            match input {
                MergeInput::Pdf(bytes) => {
                    let source = PdfSource::load(bytes.clone())?;
                    let all: Vec<u32> = (1..=source.page_count()).collect();
                    output.copy_pages(source.bytes(), &all)?;
                    reporter.advance(format!("File {}", n + 1));
                }
                MergeInput::Image { name, bytes } => {
                    let encoded = encode_image_input(bytes)?;
                    output.append_rendered(&encoded)?;
                    reporter.advance(name.clone());
                }
            }
        }
        Ok(output.finalize()?)
    }
}

/// Vector-copy a page selection into a new PDF, preserving fidelity.
#[derive(Debug, Clone)]
pub struct SplitJob {
    range: String,
}

impl SplitJob {
    pub fn new(range: impl Into<String>) -> Self {
        Self {
            range: range.into(),
        }
    }

    pub fn run(&self, source: &PdfSource, observer: &mut dyn ProgressObserver) -> Result<Vec<u8>> {
        let pages = resolve_page_range(&self.range, source.page_count());
        if pages.is_empty() {
            return Err(AssembleError::Empty.into());
        }

        info!(
            "extracting {} of {} pages",
            pages.len(),
            source.page_count()
        );
        // Page-by-page copies; finalize prunes whatever each import drags
        // in that the selected page does not reference.
        let mut reporter = ProgressReporter::new(observer, pages.len() as u32);
        let mut output = OutputDocument::new();
        for &page in &pages {
            output.copy_pages(source.bytes(), &[page])?;
            reporter.advance(format!("Page {page}"));
        }
        Ok(output.finalize()?)
    }
}

/// Rasterize selected pages to standalone image files.
#[derive(Debug, Clone)]
pub struct ExtractImagesJob {
    options: TransformOptions,
    range: String,
}

impl Default for ExtractImagesJob {
    fn default() -> Self {
        Self::new(TransformOptions::default())
    }
}

impl ExtractImagesJob {
    pub fn new(options: TransformOptions) -> Self {
        Self {
            options,
            range: "all".to_string(),
        }
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = range.into();
        self
    }

    /// Render each selected page to a named, encoded image. Names follow
    /// `{stem}-page-{n}.{ext}` with the original 1-based page number.
    pub fn run(
        &self,
        source: &dyn PageSource,
        stem: &str,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Vec<(String, EncodedPage)>> {
        let pages = resolve_page_range(&self.range, source.page_count());
        if pages.is_empty() {
            return Err(AssembleError::Empty.into());
        }

        let mut reporter = ProgressReporter::new(observer, pages.len() as u32);
        let mut outputs = Vec::with_capacity(pages.len());
        for &page in &pages {
            let encoded = rasterize_page(source, page, &self.options)?;
            let name = format!("{stem}-page-{page}.{}", encoded.format.extension());
            outputs.push((name, encoded));
            reporter.advance(format!("Page {page}"));
        }
        Ok(outputs)
    }
}

/// Lay out images one per A4 page, aspect-fit and centered.
#[derive(Debug, Clone)]
pub struct ImagesToPdfJob {
    orientation: Orientation,
    quality: f32,
}

impl Default for ImagesToPdfJob {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            quality: 0.92,
        }
    }
}

impl ImagesToPdfJob {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    pub fn run(&self, source: &ImageSource, observer: &mut dyn ProgressObserver) -> Result<Vec<u8>> {
        if source.is_empty() {
            return Err(AssembleError::Empty.into());
        }

        let (page_width, page_height) = self.orientation.page_size();
        let mut reporter = ProgressReporter::new(observer, source.page_count());
        let mut output = OutputDocument::new();
        for page in 1..=source.page_count() {
            let image = source.render_page(page, 1.0)?;
            let placement =
                PagePlacement::fit_centered(image.width(), image.height(), page_width, page_height);
            let encoded = EncodedPage {
                bytes: encode_image(&image, OutputFormat::Jpeg, self.quality)
                    .map_err(crate::error::ForgeError::Transform)?,
                format: OutputFormat::Jpeg,
                width: image.width(),
                height: image.height(),
            };
            output.append_image_page(&encoded, placement)?;
            let label = source.name(page).unwrap_or("image").to_string();
            reporter.advance(label);
        }
        Ok(output.finalize()?)
    }
}

/// Prepare raw image-file bytes for embedding: JPEG and PNG pass through
/// unchanged, anything else is transcoded to PNG.
fn encode_image_input(bytes: &[u8]) -> Result<EncodedPage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| crate::error::SourceError::UnsupportedImage(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());

    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => Ok(EncodedPage {
            bytes: bytes.to_vec(),
            format: OutputFormat::Jpeg,
            width,
            height,
        }),
        Ok(image::ImageFormat::Png) => Ok(EncodedPage {
            bytes: bytes.to_vec(),
            format: OutputFormat::Png,
            width,
            height,
        }),
        _ => {
            let rgba = decoded.to_rgba8();
            let png = encode_image(&rgba, OutputFormat::Png, 1.0)
                .map_err(crate::error::ForgeError::Transform)?;
            Ok(EncodedPage {
                bytes: png,
                format: OutputFormat::Png,
                width,
                height,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{JobProgress, NullObserver};
    use image::RgbaImage;
    use lopdf::Document;
    use pretty_assertions::assert_eq;

    /// Fake page source rendering solid-color pages of a fixed size.
    struct SolidSource {
        pages: u32,
        width: f32,
        height: f32,
    }

    impl PageSource for SolidSource {
        fn page_count(&self) -> u32 {
            self.pages
        }

        fn page_size(&self, _index: u32) -> crate::Result<(f32, f32)> {
            Ok((self.width, self.height))
        }

        fn render_page(&self, index: u32, scale: f32) -> crate::Result<RgbaImage> {
            if index < 1 || index > self.pages {
                return Err(crate::error::SourceError::InvalidPage(index).into());
            }
            let w = (self.width * scale).ceil() as u32;
            let h = (self.height * scale).ceil() as u32;
            Ok(RgbaImage::from_pixel(
                w,
                h,
                image::Rgba([index as u8 * 10, 0, 0, 255]),
            ))
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, image::Rgba([0, 200, 0, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        bytes
    }

    fn letter_source(pages: u32) -> SolidSource {
        SolidSource {
            pages,
            width: 612.0,
            height: 792.0,
        }
    }

    #[test]
    fn test_compress_selected_pages() {
        let source = letter_source(3);
        let job = CompressJob::new(TransformOptions::from_dpi(75)).with_range("1-2");

        let mut events: Vec<JobProgress> = Vec::new();
        let mut observer = |p: &JobProgress| events.push(p.clone());
        let bytes = job.run(&source, &mut observer).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].current, 2);
        assert_eq!(events[1].total, 2);

        // scale 75/72 of a 612x792 page, ceiled
        let pages = doc.get_pages();
        let dict = doc.get_object(pages[&1]).unwrap().as_dict().unwrap();
        let media_box = dict.get(b"MediaBox").unwrap().as_array().unwrap();
        let width = match media_box[2] {
            lopdf::Object::Real(v) => v,
            lopdf::Object::Integer(v) => v as f32,
            _ => panic!("unexpected MediaBox entry"),
        };
        assert_eq!(width, (612.0_f32 * (75.0 / 72.0)).ceil());
    }

    #[test]
    fn test_compress_empty_selection_is_rejected() {
        let source = letter_source(2);
        let job = CompressJob::default().with_range("5-9");
        let result = job.run(&source, &mut NullObserver);
        assert!(matches!(
            result,
            Err(crate::ForgeError::Assemble(AssembleError::Empty))
        ));
    }

    #[test]
    fn test_merge_pdfs_and_images() {
        let first = crate::assemble::tests_support::test_pdf(2);
        let second = crate::assemble::tests_support::test_pdf(3);

        let mut job = MergeJob::new();
        job.add_pdf(first);
        job.add_image("photo", png_bytes(20, 10));
        job.add_pdf(second);
        assert_eq!(job.input_count(), 3);

        let bytes = job.run(&mut NullObserver).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 6);
    }

    #[test]
    fn test_merge_with_no_inputs_is_rejected() {
        let job = MergeJob::new();
        assert!(job.run(&mut NullObserver).is_err());
    }

    #[test]
    fn test_split_extracts_selection_in_order() {
        let input = crate::assemble::tests_support::test_pdf(5);
        let source = PdfSource::load(input).unwrap();

        let mut events: Vec<JobProgress> = Vec::new();
        let mut observer = |p: &JobProgress| events.push(p.clone());
        let bytes = SplitJob::new("3,1").run(&source, &mut observer).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
        // One event per copied page, in selection order.
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].label, "Page 3");
        assert_eq!(events[1].label, "Page 1");
        assert_eq!(events[1].current, 2);
        assert_eq!(events[1].total, 2);
    }

    #[test]
    fn test_extract_names_follow_page_numbers() {
        let source = letter_source(4);
        let job = ExtractImagesJob::new(TransformOptions::default().with_format(OutputFormat::Png))
            .with_range("2,4");

        let outputs = job.run(&source, "report", &mut NullObserver).unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].0, "report-page-2.png");
        assert_eq!(outputs[1].0, "report-page-4.png");
    }

    #[test]
    fn test_images_to_pdf_uses_a4_pages() {
        let mut source = ImageSource::new();
        source.push("wide", &png_bytes(200, 100)).unwrap();
        source.push("tall", &png_bytes(50, 300)).unwrap();

        let bytes = ImagesToPdfJob::default()
            .run(&source, &mut NullObserver)
            .unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);

        let dict = doc.get_object(pages[&1]).unwrap().as_dict().unwrap();
        let media_box = dict.get(b"MediaBox").unwrap().as_array().unwrap();
        let width = match media_box[2] {
            lopdf::Object::Real(v) => v,
            lopdf::Object::Integer(v) => v as f32,
            _ => panic!("unexpected MediaBox entry"),
        };
        assert_eq!(width, A4_PORTRAIT.0);
    }

    #[test]
    fn test_images_to_pdf_landscape_swaps_dimensions() {
        let (w, h) = Orientation::Landscape.page_size();
        assert_eq!((w, h), (A4_PORTRAIT.1, A4_PORTRAIT.0));
    }

    #[test]
    fn test_encode_image_input_passthrough_and_transcode() {
        let png = png_bytes(8, 6);
        let encoded = encode_image_input(&png).unwrap();
        assert_eq!(encoded.format, OutputFormat::Png);
        assert_eq!(encoded.bytes, png);
        assert_eq!((encoded.width, encoded.height), (8, 6));

        // BMP is neither JPEG nor PNG and gets transcoded.
        let image = RgbaImage::from_pixel(4, 4, image::Rgba([1, 2, 3, 255]));
        let mut bmp = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bmp), image::ImageFormat::Bmp)
            .unwrap();
        let encoded = encode_image_input(&bmp).unwrap();
        assert_eq!(encoded.format, OutputFormat::Png);
    }
}
