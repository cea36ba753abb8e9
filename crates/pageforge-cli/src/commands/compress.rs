//! Compress command - re-render pages as JPEGs and rebuild the PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::info;

use pageforge_core::{
    ColorMode, CompressJob, PdfSource, PdfiumBackend, QualityPreset, RasterBackend,
    RenderedPdfSource, TransformOptions,
};

use super::{load_config, BarObserver};

/// Arguments for the compress command.
#[derive(Args)]
pub struct CompressArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "compressed.pdf")]
    output: PathBuf,

    /// Render resolution in DPI (default from config)
    #[arg(short, long)]
    dpi: Option<u32>,

    /// JPEG quality preset (default from config)
    #[arg(short, long, value_enum)]
    quality: Option<Quality>,

    /// Convert pages to grayscale
    #[arg(long)]
    grayscale: bool,

    /// Pages to keep, e.g. "1-3,5" (default: all)
    #[arg(short, long, default_value = "all")]
    pages: String,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Quality {
    /// Quality 0.85
    High,
    /// Quality 0.65
    Medium,
    /// Quality 0.45
    Low,
}

impl From<Quality> for QualityPreset {
    fn from(quality: Quality) -> Self {
        match quality {
            Quality::High => QualityPreset::High,
            Quality::Medium => QualityPreset::Medium,
            Quality::Low => QualityPreset::Low,
        }
    }
}

pub async fn run(args: CompressArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let dpi = args.dpi.unwrap_or(config.render.default_dpi);
    let preset: QualityPreset = args
        .quality
        .map(Into::into)
        .unwrap_or(config.output.quality);

    let mut options = TransformOptions::from_dpi(dpi).with_quality(preset.factor());
    if args.grayscale {
        options = options.with_color_mode(ColorMode::Grayscale);
    }

    info!("Compressing {} at {dpi} DPI", args.input.display());
    let source = PdfSource::load(fs::read(&args.input)?)?;

    let backend = PdfiumBackend::new()?;
    let document = backend.open(source.bytes())?;
    let rendered = RenderedPdfSource::new(document)?;

    let mut observer = BarObserver::new();
    let output = CompressJob::new(options)
        .with_range(&args.pages)
        .run(&rendered, &mut observer)?;
    observer.finish("Done");

    let input_size = source.bytes().len();
    fs::write(&args.output, &output)?;
    println!(
        "{} {} ({} -> {} bytes, {:.1}s)",
        style("Wrote").green().bold(),
        args.output.display(),
        input_size,
        output.len(),
        start.elapsed().as_secs_f32()
    );
    Ok(())
}
