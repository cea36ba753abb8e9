//! Extract command - export pages as standalone image files.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use pageforge_core::{
    ArchiveBuilder, ColorMode, DirectorySink, ExtractImagesJob, OutputFormat, OutputSink,
    PdfSource, PdfiumBackend, RasterBackend, RenderedPdfSource, TransformOptions,
};

use super::{file_stem, load_config, BarObserver};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Pages to export, e.g. "1-3,5" (default: all)
    #[arg(short, long, default_value = "all")]
    pages: String,

    /// Image format
    #[arg(short, long, value_enum, default_value = "jpg")]
    format: Format,

    /// Render resolution in DPI (default from config)
    #[arg(short, long)]
    dpi: Option<u32>,

    /// Convert pages to grayscale
    #[arg(long)]
    grayscale: bool,

    /// Write loose files into a directory instead of a zip archive
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Output archive (default: <input>-pages.zip)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Format {
    Jpg,
    Png,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Jpg => OutputFormat::Jpeg,
            Format::Png => OutputFormat::Png,
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let dpi = args.dpi.unwrap_or(config.render.default_dpi);
    let mut options = TransformOptions::from_dpi(dpi)
        .with_format(args.format.into())
        .with_quality(config.output.quality.factor());
    if args.grayscale {
        options = options.with_color_mode(ColorMode::Grayscale);
    }

    let stem = file_stem(&args.input);
    let source = PdfSource::load(fs::read(&args.input)?)?;

    let backend = PdfiumBackend::new()?;
    let document = backend.open(source.bytes())?;
    let rendered = RenderedPdfSource::new(document)?;

    info!("Exporting pages of {} at {dpi} DPI", args.input.display());
    let mut observer = BarObserver::new();
    let outputs = ExtractImagesJob::new(options)
        .with_range(&args.pages)
        .run(&rendered, &stem, &mut observer)?;
    observer.finish("Done");

    if let Some(dir) = &args.dir {
        fs::create_dir_all(dir)?;
        let mut sink = DirectorySink::new(dir);
        for (name, page) in &outputs {
            sink.deliver(name, &page.bytes)?;
        }
        println!(
            "{} {} images to {}",
            style("Wrote").green().bold(),
            outputs.len(),
            dir.display()
        );
        return Ok(());
    }

    let mut archive = ArchiveBuilder::new();
    for (name, page) in &outputs {
        archive.add_entry(name, &page.bytes)?;
    }
    let archive_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{stem}-pages.zip")));
    fs::write(&archive_path, archive.finalize()?)?;
    println!(
        "{} {} ({} images)",
        style("Wrote").green().bold(),
        archive_path.display(),
        outputs.len()
    );
    Ok(())
}
