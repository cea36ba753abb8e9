//! Split command - extract a page range into a new PDF.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use pageforge_core::{PdfSource, SplitJob};

use super::{load_config, BarObserver};

/// Arguments for the split command.
#[derive(Args)]
pub struct SplitArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Pages to extract, e.g. "1-3,5"
    #[arg(short, long, required = true)]
    pages: String,

    /// Output file
    #[arg(short, long, default_value = "split.pdf")]
    output: PathBuf,
}

pub async fn run(args: SplitArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let _config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let source = PdfSource::load(fs::read(&args.input)?)?;
    info!(
        "Extracting pages {:?} of {}",
        args.pages,
        args.input.display()
    );

    let mut observer = BarObserver::new();
    let output = SplitJob::new(&args.pages).run(&source, &mut observer)?;
    observer.finish("Done");

    fs::write(&args.output, &output)?;
    println!(
        "{} {} ({} bytes)",
        style("Wrote").green().bold(),
        args.output.display(),
        output.len()
    );
    Ok(())
}
