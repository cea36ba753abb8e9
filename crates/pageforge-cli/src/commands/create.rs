//! Create command - lay out images one per A4 page in a new PDF.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use pageforge_core::{ImageSource, ImagesToPdfJob, Orientation};

use super::{file_stem, load_config, BarObserver};

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Input images in page order
    #[arg(required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output file
    #[arg(short, long, default_value = "created.pdf")]
    output: PathBuf,

    /// Use landscape A4 pages
    #[arg(long)]
    landscape: bool,
}

pub async fn run(args: CreateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let _config = load_config(config_path)?;

    let mut source = ImageSource::new();
    for input in &args.inputs {
        if !input.exists() {
            anyhow::bail!("Input file not found: {}", input.display());
        }
        source.push(file_stem(input), &fs::read(input)?)?;
    }

    let orientation = if args.landscape {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };

    info!("Creating PDF from {} images", args.inputs.len());
    let mut observer = BarObserver::new();
    let output = ImagesToPdfJob::new(orientation).run(&source, &mut observer)?;
    observer.finish("Done");

    fs::write(&args.output, &output)?;
    println!(
        "{} {} ({} pages, {} bytes)",
        style("Wrote").green().bold(),
        args.output.display(),
        args.inputs.len(),
        output.len()
    );
    Ok(())
}
