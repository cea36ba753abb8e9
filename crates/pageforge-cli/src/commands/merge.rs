//! Merge command - concatenate PDFs and images into one PDF.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use pageforge_core::MergeJob;

use super::{file_stem, load_config, BarObserver};

/// Arguments for the merge command.
#[derive(Args)]
pub struct MergeArgs {
    /// Input files in output order (PDF, PNG, JPEG, ...)
    #[arg(required = true, num_args = 2..)]
    inputs: Vec<PathBuf>,

    /// Output file
    #[arg(short, long, default_value = "merged.pdf")]
    output: PathBuf,
}

pub async fn run(args: MergeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let _config = load_config(config_path)?;

    let mut job = MergeJob::new();
    for input in &args.inputs {
        if !input.exists() {
            anyhow::bail!("Input file not found: {}", input.display());
        }
        let bytes = fs::read(input)?;
        let extension = input
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "pdf" => job.add_pdf(bytes),
            "png" | "jpg" | "jpeg" | "webp" | "bmp" | "tiff" => {
                job.add_image(file_stem(input), bytes)
            }
            _ => anyhow::bail!("Unsupported file format: {extension}"),
        }
    }

    info!("Merging {} files", job.input_count());
    let mut observer = BarObserver::new();
    let output = job.run(&mut observer)?;
    observer.finish("Done");

    fs::write(&args.output, &output)?;
    println!(
        "{} {} ({} inputs, {} bytes)",
        style("Wrote").green().bold(),
        args.output.display(),
        args.inputs.len(),
        output.len()
    );
    Ok(())
}
