//! CLI application for PDF page transformation and assembly.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{compress, create, extract, merge, split};

/// pageforge - Transform, split, merge and convert PDF pages
#[derive(Parser)]
#[command(name = "pageforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-render PDF pages as compressed images and rebuild the document
    Compress(compress::CompressArgs),

    /// Concatenate PDFs and images into one PDF
    Merge(merge::MergeArgs),

    /// Extract a page range into a new PDF without rasterizing
    Split(split::SplitArgs),

    /// Export pages as standalone image files
    Extract(extract::ExtractArgs),

    /// Lay out images one per A4 page in a new PDF
    Create(create::CreateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Compress(args) => compress::run(args, cli.config.as_deref()).await,
        Commands::Merge(args) => merge::run(args, cli.config.as_deref()).await,
        Commands::Split(args) => split::run(args, cli.config.as_deref()).await,
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
        Commands::Create(args) => create::run(args, cli.config.as_deref()).await,
    }
}
