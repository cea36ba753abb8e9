//! Command implementations and shared CLI plumbing.

pub mod compress;
pub mod create;
pub mod extract;
pub mod merge;
pub mod split;

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use pageforge_core::{ForgeConfig, JobProgress, ProgressObserver};

/// Load configuration from an explicit path, or fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ForgeConfig> {
    match config_path {
        Some(path) => Ok(ForgeConfig::from_file(Path::new(path))?),
        None => Ok(ForgeConfig::default()),
    }
}

/// Progress observer driving an indicatif bar.
pub struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    pub fn new() -> Self {
        let bar = ProgressBar::new(1);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("##-"),
        );
        Self { bar }
    }

    pub fn finish(&self, message: &'static str) {
        self.bar.finish_with_message(message);
    }
}

impl Default for BarObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for BarObserver {
    fn on_progress(&mut self, progress: &JobProgress) {
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(progress.current as u64);
        self.bar.set_message(progress.label.clone());
    }
}

/// File stem of a path, for naming derived outputs.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string()
}
