//! Configuration structures for the transformation pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ForgeError;

/// Main configuration for pageforge jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Rendering configuration.
    pub render: RenderConfig,

    /// Output encoding configuration.
    pub output: OutputConfig,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl ForgeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| ForgeError::Config(format!("failed to parse config: {e}")))
    }
}

/// Page rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Target DPI when the caller does not specify one (150/200/300 are the
    /// usual choices).
    pub default_dpi: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { default_dpi: 150 }
    }
}

/// Output encoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default quality preset for lossy page encoding.
    pub quality: QualityPreset,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
        }
    }
}

/// Named JPEG quality presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    High,
    Medium,
    Low,
}

impl QualityPreset {
    /// Quality factor in (0, 1].
    pub fn factor(self) -> f32 {
        match self {
            QualityPreset::High => 0.85,
            QualityPreset::Medium => 0.65,
            QualityPreset::Low => 0.45,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = ForgeConfig::default();
        assert_eq!(config.render.default_dpi, 150);
        assert_eq!(config.output.quality, QualityPreset::High);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ForgeConfig =
            serde_json::from_str(r#"{"render": {"default_dpi": 300}}"#).unwrap();
        assert_eq!(config.render.default_dpi, 300);
        assert_eq!(config.output.quality, QualityPreset::High);
    }

    #[test]
    fn test_quality_presets() {
        assert_eq!(QualityPreset::High.factor(), 0.85);
        assert_eq!(QualityPreset::Medium.factor(), 0.65);
        assert_eq!(QualityPreset::Low.factor(), 0.45);
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"output": {"quality": "low"}}"#).unwrap();

        let config = ForgeConfig::from_file(&path).unwrap();
        assert_eq!(config.output.quality, QualityPreset::Low);
    }
}
