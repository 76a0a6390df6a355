//! Application configuration, stored as TOML.

use anyhow::{Context, Result};
use recognizer::{ClassifierOptions, ModelConfig};
use serde::{Deserialize, Serialize};
use sketch::{DEFAULT_PADDING, SurfaceStyle};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Drawing surface size and colours
    pub canvas: SurfaceStyle,
    /// Gesture tracking
    pub tracker: TrackerConfig,
    /// Crop step options
    pub classifier: ClassifierOptions,
    /// Pretrained model location
    pub model: ModelConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Margin added around each gesture, split between opposite sides
    pub padding: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
        }
    }
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, content)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    Ok(())
}
