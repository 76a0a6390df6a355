use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the weights record inside a model directory.
pub const WEIGHTS_FILE: &str = "digit_net";
/// File name of the optional label list inside a model directory.
pub const LABELS_FILE: &str = "labels.json";
/// Side length of the square the classifier consumes.
pub const DEFAULT_INPUT_SIZE: usize = 28;

/// Where the pretrained digit model lives and what it expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Burn record path (the recorder appends its own extension).
    pub weight_path: PathBuf,
    /// JSON array of label names. The digits `0`-`9` are used when absent.
    pub labels_path: Option<PathBuf>,
    /// Side length the model was trained on.
    pub input_size: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            weight_path: Path::new("artifacts/digits").join(WEIGHTS_FILE),
            labels_path: None,
            input_size: DEFAULT_INPUT_SIZE,
        }
    }
}

impl ModelConfig {
    /// Layout used by exported models: `<dir>/digit_net` plus an optional
    /// `<dir>/labels.json`.
    pub fn from_dir(dir: impl AsRef<Path>, input_size: usize) -> Self {
        let dir = dir.as_ref();
        let labels = dir.join(LABELS_FILE);
        Self {
            weight_path: dir.join(WEIGHTS_FILE),
            labels_path: labels.is_file().then_some(labels),
            input_size,
        }
    }
}

/// Tunable parameters of the crop step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// Divide y coordinates by the surface height instead of its width.
    ///
    /// Off by default, so both axes are divided by the width.
    pub normalize_y_by_height: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_dir_skips_missing_labels() {
        let dir = tempfile::tempdir().unwrap();
        let config = ModelConfig::from_dir(dir.path(), 28);

        assert_eq!(config.weight_path, dir.path().join("digit_net"));
        assert!(config.labels_path.is_none());
    }

    #[test]
    fn from_dir_picks_up_labels_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LABELS_FILE), "[\"a\",\"b\"]").unwrap();

        let config = ModelConfig::from_dir(dir.path(), 28);
        assert_eq!(config.labels_path, Some(dir.path().join(LABELS_FILE)));
    }

    #[test]
    fn options_default_to_width_normalization() {
        assert!(!ClassifierOptions::default().normalize_y_by_height);
    }
}
