//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Directory where downloaded audio files are placed when the caller
    /// does not give an explicit output path
    pub output_dir: PathBuf,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            output_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from("./downloads")),
        }
    }
}

impl DownloadSettings {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}
