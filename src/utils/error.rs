//! Error handling for audioload

use thiserror::Error;

/// Main error type for audioload
#[derive(Debug, Error)]
pub enum AudioloadError {
    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    #[error("Failed to extract video info: {0}")]
    Extraction(String),

    #[error("no audio format found after filtering (mime_type: {mimetype:?}, language: {language:?})")]
    NoAudioFormat {
        mimetype: Option<String>,
        language: Option<String>,
    },

    #[error("unable to find the specified format: {0}")]
    FormatNotFound(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("download canceled")]
    Canceled,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
