//! Audioload library

pub mod downloader;
pub mod extractor;
pub mod utils;

// Re-export main types for easier use
pub use downloader::{build_http_client, AudioDownloader};
pub use extractor::{
    select_audio_format, select_format_by_label, Format, FormatList, VideoInfo, VideoSource,
    YtDlpSource,
};
pub use utils::{AudioloadError, DownloadSettings};
