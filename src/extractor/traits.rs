use crate::extractor::models::{Format, VideoInfo};
use crate::utils::error::AudioloadError;
use async_trait::async_trait;
use tokio::fs::File;
use tokio_util::sync::CancellationToken;

/// Capability seam between the download orchestration and the component
/// that talks to the video host
///
/// This trait isolates the facade and the selection logic from the concrete
/// resolution/transfer mechanism (yt-dlp, a native client, a test fake).
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g. "ytdlp")
    fn id(&self) -> &'static str;

    /// Resolve video metadata, including the full list of available formats
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoInfo, AudioloadError>;

    /// Stream the decoded content of `format` into `dest`
    ///
    /// Cancellation is best effort: it takes effect wherever the
    /// implementation checks the token. A failed transfer may leave `dest`
    /// partially written; cleanup is not this layer's job.
    async fn stream_to(
        &self,
        dest: &mut File,
        video: &VideoInfo,
        format: &Format,
        cancel: CancellationToken,
    ) -> Result<(), AudioloadError>;
}
