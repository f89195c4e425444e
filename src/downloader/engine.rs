//! Audio download orchestration
//!
//! The facade glues selection and transfer together: resolve metadata,
//! pick a format, make sure the destination exists, hand the open file to
//! the source. One attempt per call, every error propagated unchanged.

use crate::extractor::models::{Format, VideoInfo};
use crate::extractor::selector::{select_audio_format, select_format_by_label};
use crate::extractor::traits::VideoSource;
use crate::utils::config::DownloadSettings;
use crate::utils::error::AudioloadError;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Audio downloader facade
///
/// Constructed once at startup and shared by reference; the HTTP client is
/// read-only after construction, so concurrent downloads are safe. Two
/// concurrent calls writing the same output path race on file truncation;
/// serializing per path is the caller's responsibility.
pub struct AudioDownloader {
    settings: DownloadSettings,
    client: Client,
    source: Arc<dyn VideoSource>,
}

impl AudioDownloader {
    pub fn new(settings: DownloadSettings, client: Client, source: Arc<dyn VideoSource>) -> Self {
        Self {
            settings,
            client,
            source,
        }
    }

    /// The shared HTTP client; the same instance for the downloader's
    /// whole lifetime
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn output_dir(&self) -> &Path {
        &self.settings.output_dir
    }

    /// Resolve video metadata through the configured source
    pub async fn fetch_metadata(&self, video_id: &str) -> Result<VideoInfo, AudioloadError> {
        self.source.fetch_metadata(video_id).await
    }

    /// Resolve metadata and pick a format by a quality label
    ///
    /// A numeric label selects that exact itag; anything else yields the
    /// best overall format.
    pub async fn fetch_with_format(
        &self,
        video_id: &str,
        label: &str,
    ) -> Result<(VideoInfo, Format), AudioloadError> {
        let video = self.source.fetch_metadata(video_id).await?;
        let format = select_format_by_label(&video.formats, label)?;
        Ok((video, format))
    }

    /// Select the best audio format and download it to `output_path`
    pub async fn download_audio(
        &self,
        cancel: CancellationToken,
        output_path: &Path,
        video: &VideoInfo,
        mimetype: Option<&str>,
        language: Option<&str>,
    ) -> Result<(), AudioloadError> {
        let audio_format = select_audio_format(&video.formats, mimetype, language)?;

        info!(
            id = %video.id,
            audio_mime_type = %audio_format.mime_type,
            "downloading audio"
        );

        self.download_format(cancel, output_path, video, &audio_format)
            .await
    }

    /// Download an already-chosen format to `output_path`
    ///
    /// Parent directories are created as needed and the destination is
    /// created or truncated. A failed transfer leaves the partial file on
    /// disk; no cleanup or retry happens here.
    pub async fn download_format(
        &self,
        cancel: CancellationToken,
        output_path: &Path,
        video: &VideoInfo,
        format: &Format,
    ) -> Result<(), AudioloadError> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut dest = fs::File::create(output_path).await?;

        self.source
            .stream_to(&mut dest, video, format, cancel)
            .await
    }

    /// Default destination under the configured output directory:
    /// `<id>.<ext>`, extension taken from the format's container
    pub fn default_output_path(&self, video: &VideoInfo, format: &Format) -> PathBuf {
        self.settings
            .output_dir
            .join(format!("{}.{}", video.id, container_extension(format)))
    }
}

/// File extension implied by the format's MIME container
fn container_extension(format: &Format) -> &'static str {
    let container = format
        .mime_type
        .split(';')
        .next()
        .and_then(|t| t.split('/').nth(1))
        .unwrap_or("");

    match container {
        "mp4" if format.is_audio() => "m4a",
        "mp4" => "mp4",
        "webm" if format.is_audio() => "weba",
        "webm" => "webm",
        "mpeg" => "mp3",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::client::build_http_client;
    use async_trait::async_trait;
    use tokio::fs::File;

    struct NullSource;

    #[async_trait]
    impl VideoSource for NullSource {
        fn id(&self) -> &'static str {
            "null"
        }

        async fn fetch_metadata(&self, _video_id: &str) -> Result<VideoInfo, AudioloadError> {
            Err(AudioloadError::Extraction("null source".into()))
        }

        async fn stream_to(
            &self,
            _dest: &mut File,
            _video: &VideoInfo,
            _format: &Format,
            _cancel: CancellationToken,
        ) -> Result<(), AudioloadError> {
            Ok(())
        }
    }

    fn downloader() -> AudioDownloader {
        AudioDownloader::new(
            DownloadSettings::new("/tmp/audioload-test"),
            build_http_client(),
            Arc::new(NullSource),
        )
    }

    #[test]
    fn test_client_is_the_same_instance_across_calls() {
        let dl = downloader();
        assert!(std::ptr::eq(dl.client(), dl.client()));
    }

    #[test]
    fn test_default_output_path_uses_container_extension() {
        let dl = downloader();
        let video = VideoInfo {
            id: "abc123".into(),
            title: "t".into(),
            url: String::new(),
            duration: None,
            uploader: None,
            formats: Default::default(),
        };
        let format = Format {
            itag: 140,
            mime_type: r#"audio/mp4; codecs="mp4a.40.2""#.into(),
            language: None,
            bitrate: 128,
            url: String::new(),
            filesize: None,
            audio_channels: None,
            quality_label: None,
        };

        let path = dl.default_output_path(&video, &format);
        assert_eq!(path, PathBuf::from("/tmp/audioload-test/abc123.m4a"));
    }

    #[test]
    fn test_webm_audio_extension() {
        let format = Format {
            itag: 251,
            mime_type: r#"audio/webm; codecs="opus""#.into(),
            language: None,
            bitrate: 160,
            url: String::new(),
            filesize: None,
            audio_channels: None,
            quality_label: None,
        };
        assert_eq!(container_extension(&format), "weba");
    }
}
