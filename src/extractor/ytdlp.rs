//! yt-dlp backed video source
//!
//! Metadata resolution shells out to `yt-dlp --dump-json`; the byte
//! transfer streams the chosen format's direct URL through the shared HTTP
//! client. Retry, manifest handling and signature work all stay inside
//! yt-dlp and the host's CDN; this module issues a single request per
//! operation.

use crate::extractor::models::{Format, FormatList, VideoInfo};
use crate::extractor::traits::VideoSource;
use crate::utils::error::AudioloadError;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as AsyncCommand;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Video source backed by the yt-dlp binary
pub struct YtDlpSource {
    ytdlp_path: PathBuf,
    client: Client,
}

impl YtDlpSource {
    /// Locate yt-dlp and bind the shared HTTP client
    ///
    /// Search order: system PATH (via `which`), then common installation
    /// paths (Homebrew, system, pip user installs).
    pub fn new(client: Client) -> Result<Self, AudioloadError> {
        let ytdlp_path = match find_ytdlp() {
            Some(path) => {
                info!("Found yt-dlp at: {}", path.display());
                path
            }
            None => {
                error!("yt-dlp not found in PATH or common install locations");
                return Err(AudioloadError::YtDlpNotFound);
            }
        };

        Ok(Self { ytdlp_path, client })
    }

    /// Bind an explicit yt-dlp path, skipping discovery
    pub fn with_path(ytdlp_path: impl Into<PathBuf>, client: Client) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
            client,
        }
    }
}

#[async_trait]
impl VideoSource for YtDlpSource {
    fn id(&self) -> &'static str {
        "ytdlp"
    }

    /// Resolve video metadata without downloading
    /// Uses: yt-dlp --dump-json --no-download
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoInfo, AudioloadError> {
        debug!("Extracting video info for: {}", video_id);

        let output = AsyncCommand::new(&self.ytdlp_path)
            .arg("--dump-json")
            .arg("--no-download")
            .arg("--no-warnings")
            .arg(video_id)
            .output()
            .await?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            error!("yt-dlp extraction failed: {}", error_msg);
            return Err(AudioloadError::Extraction(error_msg.to_string()));
        }

        let raw: RawVideoInfo = serde_json::from_slice(&output.stdout)?;
        Ok(raw.into())
    }

    /// Stream the format's direct URL into the destination file
    ///
    /// The token is checked between chunks, so cancellation lands within
    /// one chunk of the request. Partial output stays on disk.
    async fn stream_to(
        &self,
        dest: &mut File,
        video: &VideoInfo,
        format: &Format,
        cancel: CancellationToken,
    ) -> Result<(), AudioloadError> {
        if format.url.is_empty() {
            return Err(AudioloadError::DownloadFailed(format!(
                "format {} has no direct stream URL",
                format.itag
            )));
        }

        debug!(id = %video.id, itag = format.itag, "requesting stream");
        let response = self.client.get(&format.url).send().await?;

        if !response.status().is_success() {
            return Err(AudioloadError::DownloadFailed(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(id = %video.id, downloaded, "transfer canceled");
                    return Err(AudioloadError::Canceled);
                }
                chunk = stream.next() => match chunk {
                    Some(chunk) => {
                        let chunk = chunk?;
                        dest.write_all(&chunk).await?;
                        downloaded += chunk.len() as u64;
                    }
                    None => break,
                },
            }
        }

        dest.flush().await?;
        info!(id = %video.id, itag = format.itag, downloaded, "transfer complete");
        Ok(())
    }
}

/// yt-dlp's `--dump-json` shape, reduced to the fields we map
#[derive(Debug, Deserialize)]
struct RawVideoInfo {
    id: String,
    title: String,
    #[serde(alias = "webpage_url", default)]
    url: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: String,
    #[serde(default)]
    ext: String,
    #[serde(default)]
    acodec: Option<String>,
    #[serde(default)]
    vcodec: Option<String>,
    #[serde(default)]
    abr: Option<f64>,
    #[serde(default)]
    tbr: Option<f64>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    filesize: Option<u64>,
    #[serde(default)]
    audio_channels: Option<u32>,
    #[serde(default)]
    format_note: Option<String>,
}

impl From<RawVideoInfo> for VideoInfo {
    fn from(raw: RawVideoInfo) -> Self {
        let formats = raw.formats.into_iter().map(Format::from).collect();
        VideoInfo {
            id: raw.id,
            title: raw.title,
            url: raw.url,
            duration: raw.duration.map(|d| d.round() as u64),
            uploader: raw.uploader,
            formats: FormatList::new(formats),
        }
    }
}

impl From<RawFormat> for Format {
    fn from(raw: RawFormat) -> Self {
        let mime_type = mime_type_of(&raw);
        // yt-dlp reports the itag as the format_id for this host; ids that
        // are not plain integers (storyboards, merged specs) map to 0 and
        // never match an itag filter.
        let itag = raw.format_id.parse().unwrap_or(0);
        let bitrate = raw.abr.or(raw.tbr).map(|b| b.round() as u64).unwrap_or(0);

        Format {
            itag,
            mime_type,
            language: raw.language,
            bitrate,
            url: raw.url.unwrap_or_default(),
            filesize: raw.filesize,
            audio_channels: raw.audio_channels,
            quality_label: raw.format_note,
        }
    }
}

fn has_codec(codec: &Option<String>) -> bool {
    codec.as_deref().is_some_and(|c| c != "none" && !c.is_empty())
}

/// Reconstruct the `family/container; codecs="..."` MIME string from the
/// ext/codec fields yt-dlp exposes
fn mime_type_of(raw: &RawFormat) -> String {
    let has_video = has_codec(&raw.vcodec);
    let has_audio = has_codec(&raw.acodec);

    let family = if has_video {
        "video"
    } else if has_audio {
        "audio"
    } else {
        // No codecs at all (storyboards etc.); must never match "audio"
        "application"
    };
    let container = match raw.ext.as_str() {
        "m4a" | "mp4" => "mp4",
        "mp3" => "mpeg",
        "3gp" => "3gpp",
        other => other,
    };

    let mut codecs = Vec::new();
    if has_video {
        codecs.push(raw.vcodec.clone().unwrap_or_default());
    }
    if has_audio {
        codecs.push(raw.acodec.clone().unwrap_or_default());
    }

    if codecs.is_empty() {
        format!("{family}/{container}")
    } else {
        format!("{family}/{container}; codecs=\"{}\"", codecs.join(", "))
    }
}

/// Find yt-dlp in system PATH, then in common installation paths
fn find_ytdlp() -> Option<PathBuf> {
    if let Ok(path) = which::which("yt-dlp") {
        return Some(path);
    }

    let common_paths = [
        // Homebrew (Apple Silicon / Intel)
        "/opt/homebrew/bin/yt-dlp",
        "/usr/local/bin/yt-dlp",
        // System
        "/usr/bin/yt-dlp",
        // pip user install
        "~/.local/bin/yt-dlp",
    ];

    for path_str in common_paths {
        let expanded = match path_str.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()?.join(rest),
            None => PathBuf::from(path_str),
        };
        if expanded.exists() {
            return Some(expanded);
        }
    }

    None
}
