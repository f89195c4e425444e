//! Audioload - audio stream downloader
//!
//! Resolves a video's available formats through yt-dlp, picks the best
//! matching audio stream, and streams it to disk.

use anyhow::Result;
use audioload::downloader::{build_http_client, AudioDownloader};
use audioload::extractor::{select_audio_format, select_format_by_label, YtDlpSource};
use audioload::utils::DownloadSettings;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "audioload", about = "Download the audio track of a video")]
struct Args {
    /// Video ID or watch URL
    video: String,

    /// Output file path (default: <output dir>/<id>.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for default output paths
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Keep only formats whose MIME type contains this string (e.g. "mp4")
    #[arg(long)]
    mime_type: Option<String>,

    /// Keep only audio tracks with this language tag (e.g. "en")
    #[arg(long)]
    language: Option<String>,

    /// Select a specific format by label; a numeric label picks that itag
    #[arg(long)]
    format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();

    let settings = match args.output_dir {
        Some(dir) => DownloadSettings::new(dir),
        None => DownloadSettings::default(),
    };

    let client = build_http_client();
    let source = Arc::new(YtDlpSource::new(client.clone())?);
    let downloader = AudioDownloader::new(settings, client, source);

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, canceling download");
            cancel_on_signal.cancel();
        }
    });

    let video = downloader.fetch_metadata(&args.video).await?;

    let format = match &args.format {
        Some(label) => select_format_by_label(&video.formats, label)?,
        None => select_audio_format(
            &video.formats,
            args.mime_type.as_deref(),
            args.language.as_deref(),
        )?,
    };

    let output_path = args
        .output
        .unwrap_or_else(|| downloader.default_output_path(&video, &format));

    downloader
        .download_format(cancel, &output_path, &video, &format)
        .await?;

    println!("Saved {} to {}", video.title, output_path.display());
    Ok(())
}
