//! Format selection over a video's advertised streams
//!
//! Selection is a filter chain over the full format list followed by the
//! deterministic quality sort from [`FormatList`]. There is never a fallback
//! to non-audio formats: an empty result after filtering is an error.

use crate::extractor::models::{Format, FormatList};
use crate::utils::error::AudioloadError;
use tracing::debug;

/// Pick the best audio format, optionally constrained by MIME type and
/// track language
///
/// The MIME filter uses "contains" semantics (`"mp4"` matches
/// `audio/mp4; codecs="mp4a.40.2"`); the language filter is an exact match
/// on the track's language tag. Given identical inputs the chosen format is
/// always the same.
pub fn select_audio_format(
    formats: &FormatList,
    mimetype: Option<&str>,
    language: Option<&str>,
) -> Result<Format, AudioloadError> {
    let mut candidates = match mimetype {
        Some(mime) => formats.with_mime_type(mime),
        None => formats.clone(),
    };

    candidates = candidates.audio();

    if let Some(lang) = language {
        candidates = candidates.with_language(lang);
    }

    debug!(
        total = formats.len(),
        surviving = candidates.len(),
        ?mimetype,
        ?language,
        "filtered audio formats"
    );

    candidates
        .best()
        .ok_or_else(|| AudioloadError::NoAudioFormat {
            mimetype: mimetype.map(str::to_string),
            language: language.map(str::to_string),
        })
}

/// Pick a format by a caller-supplied quality label
///
/// A non-empty label that parses as a positive itag restricts the list to
/// that stream; an empty result is an error. Any other label leaves the
/// list unfiltered, so the best overall format wins.
pub fn select_format_by_label(
    formats: &FormatList,
    label: &str,
) -> Result<Format, AudioloadError> {
    let candidates = match label.parse::<u32>() {
        Ok(itag) if itag > 0 => {
            debug!(itag, "filtering formats by itag");
            formats.with_itag(itag)
        }
        _ => formats.clone(),
    };

    candidates
        .best()
        .ok_or_else(|| AudioloadError::FormatNotFound(label.to_string()))
}
