//! Data structures for video metadata and stream formats

use serde::{Deserialize, Serialize};

/// Video metadata as resolved by a `VideoSource`
///
/// Immutable once fetched; owned by the caller for the duration of one
/// download operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    #[serde(alias = "webpage_url")]
    pub url: String,
    #[serde(default)]
    pub duration: Option<u64>,
    pub uploader: Option<String>,
    #[serde(default)]
    pub formats: FormatList,
}

/// One selectable stream variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Format {
    /// Numeric stream identifier (0 when the source uses a non-numeric id)
    pub itag: u32,
    /// Container/codec string, e.g. `audio/mp4; codecs="mp4a.40.2"`
    pub mime_type: String,
    /// Language tag of the audio track, absent for untagged tracks
    #[serde(default)]
    pub language: Option<String>,
    /// Average bitrate in kbps; the quality ordering key
    #[serde(default)]
    pub bitrate: u64,
    /// Direct stream URL
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub audio_channels: Option<u32>,
    #[serde(default)]
    pub quality_label: Option<String>,
}

impl Format {
    /// Whether this format carries an audio stream
    pub fn is_audio(&self) -> bool {
        self.mime_type.contains("audio")
    }
}

/// An ordered sequence of formats with non-mutating filter and sort
/// primitives
///
/// Every filter returns a fresh list preserving the relative order of the
/// source; the source list is never modified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatList(pub Vec<Format>);

impl FormatList {
    pub fn new(formats: Vec<Format>) -> Self {
        Self(formats)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Format> {
        self.0.iter()
    }

    /// Retain formats whose MIME type contains `mime_type`
    pub fn with_mime_type(&self, mime_type: &str) -> FormatList {
        self.filter(|f| f.mime_type.contains(mime_type))
    }

    /// Retain audio formats
    pub fn audio(&self) -> FormatList {
        self.filter(Format::is_audio)
    }

    /// Retain formats whose language tag matches `language` exactly
    pub fn with_language(&self, language: &str) -> FormatList {
        self.filter(|f| f.language.as_deref() == Some(language))
    }

    /// Retain formats with the given itag
    pub fn with_itag(&self, itag: u32) -> FormatList {
        self.filter(|f| f.itag == itag)
    }

    /// Fresh list ordered by descending bitrate, ties broken by ascending
    /// itag so the order is total and deterministic
    pub fn sorted_by_quality(&self) -> FormatList {
        let mut formats = self.0.clone();
        formats.sort_by(|a, b| b.bitrate.cmp(&a.bitrate).then(a.itag.cmp(&b.itag)));
        FormatList(formats)
    }

    /// Highest-quality entry under the quality ordering
    pub fn best(&self) -> Option<Format> {
        self.sorted_by_quality().0.into_iter().next()
    }

    fn filter(&self, predicate: impl Fn(&Format) -> bool) -> FormatList {
        FormatList(self.0.iter().filter(|f| predicate(*f)).cloned().collect())
    }
}

impl IntoIterator for FormatList {
    type Item = Format;
    type IntoIter = std::vec::IntoIter<Format>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Vec<Format>> for FormatList {
    fn from(formats: Vec<Format>) -> Self {
        Self(formats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(itag: u32, mime_type: &str, language: Option<&str>, bitrate: u64) -> Format {
        Format {
            itag,
            mime_type: mime_type.to_string(),
            language: language.map(str::to_string),
            bitrate,
            url: format!("https://example.com/stream/{itag}"),
            filesize: None,
            audio_channels: None,
            quality_label: None,
        }
    }

    fn sample_list() -> FormatList {
        FormatList::new(vec![
            format(140, "audio/mp4", Some("en"), 128),
            format(251, "audio/webm", Some("es"), 160),
            format(22, "video/mp4", None, 576),
            format(250, "audio/webm", Some("en"), 70),
        ])
    }

    #[test]
    fn test_mime_filter_is_order_preserving_subsequence() {
        let list = sample_list();
        let filtered = list.with_mime_type("audio/webm");

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|f| f.mime_type.contains("audio/webm")));
        // Same relative order as the source
        assert_eq!(filtered.0[0].itag, 251);
        assert_eq!(filtered.0[1].itag, 250);
        // Source is untouched
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_audio_filter_excludes_video() {
        let audio = sample_list().audio();
        assert_eq!(audio.len(), 3);
        assert!(audio.iter().all(Format::is_audio));
    }

    #[test]
    fn test_language_filter_exact_match() {
        let en = sample_list().with_language("en");
        assert_eq!(en.len(), 2);

        let fr = sample_list().with_language("fr");
        assert!(fr.is_empty());
    }

    #[test]
    fn test_itag_filter() {
        let filtered = sample_list().with_itag(140);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.0[0].itag, 140);
    }

    #[test]
    fn test_sort_is_descending_with_itag_tie_break() {
        let list = FormatList::new(vec![
            format(251, "audio/webm", None, 128),
            format(140, "audio/mp4", None, 128),
            format(250, "audio/webm", None, 70),
        ]);

        let sorted = list.sorted_by_quality();
        let itags: Vec<u32> = sorted.iter().map(|f| f.itag).collect();
        // Equal bitrates fall back to ascending itag
        assert_eq!(itags, vec![140, 251, 250]);
    }

    #[test]
    fn test_best_returns_highest_bitrate() {
        let best = sample_list().best().unwrap();
        assert_eq!(best.itag, 22);
        assert_eq!(best.bitrate, 576);
    }

    #[test]
    fn test_best_on_empty_list() {
        assert!(FormatList::default().best().is_none());
    }
}
