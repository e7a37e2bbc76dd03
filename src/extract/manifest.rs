//! Data model for resolved stream manifests and playlist/channel listings.
//!
//! These types mirror the JSON the extractor emits. The convention for
//! stream kinds follows the extractor's codec fields: a stream with
//! `acodec: "none"` carries no audio, one with `vcodec: "none"` carries no
//! video, and a stream with both codecs present is pre-muxed.

use std::collections::HashMap;

use serde::Deserialize;

/// One downloadable stream from a resolved manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamInfo {
    /// Extractor-assigned format identifier.
    #[serde(rename = "format_id", default)]
    pub id: String,
    /// Direct media URL. Absent for DRM-gated or storyboard entries.
    #[serde(default)]
    pub url: Option<String>,
    /// Container extension (`mp4`, `webm`, `m4a`, ...).
    #[serde(rename = "ext", default)]
    pub container: String,
    /// Audio codec, or `"none"` for video-only streams.
    #[serde(default)]
    pub acodec: Option<String>,
    /// Video codec, or `"none"` for audio-only streams.
    #[serde(default)]
    pub vcodec: Option<String>,
    /// Average audio bitrate in kbps.
    #[serde(rename = "abr", default)]
    pub audio_bitrate: Option<f64>,
    /// Video height in pixels.
    #[serde(default)]
    pub height: Option<u32>,
    /// Video width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    /// Exact size in bytes when the extractor knows it.
    #[serde(default)]
    pub filesize: Option<u64>,
}

impl StreamInfo {
    fn has_audio(&self) -> bool {
        self.acodec.as_deref().is_some_and(|c| c != "none" && !c.is_empty())
    }

    fn has_video(&self) -> bool {
        self.vcodec.as_deref().is_some_and(|c| c != "none" && !c.is_empty())
    }

    /// Audio track only, no video.
    #[must_use]
    pub fn is_audio_only(&self) -> bool {
        self.has_audio() && !self.has_video()
    }

    /// Video track only, no audio.
    #[must_use]
    pub fn is_video_only(&self) -> bool {
        self.has_video() && !self.has_audio()
    }

    /// Pre-muxed: carries both audio and video.
    #[must_use]
    pub fn is_muxed(&self) -> bool {
        self.has_audio() && self.has_video()
    }

    /// Whether this entry can actually be transferred. Storyboard and
    /// DRM-gated entries have no usable URL and are never selected.
    #[must_use]
    pub fn is_downloadable(&self) -> bool {
        self.url.is_some() && self.container != "mhtml"
    }
}

/// One thumbnail variant attached to a video.
#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    /// Image URL.
    pub url: String,
    /// Width in pixels when known.
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels when known.
    #[serde(default)]
    pub height: Option<u32>,
}

/// One caption track variant (same language, different serialization).
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionTrack {
    /// Track URL.
    pub url: String,
    /// Serialization format (`srt`, `vtt`, `json3`, ...).
    #[serde(default)]
    pub ext: Option<String>,
}

/// A fully resolved video: identity plus everything selectable from it.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoManifest {
    /// Video identifier.
    #[serde(default)]
    pub id: String,
    /// Human title, unsanitized.
    pub title: String,
    /// Canonical watch URL when the extractor reports one.
    #[serde(default)]
    pub webpage_url: Option<String>,
    /// All streams the extractor resolved.
    #[serde(rename = "formats", default)]
    pub streams: Vec<StreamInfo>,
    /// Thumbnail variants, smallest first as emitted by the extractor.
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    /// Caption tracks keyed by language code.
    #[serde(default)]
    pub subtitles: HashMap<String, Vec<CaptionTrack>>,
}

impl VideoManifest {
    /// Finds the caption track for a language code, case-insensitively.
    ///
    /// Among the variants for that language, `srt` is preferred, then `vtt`,
    /// then whatever comes first.
    #[must_use]
    pub fn caption_track(&self, lang: &str) -> Option<&CaptionTrack> {
        let tracks = self
            .subtitles
            .iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(lang))
            .map(|(_, tracks)| tracks)?;

        for preferred in ["srt", "vtt"] {
            if let Some(track) = tracks.iter().find(|t| t.ext.as_deref() == Some(preferred)) {
                return Some(track);
            }
        }
        tracks.first()
    }
}

/// One entry of a playlist or channel listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingEntry {
    /// Video identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Watch URL when the extractor emits one directly.
    #[serde(default)]
    pub url: Option<String>,
    /// Entry title; listings sometimes omit it for unavailable videos.
    #[serde(default)]
    pub title: Option<String>,
}

impl ListingEntry {
    /// The URL to resolve this entry's manifest from, reconstructed from the
    /// video id when the listing carries no direct URL.
    #[must_use]
    pub fn watch_url(&self) -> Option<String> {
        if let Some(url) = &self.url {
            return Some(url.clone());
        }
        self.id
            .as_ref()
            .map(|id| format!("https://www.youtube.com/watch?v={id}"))
    }

    /// Best label for progress and failure lines.
    #[must_use]
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.url.as_deref())
            .or(self.id.as_deref())
            .unwrap_or("<unknown video>")
    }
}

/// A resolved playlist or channel-uploads listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    /// Playlist title or channel name.
    #[serde(default)]
    pub title: Option<String>,
    /// Entries in the order the extractor yields them.
    #[serde(default)]
    pub entries: Vec<ListingEntry>,
}

impl Listing {
    /// Title for banners and folder names.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("<untitled>")
    }
}
