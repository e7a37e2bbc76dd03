//! Stream selection policies over a resolved manifest.
//!
//! At most one policy applies per download: highest-bitrate audio for
//! `--audio-only`, highest-resolution pre-muxed stream for `--no-dash`, and
//! the highest audio + highest video pair for the default DASH path.

use crate::extract::StreamInfo;

/// Ordering key for fractional kbps bitrates. Scaling to an integer keeps
/// `max_by_key` total without a float comparator.
fn bitrate_key(stream: &StreamInfo) -> u64 {
    stream
        .audio_bitrate
        .map(|kbps| (kbps * 100.0) as u64)
        .unwrap_or(0)
}

/// Resolution key: height first, width as the tiebreaker.
fn resolution_key(stream: &StreamInfo) -> (u32, u32) {
    (stream.height.unwrap_or(0), stream.width.unwrap_or(0))
}

/// Picks the audio-only stream with the numerically highest bitrate.
#[must_use]
pub fn best_audio(streams: &[StreamInfo]) -> Option<&StreamInfo> {
    streams
        .iter()
        .filter(|s| s.is_downloadable() && s.is_audio_only())
        .max_by_key(|s| bitrate_key(s))
}

/// Picks the video-only stream with the highest resolution.
#[must_use]
pub fn best_video(streams: &[StreamInfo]) -> Option<&StreamInfo> {
    streams
        .iter()
        .filter(|s| s.is_downloadable() && s.is_video_only())
        .max_by_key(|s| resolution_key(s))
}

/// Picks the pre-muxed stream with the highest video quality.
#[must_use]
pub fn best_muxed(streams: &[StreamInfo]) -> Option<&StreamInfo> {
    streams
        .iter()
        .filter(|s| s.is_downloadable() && s.is_muxed())
        .max_by_key(|s| resolution_key(s))
}
