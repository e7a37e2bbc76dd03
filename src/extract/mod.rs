//! External extraction boundary.
//!
//! Everything that touches YouTube's protocol lives behind the [`Extractor`]
//! trait: resolving a watch URL into a [`VideoManifest`] of selectable
//! streams, and expanding playlist/channel URLs into ordered [`Listing`]s.
//! The production implementation is [`YtDlpExtractor`]; tests substitute
//! their own.

mod error;
mod manifest;
mod ytdlp;

use async_trait::async_trait;

pub use error::ExtractError;
pub use manifest::{CaptionTrack, Listing, ListingEntry, StreamInfo, Thumbnail, VideoManifest};
pub use ytdlp::{YTDLP_ENV_OVERRIDE, YtDlpExtractor};

/// Resolves URLs through an external extraction engine.
///
/// Implementations own all protocol details; callers only see resolved
/// manifests and listings.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Resolves a single video URL into its stream manifest.
    async fn resolve_video(&self, url: &str) -> Result<VideoManifest, ExtractError>;

    /// Resolves a playlist URL into its ordered video listing.
    async fn resolve_playlist(&self, url: &str) -> Result<Listing, ExtractError>;

    /// Resolves a channel URL (handle, custom URL, or channel id) into its
    /// ordered uploads listing.
    async fn resolve_channel(&self, url: &str) -> Result<Listing, ExtractError>;
}
