//! Download orchestration: URL classification and sequential iteration.
//!
//! URLs are processed strictly one at a time, in configuration order, and so
//! are the items within each playlist or channel. Failure isolation is at
//! item granularity: one bad video never aborts its playlist, but fatal
//! conditions (disk errors, missing external tools) abort the whole run.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::app::cancel::CancelToken;
use crate::config::Config;
use crate::download::{
    DownloadError, ItemContext, Transfer, TransferOutcome, download_item, save_thumbnails,
};
use crate::extract::{Extractor, Listing};
use crate::sanitize::sanitize_title;

/// Shared state for one run, built once at startup and threaded through the
/// orchestration instead of living in globals.
pub struct RunContext {
    /// Immutable run configuration.
    pub config: Config,
    /// External extraction boundary.
    pub extractor: Box<dyn Extractor>,
    /// HTTP transfer client, reused across items.
    pub transfer: Transfer,
    /// Process-wide cancellation token.
    pub token: CancelToken,
    /// Whether progress lines should draw.
    pub show_progress: bool,
}

/// Counters for the run summary and exit decision.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Items downloaded to completion.
    pub completed: usize,
    /// Items that failed and were skipped.
    pub failed: usize,
    /// Input URLs that matched no known shape.
    pub skipped_urls: usize,
    /// Whether cancellation stopped the run early.
    pub cancelled: bool,
}

/// What an input URL resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// A single video watch URL.
    Video,
    /// A playlist URL.
    Playlist,
    /// A channel by handle, custom URL, or id.
    Channel,
    /// None of the known shapes; silently skipped.
    Unrecognized,
}

/// Classifies an input URL by substring, in video → playlist → channel
/// order.
#[must_use]
pub fn classify_url(url: &str) -> UrlKind {
    if url.contains("/watch?") {
        UrlKind::Video
    } else if url.contains("playlist") {
        UrlKind::Playlist
    } else if url.contains("/@") || url.contains("/c/") || url.contains("/channel/") {
        UrlKind::Channel
    } else {
        UrlKind::Unrecognized
    }
}

/// Loop control after one item: keep iterating, or stop the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy)]
enum ListingKind {
    Playlist,
    Channel,
}

/// Processes every configured URL in order and returns the run counters.
///
/// # Errors
///
/// Only fatal errors surface here; per-item failures are printed and
/// counted in the returned stats.
#[instrument(skip(ctx), fields(urls = ctx.config.urls.len()))]
pub async fn run(ctx: &RunContext) -> Result<RunStats, DownloadError> {
    let mut stats = RunStats::default();

    for url in &ctx.config.urls {
        if ctx.token.is_cancelled() {
            stats.cancelled = true;
            break;
        }

        println!("Downloading {url}");
        let flow = match classify_url(url) {
            UrlKind::Video => {
                let result = process_video(ctx, url).await;
                note_outcome(result, url, &mut stats)?
            }
            UrlKind::Playlist => {
                process_listing(ctx, url, ListingKind::Playlist, &mut stats).await?
            }
            UrlKind::Channel => process_listing(ctx, url, ListingKind::Channel, &mut stats).await?,
            UrlKind::Unrecognized => {
                debug!(url, "unrecognized URL shape, skipping");
                stats.skipped_urls += 1;
                Flow::Continue
            }
        };

        if flow == Flow::Stop {
            stats.cancelled = true;
            break;
        }
    }

    info!(
        completed = stats.completed,
        failed = stats.failed,
        skipped_urls = stats.skipped_urls,
        cancelled = stats.cancelled,
        "run finished"
    );
    Ok(stats)
}

/// Resolves one video and downloads it per the configured mode, with
/// cancellation checks at each suspension point.
async fn process_video(ctx: &RunContext, url: &str) -> Result<TransferOutcome, DownloadError> {
    let manifest = ctx.extractor.resolve_video(url).await?;
    if ctx.token.is_cancelled() {
        return Ok(TransferOutcome::Cancelled);
    }

    if ctx.config.save_thumbnails
        && save_thumbnails(&ctx.transfer, &manifest, &ctx.token).await?
            == TransferOutcome::Cancelled
    {
        return Ok(TransferOutcome::Cancelled);
    }

    let item_ctx = ItemContext {
        config: &ctx.config,
        transfer: &ctx.transfer,
        token: &ctx.token,
        show_progress: ctx.show_progress,
    };
    download_item(&item_ctx, &manifest).await
}

/// Iterates a playlist or channel listing with per-item failure isolation.
async fn process_listing(
    ctx: &RunContext,
    url: &str,
    kind: ListingKind,
    stats: &mut RunStats,
) -> Result<Flow, DownloadError> {
    let resolved = match kind {
        ListingKind::Playlist => ctx.extractor.resolve_playlist(url).await,
        ListingKind::Channel => ctx.extractor.resolve_channel(url).await,
    };

    let listing: Listing = match resolved {
        Ok(listing) => listing,
        Err(source) => {
            let error = DownloadError::from(source);
            if error.is_fatal() {
                return Err(error);
            }
            report_item_failure(url, &error);
            stats.failed += 1;
            return Ok(Flow::Continue);
        }
    };

    let use_folder = match kind {
        ListingKind::Playlist => {
            println!("Downloading playlist \"{}\"", listing.display_title());
            ctx.config.playlist_folder
        }
        ListingKind::Channel => {
            println!(
                "Downloading all uploads from channel \"{}\"",
                listing.display_title()
            );
            ctx.config.channel_folder
        }
    };

    // The guard restores the previous working directory when it drops,
    // whether the iteration below finishes, fails, or stops on cancel.
    let _guard = if use_folder {
        Some(DirGuard::enter(&sanitize_title(listing.display_title()))?)
    } else {
        None
    };

    for entry in &listing.entries {
        if ctx.token.is_cancelled() {
            return Ok(Flow::Stop);
        }

        let Some(watch_url) = entry.watch_url() else {
            debug!(label = entry.label(), "listing entry without a URL, skipping");
            continue;
        };

        let result = process_video(ctx, &watch_url).await;
        if note_outcome(result, entry.label(), stats)? == Flow::Stop {
            return Ok(Flow::Stop);
        }
    }

    Ok(Flow::Continue)
}

/// Applies the failure-isolation policy to one item's result.
fn note_outcome(
    result: Result<TransferOutcome, DownloadError>,
    label: &str,
    stats: &mut RunStats,
) -> Result<Flow, DownloadError> {
    match result {
        Ok(TransferOutcome::Completed) => {
            stats.completed += 1;
            Ok(Flow::Continue)
        }
        Ok(TransferOutcome::Cancelled) => Ok(Flow::Stop),
        Err(error) if error.is_fatal() => Err(error),
        Err(error) => {
            report_item_failure(label, &error);
            stats.failed += 1;
            Ok(Flow::Continue)
        }
    }
}

fn report_item_failure(label: &str, error: &DownloadError) {
    println!("Failed to download \"{label}\": {error}");
    if let Some(hint) = error.hint() {
        println!("{hint}");
    }
}

/// RAII working-directory change for playlist/channel folders.
struct DirGuard {
    previous: PathBuf,
}

impl DirGuard {
    fn enter(folder: &str) -> Result<Self, DownloadError> {
        let previous = std::env::current_dir()
            .map_err(|source| DownloadError::io(PathBuf::from("."), source))?;
        std::fs::create_dir_all(folder).map_err(|source| DownloadError::io(folder, source))?;
        std::env::set_current_dir(folder).map_err(|source| DownloadError::io(folder, source))?;
        debug!(folder, "entered listing folder");
        Ok(Self { previous })
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.previous);
    }
}
