//! Per-item download flow: stream selection, transfer, and muxing for one
//! resolved video.
//!
//! At most one selection branch applies per item:
//! - `--audio-only`: best audio stream, transferred directly, no muxing.
//! - `--no-dash`: best pre-muxed stream, transferred directly.
//! - default: best audio + best video transferred separately, muxed with
//!   ffmpeg into the video stream's container.
//!
//! Captions (`--closed-captions`) are fetched in addition to the media
//! download, never instead of it.

use std::path::PathBuf;

use tracing::debug;
use url::Url;

use super::error::DownloadError;
use super::muxer::mux_streams;
use super::transfer::{Transfer, TransferOutcome};
use crate::app::cancel::CancelToken;
use crate::app::progress::ProgressRenderer;
use crate::config::Config;
use crate::extract::{Thumbnail, VideoManifest};
use crate::sanitize::sanitize_title;
use crate::select;

/// Shared dependencies for item downloads, threaded explicitly instead of
/// living in globals.
pub struct ItemContext<'a> {
    /// Run configuration.
    pub config: &'a Config,
    /// HTTP transfer client.
    pub transfer: &'a Transfer,
    /// Process-wide cancellation token.
    pub token: &'a CancelToken,
    /// Whether progress lines should draw.
    pub show_progress: bool,
}

/// Downloads one resolved video according to the configured mode.
///
/// # Errors
///
/// Selection, network, IO, and muxer errors per the taxonomy in
/// [`DownloadError`]; cancellation is a benign [`TransferOutcome::Cancelled`].
pub async fn download_item(
    ctx: &ItemContext<'_>,
    manifest: &VideoManifest,
) -> Result<TransferOutcome, DownloadError> {
    let title = sanitize_title(&manifest.title);

    if ctx.config.audio_only {
        let stream = select::best_audio(&manifest.streams).ok_or(DownloadError::NoStream {
            kind: "audio-only",
        })?;
        let url = stream.url.clone().ok_or(DownloadError::NoStream {
            kind: "audio-only",
        })?;
        let dest = PathBuf::from(format!("{title}.{}", stream.container));
        return transfer_single(ctx, &manifest.title, &url, &dest, 'a').await;
    }

    if ctx.config.get_captions {
        match download_captions(ctx, manifest, &title).await {
            Ok(TransferOutcome::Cancelled) => return Ok(TransferOutcome::Cancelled),
            Ok(TransferOutcome::Completed) => {}
            Err(DownloadError::NoCaptionTrack { lang }) => {
                println!("No {lang} captions available for \"{}\".", manifest.title);
            }
            Err(other) => return Err(other),
        }
    }

    if ctx.config.no_dash {
        let stream = select::best_muxed(&manifest.streams).ok_or(DownloadError::NoStream {
            kind: "pre-muxed",
        })?;
        let url = stream.url.clone().ok_or(DownloadError::NoStream {
            kind: "pre-muxed",
        })?;
        let dest = PathBuf::from(format!("{title}.{}", stream.container));
        return transfer_single(ctx, &manifest.title, &url, &dest, 'm').await;
    }

    download_dash(ctx, manifest, &title).await
}

/// Fetches and writes every thumbnail variant of a video.
///
/// Files are named `<title>-<WxH>.<ext>` (index when dimensions are
/// unknown) so variants never collide.
///
/// # Errors
///
/// Network errors for the fetch, IO errors for the write.
pub async fn save_thumbnails(
    transfer: &Transfer,
    manifest: &VideoManifest,
    token: &CancelToken,
) -> Result<TransferOutcome, DownloadError> {
    if manifest.thumbnails.is_empty() {
        return Ok(TransferOutcome::Completed);
    }

    println!("Downloading all thumbnails for video {}", manifest.title);
    let title = sanitize_title(&manifest.title);

    for (index, thumbnail) in manifest.thumbnails.iter().enumerate() {
        if token.is_cancelled() {
            return Ok(TransferOutcome::Cancelled);
        }
        let bytes = transfer.fetch_bytes(&thumbnail.url).await?;
        let path = PathBuf::from(thumbnail_filename(&title, thumbnail, index));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| DownloadError::io(path, source))?;
    }

    debug!(count = manifest.thumbnails.len(), "thumbnails saved");
    Ok(TransferOutcome::Completed)
}

/// Single-stream transfer (audio-only and no-DASH paths) with a progress
/// line.
async fn transfer_single(
    ctx: &ItemContext<'_>,
    display_title: &str,
    url: &str,
    dest: &std::path::Path,
    tag: char,
) -> Result<TransferOutcome, DownloadError> {
    let mut renderer = ProgressRenderer::begin(display_title, ctx.show_progress);
    let result = ctx
        .transfer
        .download_stream(url, dest, tag, &mut |f| renderer.update(f), ctx.token)
        .await;
    conclude(&renderer, &result);
    result
}

/// Default path: separate audio and video transfers, then an external mux.
async fn download_dash(
    ctx: &ItemContext<'_>,
    manifest: &VideoManifest,
    title: &str,
) -> Result<TransferOutcome, DownloadError> {
    let audio = select::best_audio(&manifest.streams).ok_or(DownloadError::NoStream {
        kind: "audio-only",
    })?;
    let video = select::best_video(&manifest.streams).ok_or(DownloadError::NoStream {
        kind: "video-only",
    })?;
    let audio_url = audio.url.clone().ok_or(DownloadError::NoStream {
        kind: "audio-only",
    })?;
    let video_url = video.url.clone().ok_or(DownloadError::NoStream {
        kind: "video-only",
    })?;
    let dest = PathBuf::from(format!("{title}.{}", video.container));

    let mut renderer = ProgressRenderer::begin(&manifest.title, ctx.show_progress);
    let result = dash_transfers(ctx, &mut renderer, &audio_url, &video_url, &dest).await;
    conclude(&renderer, &result);
    result
}

async fn dash_transfers(
    ctx: &ItemContext<'_>,
    renderer: &mut ProgressRenderer,
    audio_url: &str,
    video_url: &str,
    dest: &std::path::Path,
) -> Result<TransferOutcome, DownloadError> {
    // Audio fills [0, 0.5), video [0.5, 0.95), the mux completes to 100%.
    let (outcome, audio_part) = ctx
        .transfer
        .download_stream_part(audio_url, dest, 'a', &mut |f| renderer.update(f * 0.5), ctx.token)
        .await?;
    if outcome == TransferOutcome::Cancelled {
        return Ok(TransferOutcome::Cancelled);
    }

    let (outcome, video_part) = ctx
        .transfer
        .download_stream_part(
            video_url,
            dest,
            'v',
            &mut |f| renderer.update(0.5 + f * 0.45),
            ctx.token,
        )
        .await?;
    if outcome == TransferOutcome::Cancelled {
        return Ok(TransferOutcome::Cancelled);
    }

    if ctx.token.is_cancelled() {
        return Ok(TransferOutcome::Cancelled);
    }

    mux_streams(&audio_part, &video_part, dest).await?;
    renderer.update(1.0);

    let _ = tokio::fs::remove_file(&audio_part).await;
    let _ = tokio::fs::remove_file(&video_part).await;
    Ok(TransferOutcome::Completed)
}

/// Fetches the caption track for the configured language and writes it as
/// `<title>-<LANG>.srt`.
async fn download_captions(
    ctx: &ItemContext<'_>,
    manifest: &VideoManifest,
    title: &str,
) -> Result<TransferOutcome, DownloadError> {
    let lang = &ctx.config.caption_lang;
    let track = manifest
        .caption_track(lang)
        .ok_or_else(|| DownloadError::NoCaptionTrack { lang: lang.clone() })?;

    if ctx.token.is_cancelled() {
        return Ok(TransferOutcome::Cancelled);
    }

    let bytes = ctx.transfer.fetch_bytes(&track.url).await?;
    let path = PathBuf::from(format!("{title}-{lang}.srt"));
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|source| DownloadError::io(path, source))?;

    println!("Captions for {} ({lang}) - Completed.", manifest.title);
    Ok(TransferOutcome::Completed)
}

fn conclude(renderer: &ProgressRenderer, result: &Result<TransferOutcome, DownloadError>) {
    match result {
        Ok(TransferOutcome::Completed) => renderer.finish(),
        Ok(TransferOutcome::Cancelled) | Err(_) => renderer.clear(),
    }
}

/// Non-colliding thumbnail filename: dimensions when known, index otherwise.
fn thumbnail_filename(title: &str, thumbnail: &Thumbnail, index: usize) -> String {
    let variant = match (thumbnail.width, thumbnail.height) {
        (Some(width), Some(height)) => format!("{width}x{height}"),
        _ => index.to_string(),
    };
    let ext = thumbnail_extension(&thumbnail.url);
    format!("{title}-{variant}.{ext}")
}

/// Image extension from the thumbnail URL path, defaulting to `jpg`.
fn thumbnail_extension(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .and_then(|last| last.rsplit_once('.').map(|(_, ext)| ext.to_string()))
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 4 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| "jpg".to_string())
}
