//! External ffmpeg invocation for the DASH download path.
//!
//! The default path downloads the best audio-only and video-only streams
//! separately; ffmpeg stream-copies them into one output container. ffmpeg
//! is the only muxer: nothing here touches container formats directly.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, instrument};

use super::error::DownloadError;

/// Environment variable overriding the muxer binary path.
pub const FFMPEG_ENV_OVERRIDE: &str = "YTDL_FFMPEG";

fn ffmpeg_binary() -> PathBuf {
    env::var_os(FFMPEG_ENV_OVERRIDE)
        .map_or_else(|| PathBuf::from("ffmpeg"), PathBuf::from)
}

/// Muxes a downloaded audio partial and video partial into `dest`.
///
/// Stream-copy only; no transcoding. The input partials are left in place —
/// the caller removes them after a successful mux.
///
/// # Errors
///
/// [`DownloadError::MuxerMissing`] when ffmpeg cannot be found (fatal),
/// [`DownloadError::MuxFailed`] when it exits nonzero (recoverable per item).
#[instrument(level = "debug", skip_all, fields(dest = %dest.display()))]
pub async fn mux_streams(audio: &Path, video: &Path, dest: &Path) -> Result<(), DownloadError> {
    let binary = ffmpeg_binary();
    debug!(binary = %binary.display(), "invoking muxer");

    let output = Command::new(&binary)
        .args(["-y", "-loglevel", "error"])
        .arg("-i")
        .arg(audio)
        .arg("-i")
        .arg(video)
        .args(["-c", "copy"])
        .arg(dest)
        .output()
        .await
        .map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                DownloadError::MuxerMissing
            } else {
                DownloadError::MuxFailed {
                    message: source.to_string(),
                }
            }
        })?;

    if !output.status.success() {
        return Err(DownloadError::MuxFailed {
            message: mux_failure_message(&output.stderr),
        });
    }

    debug!(dest = %dest.display(), "mux complete");
    Ok(())
}

fn mux_failure_message(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "muxer exited with an error".to_string())
}

/// Tests across the download module mutate the muxer env override;
/// they all serialize on this lock.
#[cfg(test)]
pub(crate) static FFMPEG_ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
