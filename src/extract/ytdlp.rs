//! yt-dlp backed extractor.
//!
//! All protocol work — URL resolution, manifest retrieval, signature
//! handling — is delegated to an external `yt-dlp` binary. This module only
//! launches it and deserializes its JSON output; no YouTube wire format is
//! parsed here.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::error::ExtractError;
use super::manifest::{Listing, VideoManifest};
use super::Extractor;

/// Environment variable overriding the extractor binary path.
pub const YTDLP_ENV_OVERRIDE: &str = "YTDL_YTDLP";

/// Well-known install locations probed before falling back to PATH lookup.
const COMMON_PATHS: &[&str] = &[
    "/opt/homebrew/bin/yt-dlp",
    "/usr/local/bin/yt-dlp",
    "/usr/bin/yt-dlp",
];

/// Extractor implementation that shells out to `yt-dlp`.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    binary: PathBuf,
}

impl YtDlpExtractor {
    /// Locates the extractor binary: `YTDL_YTDLP` override first, then
    /// common install paths, then a bare name resolved through PATH.
    #[must_use]
    pub fn discover() -> Self {
        Self {
            binary: find_binary(),
        }
    }

    /// Uses an explicit binary path, bypassing discovery.
    #[must_use]
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The binary this extractor will invoke.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Runs the extractor in single-JSON dump mode and returns raw stdout.
    ///
    /// `flat` requests listing-only resolution (playlist/channel entries
    /// without per-video manifests).
    async fn dump_json(&self, url: &str, flat: bool) -> Result<Vec<u8>, ExtractError> {
        let mut command = Command::new(&self.binary);
        command.arg("--dump-single-json").arg("--no-warnings");
        if flat {
            command.arg("--flat-playlist");
        }
        command.arg(url);

        debug!(binary = %self.binary.display(), url, flat, "invoking extractor");

        let output = command.output().await.map_err(|source| {
            let binary = self.binary.display().to_string();
            if source.kind() == io::ErrorKind::NotFound {
                ExtractError::ToolNotFound { binary }
            } else {
                ExtractError::Spawn { binary, source }
            }
        })?;

        if !output.status.success() {
            return Err(ExtractError::Resolution {
                url: url.to_string(),
                message: failure_message(&output.stderr),
            });
        }

        Ok(output.stdout)
    }

    async fn resolve_listing(&self, url: &str) -> Result<Listing, ExtractError> {
        let raw = self.dump_json(url, true).await?;
        serde_json::from_slice(&raw).map_err(|source| ExtractError::Metadata {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    #[instrument(level = "debug", skip(self))]
    async fn resolve_video(&self, url: &str) -> Result<VideoManifest, ExtractError> {
        let raw = self.dump_json(url, false).await?;
        serde_json::from_slice(&raw).map_err(|source| ExtractError::Metadata {
            url: url.to_string(),
            source,
        })
    }

    #[instrument(level = "debug", skip(self))]
    async fn resolve_playlist(&self, url: &str) -> Result<Listing, ExtractError> {
        self.resolve_listing(url).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn resolve_channel(&self, url: &str) -> Result<Listing, ExtractError> {
        // Handles, /c/ custom URLs, and /channel/ ids all resolve through the
        // same flat-listing call; the extractor normalizes them itself.
        self.resolve_listing(url).await
    }
}

fn find_binary() -> PathBuf {
    if let Some(overridden) = env::var_os(YTDLP_ENV_OVERRIDE) {
        return PathBuf::from(overridden);
    }
    for candidate in COMMON_PATHS {
        if Path::new(candidate).exists() {
            return PathBuf::from(candidate);
        }
    }
    PathBuf::from("yt-dlp")
}

/// Distills an extractor stderr dump into a one-line failure reason.
fn failure_message(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.strip_prefix("ERROR: ").unwrap_or(line).to_string())
        .unwrap_or_else(|| "extractor exited with an error".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_takes_last_nonempty_line() {
        let stderr = b"WARNING: something minor\nERROR: Video unavailable\n\n";
        assert_eq!(failure_message(stderr), "Video unavailable");
    }

    #[test]
    fn test_failure_message_handles_empty_stderr() {
        assert_eq!(failure_message(b""), "extractor exited with an error");
    }

    #[test]
    fn test_with_binary_keeps_explicit_path() {
        let extractor = YtDlpExtractor::with_binary("/opt/tools/yt-dlp");
        assert_eq!(extractor.binary(), Path::new("/opt/tools/yt-dlp"));
    }

    #[tokio::test]
    async fn test_missing_binary_maps_to_tool_not_found() {
        let extractor = YtDlpExtractor::with_binary("/nonexistent/ytdl-test-binary");
        let result = extractor.resolve_video("https://youtube.com/watch?v=x").await;
        assert!(matches!(result, Err(ExtractError::ToolNotFound { .. })));
    }

    #[tokio::test]
    async fn test_failing_binary_maps_to_resolution_error() {
        // `false` exists everywhere, runs, and exits nonzero with no output.
        let extractor = YtDlpExtractor::with_binary("false");
        let result = extractor.resolve_video("https://youtube.com/watch?v=x").await;
        match result {
            Err(ExtractError::Resolution { url, .. }) => {
                assert_eq!(url, "https://youtube.com/watch?v=x");
            }
            other => panic!("expected Resolution error, got {other:?}"),
        }
    }
}
