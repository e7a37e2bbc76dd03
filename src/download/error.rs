//! Error types for the download module.
//!
//! The taxonomy drives the run-level behavior split: [`DownloadError::is_fatal`]
//! errors abort the whole process, everything else is reported for the
//! failing item and iteration continues with the next one.

use std::path::PathBuf;

use thiserror::Error;

use crate::extract::ExtractError;

/// Errors that can occur while downloading one item.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS, connection refused, TLS, mid-stream drop).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with an error status.
    ///
    /// 403 is the common case on age-restricted videos; it is recoverable
    /// per item and gets a dedicated hint.
    #[error("HTTP {status} fetching {url}")]
    Http {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The stream URL from the manifest is not a valid URL.
    #[error("invalid stream URL: {url}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
    },

    /// Writing to disk failed (disk full, permission denied).
    ///
    /// Fatal: every subsequent item would almost certainly fail the same way.
    #[error("failed to write the video's streams to {}: {source}", path.display())]
    Io {
        /// The path being written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest has no stream matching the selection policy.
    #[error("no {kind} stream available for this video")]
    NoStream {
        /// The stream kind that was requested (`audio-only`, ...).
        kind: &'static str,
    },

    /// No caption track exists for the configured language.
    #[error("no caption track for language {lang}")]
    NoCaptionTrack {
        /// The requested language code.
        lang: String,
    },

    /// ffmpeg is not installed or not on the search path.
    ///
    /// Fatal: the default DASH path can never complete without it.
    #[error(
        "downloading DASH streams requires having ffmpeg installed and available from your system's PATH"
    )]
    MuxerMissing,

    /// ffmpeg ran but failed to mux the downloaded streams.
    #[error("ffmpeg failed: {message}")]
    MuxFailed {
        /// Stderr-derived failure reason.
        message: String,
    },

    /// Resolution through the external extractor failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http(url: impl Into<String>, status: u16) -> Self {
        Self::Http {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error should abort the whole run instead of just the
    /// current item.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::MuxerMissing
                | Self::Extract(ExtractError::ToolNotFound { .. })
        )
    }

    /// Extra user-facing remediation line, when one exists for this error.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Http { status: 403, .. } => {
                Some("403 errors usually happen on age restricted videos.")
            }
            Self::MuxerMissing => Some("Download it here: https://www.ffmpeg.org/"),
            _ => None,
        }
    }
}
