//! Error types for the extraction boundary.

use std::io;

use thiserror::Error;

/// Errors raised while resolving videos, playlists, or channels through the
/// external extractor.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The extractor binary is not installed or not on the search path.
    ///
    /// Fatal: without the extractor no URL can ever resolve.
    #[error(
        "{binary} not found. Install yt-dlp and make sure it's available from your system's PATH: https://github.com/yt-dlp/yt-dlp"
    )]
    ToolNotFound {
        /// The binary that could not be launched.
        binary: String,
    },

    /// The extractor process could not be spawned for a reason other than
    /// a missing binary.
    #[error("failed to run {binary}: {source}")]
    Spawn {
        /// The binary that failed to launch.
        binary: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The extractor ran but reported a resolution failure for this URL.
    #[error("failed to resolve {url}: {message}")]
    Resolution {
        /// The URL that failed to resolve.
        url: String,
        /// Extractor-reported reason, last stderr line.
        message: String,
    },

    /// The extractor produced JSON this tool could not interpret.
    #[error("unexpected metadata for {url}: {source}")]
    Metadata {
        /// The URL whose metadata failed to parse.
        url: String,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::ExtractError;

    #[test]
    fn test_tool_not_found_names_binary_and_remediation() {
        let error = ExtractError::ToolNotFound {
            binary: "yt-dlp".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("yt-dlp"), "expected binary name in: {msg}");
        assert!(msg.contains("PATH"), "expected remediation in: {msg}");
    }

    #[test]
    fn test_resolution_error_carries_url_and_message() {
        let error = ExtractError::Resolution {
            url: "https://youtube.com/watch?v=x".to_string(),
            message: "Video unavailable".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("watch?v=x"), "expected URL in: {msg}");
        assert!(msg.contains("Video unavailable"), "expected reason in: {msg}");
    }
}
