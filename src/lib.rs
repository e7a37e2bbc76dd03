//! ytdl core library
//!
//! Orchestration shell for downloading YouTube videos, playlists, and
//! channel uploads. All protocol work — URL resolution, stream manifest
//! retrieval, media muxing — is delegated to external tools (`yt-dlp` and
//! `ffmpeg`); this library owns only the thin layer around them.
//!
//! # Architecture
//!
//! - [`cli`] / [`config`] - argument parsing and validated run configuration
//! - [`extract`] - the external extraction boundary (trait + yt-dlp backend)
//! - [`select`] - stream selection policies over a resolved manifest
//! - [`download`] - sequential transfers, ffmpeg muxing, per-item flow
//! - [`app`] - orchestrator, progress rendering, cancellation handling

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod config;
pub mod download;
pub mod extract;
pub mod sanitize;
pub mod select;
pub mod timefmt;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use app::cancel::{CancelToken, spawn_interrupt_handler, sweep_temp_files};
pub use app::orchestrator::{RunContext, RunStats, UrlKind, classify_url};
pub use app::progress::ProgressRenderer;
pub use cli::Args;
pub use config::{Config, ConfigError};
pub use download::{DownloadError, Transfer, TransferOutcome};
pub use extract::{ExtractError, Extractor, Listing, StreamInfo, VideoManifest, YtDlpExtractor};
pub use sanitize::sanitize_title;
pub use timefmt::format_elapsed;

/// Final process outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    /// Everything fatal-free; per-item failures may still have occurred.
    Success,
    /// Argument error, fatal run error, or cancellation.
    Failure,
}

impl ProcessExit {
    /// The exit code for this outcome.
    #[must_use]
    pub fn code(self) -> std::process::ExitCode {
        match self {
            Self::Success => std::process::ExitCode::SUCCESS,
            Self::Failure => std::process::ExitCode::FAILURE,
        }
    }
}
