//! Immutable run configuration built from parsed CLI arguments.
//!
//! [`Config::from_args`] performs the startup validation the rest of the run
//! relies on: at least one URL, and — when `--outpath` is given — an existing
//! directory that becomes the process working directory. Everything after
//! this point treats the configuration as read-only.

use std::env;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::cli::Args;

/// Errors raised while turning CLI arguments into a [`Config`].
///
/// All of these are fatal: the process prints the message and exits 1
/// without attempting any work.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No positional URLs were supplied.
    #[error("No URLs provided.")]
    NoUrls,

    /// `--outpath` points at a directory that does not exist.
    #[error("Provided output directory doesn't exist: {}", path.display())]
    MissingOutputDir {
        /// The path that was supplied.
        path: PathBuf,
    },

    /// Changing into the output directory failed.
    #[error("failed to enter output directory {}: {source}", path.display())]
    EnterOutputDir {
        /// The directory that could not be entered.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The current working directory could not be determined.
    #[error("failed to determine the current working directory: {source}")]
    CurrentDir {
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Immutable configuration for one run.
///
/// Built once at startup from [`Args`]; read-only thereafter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root output directory (the working directory after any `--outpath`
    /// change). Playlist/channel folders are created beneath it.
    pub output_dir: PathBuf,
    /// Download only the best audio stream per video.
    pub audio_only: bool,
    /// Also fetch a caption track per video.
    pub get_captions: bool,
    /// Two-letter caption language code.
    pub caption_lang: String,
    /// Restrict selection to pre-muxed streams (no ffmpeg needed).
    pub no_dash: bool,
    /// Download each playlist into a folder named after it.
    pub playlist_folder: bool,
    /// Download each channel into a folder named after it.
    pub channel_folder: bool,
    /// Save every thumbnail variant per video.
    pub save_thumbnails: bool,
    /// URLs to process, in invocation order.
    pub urls: Vec<String>,
}

impl Config {
    /// Validates arguments and builds the run configuration.
    ///
    /// Side effect: when `--outpath` is given and exists, the process working
    /// directory is changed to it, so that all later relative writes (media
    /// files, folders, temp files) land there.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when no URLs were supplied, the outpath does
    /// not exist, or the working directory cannot be changed or read.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        if args.urls.is_empty() {
            return Err(ConfigError::NoUrls);
        }

        if let Some(outpath) = &args.outpath {
            if !outpath.is_dir() {
                return Err(ConfigError::MissingOutputDir {
                    path: outpath.clone(),
                });
            }
            env::set_current_dir(outpath).map_err(|source| ConfigError::EnterOutputDir {
                path: outpath.clone(),
                source,
            })?;
            debug!(outpath = %outpath.display(), "changed working directory");
        }

        let output_dir = env::current_dir().map_err(|source| ConfigError::CurrentDir { source })?;

        Ok(Self {
            output_dir,
            audio_only: args.audio_only,
            get_captions: args.closed_captions,
            caption_lang: args.caption_lang.clone(),
            no_dash: args.no_dash,
            playlist_folder: args.playlist_folders || args.use_folders,
            channel_folder: args.channel_folders || args.use_folders,
            save_thumbnails: args.save_thumbnails,
            urls: args.urls.clone(),
        })
    }
}
