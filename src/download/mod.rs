//! Sequential stream downloads: transfer, muxing, and the per-item flow.
//!
//! Transfers stream to `.stream-?.tmp` partials and only rename completed
//! files into place; the DASH path muxes its two partials through an
//! external ffmpeg. Everything observes the process-wide cancel token
//! cooperatively.

mod error;
mod item;
mod muxer;
mod transfer;

pub use error::DownloadError;
pub use item::{ItemContext, download_item, save_thumbnails};
pub use muxer::{FFMPEG_ENV_OVERRIDE, mux_streams};
pub use transfer::{Transfer, TransferOutcome, partial_path};
