//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Download YouTube channels, videos, and playlists.
///
/// Positional arguments are video, playlist, or channel URLs; they are
/// processed strictly in the order given. By default each video's best
/// audio-only and video-only streams are downloaded separately and muxed
/// with ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "ytdl")]
#[command(author, version, about)]
pub struct Args {
    /// Video, playlist, or channel URLs to download
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// A path to download videos and their streams to
    #[arg(short = 'o', long = "outpath", value_name = "PATH")]
    pub outpath: Option<PathBuf>,

    /// Download only the audio streams from the given URLs
    #[arg(short = 'a', long = "audio-only")]
    pub audio_only: bool,

    /// Download closed captions if they're available. Uses English by default
    #[arg(long = "closed-captions", alias = "cc")]
    pub closed_captions: bool,

    /// Caption language to download, if it's available. Must be the 2 letter
    /// ISO language code
    #[arg(
        long = "caption-lang",
        alias = "cl",
        value_name = "CODE",
        default_value = "EN"
    )]
    pub caption_lang: String,

    /// Don't download DASH streams. This skips the requirement of ffmpeg,
    /// but limits video quality
    #[arg(short = 'D', long = "no-dash")]
    pub no_dash: bool,

    /// Download playlists to a folder with the name of the playlist
    #[arg(long = "playlist-folders", alias = "pf")]
    pub playlist_folders: bool,

    /// Download channels to a folder with the channel's name
    #[arg(long = "channel-folders", alias = "cf")]
    pub channel_folders: bool,

    /// Download playlists and channels to folders with their names.
    /// Equivalent to setting --channel-folders and --playlist-folders
    #[arg(long = "use-folders", alias = "uf")]
    pub use_folders: bool,

    /// Download the video's thumbnails
    #[arg(long = "save-thumbnails", alias = "st")]
    pub save_thumbnails: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = Args::try_parse_from(["ytdl", "https://youtube.com/watch?v=a"]).unwrap();
        assert_eq!(args.urls.len(), 1);
        assert!(args.outpath.is_none());
        assert!(!args.audio_only);
        assert!(!args.closed_captions);
        assert_eq!(args.caption_lang, "EN");
        assert!(!args.no_dash);
        assert!(!args.playlist_folders);
        assert!(!args.channel_folders);
        assert!(!args.use_folders);
        assert!(!args.save_thumbnails);
        assert!(!args.quiet);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_cli_collects_urls_in_order() {
        let args = Args::try_parse_from(["ytdl", "url1", "url2", "url3"]).unwrap();
        assert_eq!(args.urls, vec!["url1", "url2", "url3"]);
    }

    #[test]
    fn test_cli_outpath_short_and_long() {
        let args = Args::try_parse_from(["ytdl", "-o", "/tmp/videos", "url"]).unwrap();
        assert_eq!(args.outpath, Some(PathBuf::from("/tmp/videos")));

        let args = Args::try_parse_from(["ytdl", "--outpath", "/tmp/videos", "url"]).unwrap();
        assert_eq!(args.outpath, Some(PathBuf::from("/tmp/videos")));
    }

    #[test]
    fn test_cli_audio_only_flag() {
        let args = Args::try_parse_from(["ytdl", "-a", "url"]).unwrap();
        assert!(args.audio_only);
    }

    #[test]
    fn test_cli_caption_flags() {
        let args = Args::try_parse_from(["ytdl", "--cc", "--cl", "DE", "url"]).unwrap();
        assert!(args.closed_captions);
        assert_eq!(args.caption_lang, "DE");

        let args =
            Args::try_parse_from(["ytdl", "--closed-captions", "--caption-lang", "FR", "url"])
                .unwrap();
        assert!(args.closed_captions);
        assert_eq!(args.caption_lang, "FR");
    }

    #[test]
    fn test_cli_no_dash_flag() {
        let args = Args::try_parse_from(["ytdl", "-D", "url"]).unwrap();
        assert!(args.no_dash);
    }

    #[test]
    fn test_cli_folder_flags() {
        let args = Args::try_parse_from(["ytdl", "--pf", "url"]).unwrap();
        assert!(args.playlist_folders);
        assert!(!args.channel_folders);

        let args = Args::try_parse_from(["ytdl", "--cf", "url"]).unwrap();
        assert!(args.channel_folders);
        assert!(!args.playlist_folders);

        let args = Args::try_parse_from(["ytdl", "--use-folders", "url"]).unwrap();
        assert!(args.use_folders);
    }

    #[test]
    fn test_cli_save_thumbnails_flag() {
        let args = Args::try_parse_from(["ytdl", "--st", "url"]).unwrap();
        assert!(args.save_thumbnails);
    }

    #[test]
    fn test_cli_help_flag_is_reported_as_error() {
        // --help short-circuits parsing; the binary remaps it to exit code 1.
        let result = Args::try_parse_from(["ytdl", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_unknown_flag_returns_error() {
        let result = Args::try_parse_from(["ytdl", "--does-not-exist", "url"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_missing_caption_lang_value_returns_error() {
        let result = Args::try_parse_from(["ytdl", "url", "--caption-lang"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_zero_urls_parses() {
        // Zero URLs is a config-level error (with its own message), not a
        // clap-level one.
        let args = Args::try_parse_from(["ytdl"]).unwrap();
        assert!(args.urls.is_empty());
    }

    #[test]
    fn test_cli_verbose_and_quiet() {
        let args = Args::try_parse_from(["ytdl", "-vv", "url"]).unwrap();
        assert_eq!(args.verbose, 2);

        let args = Args::try_parse_from(["ytdl", "-q", "url"]).unwrap();
        assert!(args.quiet);
    }
}
