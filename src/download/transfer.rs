//! Streaming HTTP transfer of resolved stream URLs to disk.
//!
//! Bytes stream into a partial file named `<dest>.stream-<tag>.tmp`; only a
//! completed transfer is renamed to its final name. The cancellation sweep
//! (see [`crate::app::cancel`]) targets exactly that partial naming pattern,
//! so an interrupted run never leaves half-written files masquerading as
//! finished downloads.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::error::DownloadError;
use crate::app::cancel::CancelToken;

/// Connect timeout for stream requests.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Read timeout; stream segments are large, so this is generous.
const READ_TIMEOUT_SECS: u64 = 600;

/// Media CDNs reject unknown clients, so transfers identify as a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// How a transfer ended: normally, or early because cancellation was
/// observed. Cancellation is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// All bytes were written and the output file exists under its final name.
    Completed,
    /// The cancel token fired; a partial `.stream-?.tmp` file may remain for
    /// the sweep to collect.
    Cancelled,
}

/// HTTP transfer client for stream, caption, and thumbnail bytes.
///
/// Created once per run and reused for connection pooling.
#[derive(Debug, Clone)]
pub struct Transfer {
    client: Client,
}

impl Default for Transfer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transfer {
    /// Creates a transfer client with download-appropriate timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with this static
    /// configuration, which does not happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Downloads a stream to `dest`, reporting fractional progress and
    /// observing the cancel token at every chunk boundary.
    ///
    /// On completion the partial file is renamed to `dest`. On cancellation
    /// the partial file is left in place for the sweep.
    ///
    /// # Errors
    ///
    /// [`DownloadError::Http`]/[`DownloadError::Network`] for server and
    /// connection failures (recoverable per item), [`DownloadError::Io`] for
    /// write failures (fatal).
    pub async fn download_stream(
        &self,
        url: &str,
        dest: &Path,
        tag: char,
        progress: &mut (dyn FnMut(f64) + Send),
        token: &CancelToken,
    ) -> Result<TransferOutcome, DownloadError> {
        let temp = partial_path(dest, tag);
        let outcome = self
            .download_to_partial(url, &temp, progress, token)
            .await?;

        if outcome == TransferOutcome::Completed {
            tokio::fs::rename(&temp, dest)
                .await
                .map_err(|source| DownloadError::io(dest, source))?;
            debug!(dest = %dest.display(), "transfer complete");
        }
        Ok(outcome)
    }

    /// Downloads a stream to its partial path and leaves it there, returning
    /// the partial path. Used by the DASH flow, which muxes the audio and
    /// video partials into the final output instead of renaming them.
    pub async fn download_stream_part(
        &self,
        url: &str,
        dest: &Path,
        tag: char,
        progress: &mut (dyn FnMut(f64) + Send),
        token: &CancelToken,
    ) -> Result<(TransferOutcome, PathBuf), DownloadError> {
        let temp = partial_path(dest, tag);
        let outcome = self
            .download_to_partial(url, &temp, progress, token)
            .await?;
        Ok((outcome, temp))
    }

    /// Fetches a small resource (caption track, thumbnail) fully into memory.
    ///
    /// # Errors
    ///
    /// Same network/status mapping as [`download_stream`](Self::download_stream).
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.get_checked(url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| DownloadError::network(url, source))?;
        Ok(bytes.to_vec())
    }

    #[instrument(level = "debug", skip(self, progress, token), fields(url = %url))]
    async fn download_to_partial(
        &self,
        url: &str,
        temp: &Path,
        progress: &mut (dyn FnMut(f64) + Send),
        token: &CancelToken,
    ) -> Result<TransferOutcome, DownloadError> {
        if token.is_cancelled() {
            return Ok(TransferOutcome::Cancelled);
        }

        let response = self.get_checked(url).await?;
        let content_length = response.content_length().filter(|len| *len > 0);

        let file = File::create(temp)
            .await
            .map_err(|source| DownloadError::io(temp, source))?;
        let mut writer = BufWriter::new(file);
        let mut stream = response.bytes_stream();
        let mut bytes_written: u64 = 0;

        while let Some(chunk_result) = stream.next().await {
            if token.is_cancelled() {
                debug!(temp = %temp.display(), "transfer observed cancellation");
                return Ok(TransferOutcome::Cancelled);
            }

            let chunk = chunk_result.map_err(|source| DownloadError::network(url, source))?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|source| DownloadError::io(temp, source))?;
            bytes_written += chunk.len() as u64;

            if let Some(total) = content_length {
                let fraction = (bytes_written as f64 / total as f64).min(1.0);
                progress(fraction);
            }
        }

        writer
            .flush()
            .await
            .map_err(|source| DownloadError::io(temp, source))?;
        progress(1.0);

        debug!(bytes = bytes_written, temp = %temp.display(), "stream body written");
        Ok(TransferOutcome::Completed)
    }

    async fn get_checked(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::InvalidUrl {
            url: url.to_string(),
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DownloadError::network(url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http(url, status.as_u16()));
        }
        Ok(response)
    }
}

/// Partial-download path for a destination: `<dest>.stream-<tag>.tmp`.
///
/// The single-character tag distinguishes the concurrent temp files of one
/// item (`a`udio, `v`ideo, `m`uxed) and keeps the name inside the pattern
/// the cancellation sweep matches.
#[must_use]
pub fn partial_path(dest: &Path, tag: char) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(format!(".stream-{tag}.tmp"));
    PathBuf::from(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_partial_path_matches_sweep_pattern() {
        let partial = partial_path(Path::new("My Video.mp4"), 'a');
        assert_eq!(partial, PathBuf::from("My Video.mp4.stream-a.tmp"));
    }

    #[tokio::test]
    async fn test_download_stream_writes_file_and_removes_partial() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stream"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"stream bytes"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("video.mp4");
        let transfer = Transfer::new();
        let token = CancelToken::new();
        let mut last = 0.0_f64;

        let outcome = transfer
            .download_stream(
                &format!("{}/stream", server.uri()),
                &dest,
                'm',
                &mut |f| last = f,
                &token,
            )
            .await
            .unwrap();

        assert_eq!(outcome, TransferOutcome::Completed);
        assert_eq!(std::fs::read(&dest).unwrap(), b"stream bytes");
        assert!((last - 1.0).abs() < f64::EPSILON);
        assert!(
            !partial_path(&dest, 'm').exists(),
            "partial file should be renamed away on completion"
        );
    }

    #[tokio::test]
    async fn test_download_stream_reports_monotonic_progress() {
        let server = MockServer::start().await;
        let body = vec![7u8; 256 * 1024];
        Mock::given(method("GET"))
            .and(path("/big"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("big.webm");
        let transfer = Transfer::new();
        let token = CancelToken::new();
        let mut reported = Vec::new();

        transfer
            .download_stream(
                &format!("{}/big", server.uri()),
                &dest,
                'a',
                &mut |f| reported.push(f),
                &token,
            )
            .await
            .unwrap();

        assert!(!reported.is_empty());
        assert!(reported.windows(2).all(|w| w[0] <= w[1]));
        assert!(reported.iter().all(|f| (0.0..=1.0).contains(f)));
    }

    #[tokio::test]
    async fn test_download_stream_http_error_maps_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("gone.mp4");
        let transfer = Transfer::new();
        let token = CancelToken::new();

        let result = transfer
            .download_stream(
                &format!("{}/gone", server.uri()),
                &dest,
                'm',
                &mut |_| {},
                &token,
            )
            .await;

        match result {
            Err(DownloadError::Http { status: 403, .. }) => {}
            other => panic!("expected HTTP 403 error, got {other:?}"),
        }
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_download_stream_invalid_url() {
        let dir = TempDir::new().unwrap();
        let transfer = Transfer::new();
        let token = CancelToken::new();

        let result = transfer
            .download_stream(
                "not a url",
                &dir.path().join("x.mp4"),
                'm',
                &mut |_| {},
                &token,
            )
            .await;

        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_short_circuits_before_any_request() {
        // No server: a request would fail, so returning Cancelled proves the
        // token is checked first.
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("never.mp4");
        let transfer = Transfer::new();
        let token = CancelToken::new();
        token.cancel();

        let outcome = transfer
            .download_stream(
                "http://127.0.0.1:9/never",
                &dest,
                'm',
                &mut |_| {},
                &token,
            )
            .await
            .unwrap();

        assert_eq!(outcome, TransferOutcome::Cancelled);
        assert!(!dest.exists());
        assert!(!partial_path(&dest, 'm').exists());
    }

    #[tokio::test]
    async fn test_download_stream_part_keeps_partial_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/part"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"audio part"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("video.mp4");
        let transfer = Transfer::new();
        let token = CancelToken::new();

        let (outcome, part) = transfer
            .download_stream_part(
                &format!("{}/part", server.uri()),
                &dest,
                'a',
                &mut |_| {},
                &token,
            )
            .await
            .unwrap();

        assert_eq!(outcome, TransferOutcome::Completed);
        assert_eq!(part, partial_path(&dest, 'a'));
        assert_eq!(std::fs::read(&part).unwrap(), b"audio part");
        assert!(!dest.exists(), "part download must not create the final file");
    }

    #[tokio::test]
    async fn test_fetch_bytes_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thumb.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg!"))
            .mount(&server)
            .await;

        let transfer = Transfer::new();
        let bytes = transfer
            .fetch_bytes(&format!("{}/thumb.jpg", server.uri()))
            .await
            .unwrap();
        assert_eq!(bytes, b"jpeg!");
    }
}
