//! Process-wide cancellation: interrupt handling and partial-file cleanup.
//!
//! The cancel token is the one piece of legitimately global state here —
//! OS-level interrupt delivery is process-wide by nature. It is one-way:
//! once cancelled it never resets. Transfers observe it cooperatively at
//! their suspension points; the interrupt handler additionally sweeps
//! `*.stream-?.tmp` partials from the working directory and exits 1.

use std::path::Path;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};

use regex::Regex;
use tracing::{debug, warn};

/// Partial-download files end in `.stream-` + one optional character +
/// `.tmp`; the sweep targets exactly this shape and nothing else.
#[allow(clippy::expect_used)]
static PARTIAL_STREAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.stream-.?\.tmp$").expect("static pattern is valid"));

/// One-way cancellation token shared between the interrupt handler and
/// every transfer.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates an unsignaled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation. Idempotent; there is no way back.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been signaled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Installs the Ctrl-C handler.
///
/// On interrupt it prints a cancel notice, signals the token, sweeps
/// temporary partial files from the current working directory, and
/// terminates the process with exit code 1. The sweep races any in-flight
/// write by design — cleanup is best-effort, not transactional.
pub fn spawn_interrupt_handler(token: CancelToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("failed to install interrupt handler; Ctrl-C will not clean up");
            return;
        }
        println!("\nCanceling downloads...");
        token.cancel();
        println!("Deleting temporary files...");
        if let Ok(dir) = std::env::current_dir() {
            let removed = sweep_temp_files(&dir);
            debug!(removed, "temporary partial files deleted");
        }
        std::process::exit(1);
    })
}

/// Whether a filename is a transfer partial the sweep should delete.
#[must_use]
pub fn is_partial_stream_file(name: &str) -> bool {
    PARTIAL_STREAM_RE.is_match(name)
}

/// Deletes partial-download files from `dir`, non-recursively.
///
/// Best-effort: unreadable entries and failed deletes are skipped. Returns
/// the number of files actually removed.
pub fn sweep_temp_files(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };

    entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_file()))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(is_partial_stream_file)
        })
        .filter(|entry| std::fs::remove_file(entry.path()).is_ok())
        .count()
}
