//! Shared helpers for unit tests that mutate process-wide state.

#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The process working directory is global; every test that changes or
/// depends on it serializes here.
static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Holds the working-directory lock and restores the previous directory on
/// drop.
pub(crate) struct CwdGuard {
    previous: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl CwdGuard {
    /// Locks and switches the working directory to `dir`.
    pub(crate) fn enter(dir: &Path) -> Self {
        let guard = Self::hold();
        std::env::set_current_dir(dir).unwrap();
        guard
    }

    /// Locks the working directory without changing it, for tests whose
    /// code under test performs the change itself.
    pub(crate) fn hold() -> Self {
        let lock = CWD_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = std::env::current_dir().unwrap();
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.previous);
    }
}
