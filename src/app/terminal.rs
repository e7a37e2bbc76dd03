//! Terminal capability checks and tracing setup.

/// `TERM=dumb` terminals cannot reposition the cursor; the progress line is
/// disabled for them.
#[must_use]
pub fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

/// Whether the in-place progress line should draw.
#[must_use]
pub fn should_render_progress(stderr_is_terminal: bool, quiet: bool, dumb_terminal: bool) -> bool {
    stderr_is_terminal && !quiet && !dumb_terminal
}

/// Initializes tracing to stderr with the given default level, overridable
/// through `RUST_LOG`. Logs go to stderr so they never corrupt the progress
/// line or the stdout summary.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::should_render_progress;

    #[test]
    fn test_progress_requires_terminal() {
        assert!(!should_render_progress(false, false, false));
        assert!(should_render_progress(true, false, false));
    }

    #[test]
    fn test_progress_disabled_by_quiet_and_dumb() {
        assert!(!should_render_progress(true, true, false));
        assert!(!should_render_progress(true, false, true));
    }
}
