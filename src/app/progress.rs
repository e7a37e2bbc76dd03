//! In-place progress line for the active download.
//!
//! Downloads are strictly sequential, so exactly one renderer is live at a
//! time. Each item gets its own line: `<title> - <percent>%`, repainted in
//! place, ending as `<title> - Completed.` The line is repainted only when
//! the rounded percent actually changes; fractional progress that regresses
//! slightly (multi-stream merges) repaints by comparison rather than
//! enforcing an increase.

use indicatif::{ProgressBar, ProgressStyle};

/// Renders one item's progress line.
#[derive(Debug)]
pub struct ProgressRenderer {
    bar: ProgressBar,
    last_percent: i64,
    repaints: u64,
}

impl ProgressRenderer {
    /// Starts a progress line for an item. When `enabled` is false (not a
    /// terminal, quiet mode) the renderer goes through the same motions
    /// without drawing.
    #[must_use]
    pub fn begin(title: &str, enabled: bool) -> Self {
        let bar = if enabled {
            ProgressBar::new(100)
        } else {
            ProgressBar::hidden()
        };
        bar.set_length(100);
        bar.set_style(
            ProgressStyle::with_template("{prefix} - {pos}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_prefix(title.to_string());
        Self {
            bar,
            last_percent: -1,
            repaints: 0,
        }
    }

    /// Reports fractional progress in `[0, 1]`. Repaints only when the
    /// rounded percent differs from the last painted value.
    pub fn update(&mut self, fraction: f64) {
        let percent = (fraction.clamp(0.0, 1.0) * 100.0) as i64;
        if percent != self.last_percent {
            self.last_percent = percent;
            self.repaints += 1;
            self.bar.set_position(percent as u64);
        }
    }

    /// Replaces the percentage with `Completed.` and keeps the line.
    pub fn finish(&self) {
        self.bar.set_style(
            ProgressStyle::with_template("{prefix} - {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        self.bar.finish_with_message("Completed.");
    }

    /// Removes the line without a completion marker (failed or cancelled
    /// item; the caller prints its own failure line).
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }

    /// Last painted percent, `-1` before the first repaint.
    #[must_use]
    pub fn last_percent(&self) -> i64 {
        self.last_percent
    }

    /// Number of repaints so far.
    #[must_use]
    pub fn repaint_count(&self) -> u64 {
        self.repaints
    }
}
