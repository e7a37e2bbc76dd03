//! Wall-clock formatting for the end-of-run summary line.

use std::time::Duration;

/// Formats an elapsed duration as `mm:ss.ff`, switching to `hh:mm:ss.ff`
/// once the run passes the one hour mark.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hundredths = elapsed.subsec_millis() / 10;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours == 0 {
        format!("{minutes:02}:{seconds:02}.{hundredths:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{hundredths:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_elapsed;
    use std::time::Duration;

    #[test]
    fn test_format_elapsed_zero() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00.00");
    }

    #[test]
    fn test_format_elapsed_sub_hour() {
        assert_eq!(format_elapsed(Duration::from_millis(83_450)), "01:23.45");
    }

    #[test]
    fn test_format_elapsed_exact_minute() {
        assert_eq!(format_elapsed(Duration::from_secs(60)), "01:00.00");
    }

    #[test]
    fn test_format_elapsed_switches_to_hours() {
        assert_eq!(format_elapsed(Duration::from_secs(3600)), "01:00:00.00");
        assert_eq!(
            format_elapsed(Duration::from_secs(2 * 3600 + 34 * 60 + 56)),
            "02:34:56.00"
        );
    }

    #[test]
    fn test_format_elapsed_truncates_to_hundredths() {
        assert_eq!(format_elapsed(Duration::from_millis(1_999)), "00:01.99");
    }
}
