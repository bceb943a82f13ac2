//! Display formatting helpers
//!
//! Countdown clocks, human-readable durations and score lines shared by
//! both front ends.

use crate::models::ScoreResult;
use std::time::Duration;

/// Format seconds as a `MM:SS` clock
///
/// Minutes are not wrapped into hours.
///
/// # Examples
/// ```
/// use quizterm::util::format::format_clock;
///
/// assert_eq!(format_clock(1200), "20:00");
/// assert_eq!(format_clock(65), "01:05");
/// assert_eq!(format_clock(0), "00:00");
/// ```
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Format seconds as a human-readable duration
///
/// # Examples
/// ```
/// use quizterm::util::format::format_remaining;
///
/// assert_eq!(format_remaining(1199), "19m 59s");
/// assert_eq!(format_remaining(0), "0s");
/// ```
pub fn format_remaining(secs: u32) -> String {
    humantime::format_duration(Duration::from_secs(secs as u64)).to_string()
}

/// Parse a time limit such as `20m` or `1m 30s`
pub fn parse_time_limit(input: &str) -> Result<Duration, String> {
    humantime::parse_duration(input.trim())
        .map_err(|e| format!("Invalid time limit '{}': {}", input, e))
}

/// Format a score as `correct / total (pct%)`
///
/// # Examples
/// ```
/// use quizterm::models::ScoreResult;
/// use quizterm::util::format::format_score;
///
/// assert_eq!(format_score(&ScoreResult { correct: 7, total: 10 }), "7 / 10 (70%)");
/// ```
pub fn format_score(result: &ScoreResult) -> String {
    format!(
        "{} / {} ({:.0}%)",
        result.correct,
        result.total,
        result.percentage()
    )
}

/// Style of the countdown depending on how much time is left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Relaxed,
    Hurry,
    Critical,
}

impl Urgency {
    /// Classify `remaining` out of `limit` seconds
    pub fn classify(remaining: u32, limit: u32) -> Self {
        if remaining <= 30 || remaining * 10 <= limit {
            Urgency::Critical
        } else if remaining * 4 <= limit {
            Urgency::Hurry
        } else {
            Urgency::Relaxed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(1200), "20:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(6000), "100:00");
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(90), "1m 30s");
        assert_eq!(format_remaining(3600), "1h");
    }

    #[test]
    fn test_parse_time_limit() {
        assert_eq!(parse_time_limit("20m").unwrap(), Duration::from_secs(1200));
        assert_eq!(parse_time_limit(" 1m 30s ").unwrap(), Duration::from_secs(90));
        assert!(parse_time_limit("soon").is_err());
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(&ScoreResult { correct: 0, total: 0 }), "0 / 0 (0%)");
        assert_eq!(format_score(&ScoreResult { correct: 2, total: 3 }), "2 / 3 (67%)");
    }

    #[test]
    fn test_urgency() {
        assert_eq!(Urgency::classify(1200, 1200), Urgency::Relaxed);
        assert_eq!(Urgency::classify(300, 1200), Urgency::Hurry);
        assert_eq!(Urgency::classify(120, 1200), Urgency::Critical);
        assert_eq!(Urgency::classify(25, 60), Urgency::Critical);
    }
}
