//! Time span extraction and elapsed-time calculation.
//!
//! A span is the `HH:MM ... HH:MM` part of a log line, optionally surrounded
//! by `YYYY-MM-DD` dates:
//!
//! ```text
//! Saturday (2022-01-08) 23:53 → 00:07
//! ```
//!
//! The first two clock times are the start and the end of the task. An end
//! time earlier than the start time means the task finished the next day.

use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Pre-compiled regex for `HH:MM` clock times.
static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d\d):(\d\d)").unwrap());

/// Pre-compiled regex for `YYYY-MM-DD` dates.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());

/// Date format used in log lines and week boundaries.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Clock format used in merged task labels.
pub const CLOCK_FORMAT: &str = "%H:%M";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpanError {
    #[error("time span was not found in: {text}")]
    NotFound { text: String },
    #[error("invalid clock time: {value}")]
    InvalidTime { value: String },
}

/// Time spent on a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSpan {
    /// Wall-clock start time.
    pub start: NaiveTime,
    /// Wall-clock end time.
    pub end: NaiveTime,
    /// Date the task started on, when the line carries one.
    pub date_fr: Option<NaiveDate>,
    /// Date the task ended on, when the line carries one.
    pub date_to: Option<NaiveDate>,
    /// Elapsed time in seconds. Never negative.
    pub seconds: u64,
}

impl TimeSpan {
    /// Whole hours of the elapsed time.
    pub const fn hours(&self) -> u64 {
        self.seconds / 3600
    }

    /// Minutes past the whole hours of the elapsed time.
    pub const fn minutes(&self) -> u64 {
        self.seconds % 3600 / 60
    }

    /// Zero-padded `HH:MM` rendering of the elapsed time.
    pub fn hm(&self) -> String {
        format_hm(self.seconds)
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hm())
    }
}

/// Renders seconds as zero-padded `HH:MM`. Hours are not wrapped at 24.
pub fn format_hm(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 3600, seconds % 3600 / 60)
}

/// Seconds elapsed between two clock times.
///
/// Equal times yield zero. An end before the start is read as the next day.
pub fn elapsed_seconds(start: NaiveTime, end: NaiveTime) -> u64 {
    let diff = end - start;
    if diff.is_zero() {
        return 0;
    }
    let diff = if diff < TimeDelta::zero() {
        diff + TimeDelta::days(1)
    } else {
        diff
    };
    diff.num_seconds().unsigned_abs()
}

/// Parses a single `HH:MM` clock time.
pub fn parse_clock(value: &str) -> Result<NaiveTime, SpanError> {
    NaiveTime::parse_from_str(value, CLOCK_FORMAT).map_err(|_| SpanError::InvalidTime {
        value: value.to_string(),
    })
}

/// Time spent between two `HH:MM` strings, without date information.
pub fn calculate_time_spent(fr: &str, to: &str) -> Result<TimeSpan, SpanError> {
    let start = parse_clock(fr)?;
    let end = parse_clock(to)?;
    Ok(TimeSpan {
        start,
        end,
        date_fr: None,
        date_to: None,
        seconds: elapsed_seconds(start, end),
    })
}

/// Extracts the time span from the span-and-date prefix of a log line.
///
/// Uses the first two `HH:MM` occurrences in order of appearance. Dates are
/// picked up from the first two `YYYY-MM-DD` occurrences, if any.
pub fn time_spent(text: &str) -> Result<TimeSpan, SpanError> {
    let mut clocks = CLOCK_RE.find_iter(text);
    let (Some(fr), Some(to)) = (clocks.next(), clocks.next()) else {
        return Err(SpanError::NotFound {
            text: text.to_string(),
        });
    };

    let mut span = calculate_time_spent(fr.as_str(), to.as_str())?;

    let mut dates = DATE_RE
        .find_iter(text)
        .filter_map(|m| NaiveDate::parse_from_str(m.as_str(), DATE_FORMAT).ok());
    span.date_fr = dates.next();
    span.date_to = dates.next().or_else(|| {
        let rolled_over = span.end < span.start;
        span.date_fr
            .and_then(|d| if rolled_over { d.succ_opt() } else { Some(d) })
    });

    Ok(span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_same_day_span_is_exact_difference() {
        let span = calculate_time_spent("12:01", "14:00").unwrap();
        assert_eq!(span.seconds, 119 * 60);
        assert_eq!(span.hm(), "01:59");
        assert_eq!(span.hours(), 1);
        assert_eq!(span.minutes(), 59);
    }

    #[test]
    fn test_day_rollover() {
        let span = calculate_time_spent("23:53", "00:07").unwrap();
        assert_eq!(span.seconds, 14 * 60);
        assert_eq!(span.hm(), "00:14");
    }

    #[test]
    fn test_equal_times_are_zero() {
        let span = calculate_time_spent("09:00", "09:00").unwrap();
        assert_eq!(span.seconds, 0);
        assert_eq!(span.hm(), "00:00");
    }

    #[test]
    fn test_elapsed_seconds_full_day_minus_one_minute() {
        assert_eq!(elapsed_seconds(hm(0, 1), hm(0, 0)), 24 * 3600 - 60);
    }

    #[test]
    fn test_format_hm_does_not_wrap_hours() {
        assert_eq!(format_hm(0), "00:00");
        assert_eq!(format_hm(59), "00:00");
        assert_eq!(format_hm(3600 * 30 + 60 * 5), "30:05");
    }

    #[test]
    fn test_time_spent_uses_first_two_clocks() {
        let span = time_spent("Saturday (2022-01-08) 12:01 → 14:00 → 18:00").unwrap();
        assert_eq!(span.start, hm(12, 1));
        assert_eq!(span.end, hm(14, 0));
        assert_eq!(span.hm(), "01:59");
    }

    #[test]
    fn test_time_spent_reads_single_date() {
        let span = time_spent("Saturday (2022-01-08) 12:01 → 14:00").unwrap();
        let date = NaiveDate::from_ymd_opt(2022, 1, 8).unwrap();
        assert_eq!(span.date_fr, Some(date));
        assert_eq!(span.date_to, Some(date));
    }

    #[test]
    fn test_time_spent_rollover_advances_end_date() {
        let span = time_spent("Saturday (2022-01-08) 23:53 → 00:07").unwrap();
        assert_eq!(span.date_fr, NaiveDate::from_ymd_opt(2022, 1, 8));
        assert_eq!(span.date_to, NaiveDate::from_ymd_opt(2022, 1, 9));
        assert_eq!(span.hm(), "00:14");
    }

    #[test]
    fn test_time_spent_reads_explicit_end_date() {
        let span = time_spent("2022-01-08 23:00 → 2022-01-09 01:30").unwrap();
        assert_eq!(span.date_to, NaiveDate::from_ymd_opt(2022, 1, 9));
        assert_eq!(span.seconds, 150 * 60);
    }

    #[test]
    fn test_time_spent_without_dates() {
        let span = time_spent("08:15 - 08:45").unwrap();
        assert_eq!(span.date_fr, None);
        assert_eq!(span.date_to, None);
        assert_eq!(span.hm(), "00:30");
    }

    #[test]
    fn test_time_spent_requires_two_clocks() {
        let err = time_spent("Saturday (2022-01-08) 12:01").unwrap_err();
        assert_eq!(
            err,
            SpanError::NotFound {
                text: "Saturday (2022-01-08) 12:01".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_clock_is_rejected() {
        let err = time_spent("25:00 → 26:00").unwrap_err();
        assert!(matches!(err, SpanError::InvalidTime { .. }));
    }
}
