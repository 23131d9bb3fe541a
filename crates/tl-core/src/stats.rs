//! Duration statistics over parsed tasks.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::span::format_hm;
use crate::task::Task;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    #[error("statistics requested over zero tasks")]
    EmptyInput,
}

/// Duration statistics in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub avg: u64,
    pub max: u64,
    pub min: u64,
    pub sum: u64,
    pub count: usize,
}

/// [`Stats`] with durations rendered as `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HumanStats {
    pub avg: String,
    pub max: String,
    pub min: String,
    pub sum: String,
    pub count: usize,
}

/// Computes statistics over task durations. Fails on an empty slice.
pub fn stats(tasks: &[Task]) -> Result<Stats, StatsError> {
    let first = tasks.first().ok_or(StatsError::EmptyInput)?;

    let mut sum = 0;
    let mut max = first.duration.seconds;
    let mut min = first.duration.seconds;
    for task in tasks {
        let seconds = task.duration.seconds;
        sum += seconds;
        max = max.max(seconds);
        min = min.min(seconds);
    }

    let count = tasks.len();
    Ok(Stats {
        avg: sum / count as u64,
        max,
        min,
        sum,
        count,
    })
}

/// Renders each duration of `stats` as zero-padded `HH:MM`.
pub fn humanize(stats: &Stats) -> HumanStats {
    HumanStats {
        avg: format_hm(stats.avg),
        max: format_hm(stats.max),
        min: format_hm(stats.min),
        sum: format_hm(stats.sum),
        count: stats.count,
    }
}

impl From<&Stats> for HumanStats {
    fn from(stats: &Stats) -> Self {
        humanize(stats)
    }
}

impl fmt::Display for HumanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "avg: {}  max: {}  min: {}  sum: {}  rec: {}",
            self.avg, self.max, self.min, self.sum, self.count
        )
    }
}
