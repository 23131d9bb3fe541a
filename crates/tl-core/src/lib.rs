//! Core logic for the task log time tracker.
//!
//! This crate contains the engine behind the `tl` CLI:
//! - Parsing: log lines into [`Task`] records, sequentially or in parallel
//! - Week files: locating and concatenating the log files of a date span
//! - Aggregation: regex filtering, duration statistics and task merging

pub mod concat;
pub mod filter;
pub mod merge;
pub mod parse;
mod render;
pub mod span;
pub mod stats;
pub mod task;
pub mod week;

pub use concat::{ConcatError, concat_week_files, resolve_span};
pub use filter::{FilterError, filter};
pub use merge::{Merged, merge};
pub use parse::{parse, parse_parallel};
pub use render::to_text;
pub use span::{SpanError, TimeSpan, calculate_time_spent, format_hm};
pub use stats::{HumanStats, Stats, StatsError, humanize, stats};
pub use task::{IdSequence, ParseError, SubTasks, Task, TaskId};
pub use week::{
    Calendar, DateSpec, DirectoryListing, FileListing, LocateError, WeekFileLocator, WeekKey,
};
