//! Week file discovery.
//!
//! Tasks are logged into one file per ISO week, named `week-WW-YYYY.txt`
//! and stored anywhere below a root directory. A date maps to the file of
//! its week; when that file does not exist, the closest later week file is
//! used instead.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use regex::Regex;
use thiserror::Error;
use walkdir::WalkDir;

use crate::span::DATE_FORMAT;

/// Pre-compiled regex for week file names.
static WEEK_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"week-(\d{2})-(\d{4})").unwrap());

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("invalid date: {value} (expected YYYY-MM-DD or 'now')")]
    InvalidDate { value: String },
    #[error("no week files found in {root}")]
    NoWeekFiles { root: String },
    #[error("no week file at or after {name}")]
    NoLaterWeekFile { name: String },
    #[error("failed to list log directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl LocateError {
    /// Whether the error only means there is no log for the requested dates.
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::NoWeekFiles { .. } | Self::NoLaterWeekFile { .. })
    }
}

/// A requested date: an explicit calendar date or the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpec {
    Now,
    Date(NaiveDate),
}

impl DateSpec {
    /// Resolves against `today`.
    pub const fn resolve(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Now => today,
            Self::Date(date) => date,
        }
    }
}

impl FromStr for DateSpec {
    type Err = LocateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "now" {
            return Ok(Self::Now);
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Self::Date)
            .map_err(|_| LocateError::InvalidDate {
                value: s.to_string(),
            })
    }
}

impl From<NaiveDate> for DateSpec {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

/// ISO week-based year and week number. Orders by year, then week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    /// The ISO week containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Canonical file name, e.g. `week-05-2022.txt`.
    ///
    /// The year is the ISO week-based year, not the calendar year: 2022-01-01
    /// is `week-52-2021.txt`. Logs named with `%V-%Y` differ around New Year.
    pub fn file_name(self) -> String {
        format!("week-{:02}-{}.txt", self.week, self.year)
    }

    /// Reads the week back from a file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let caps = WEEK_FILE_RE.captures(name)?;
        Some(Self {
            week: caps[1].parse().ok()?,
            year: caps[2].parse().ok()?,
        })
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// First day of the week used for boundary lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    pub week_start: Weekday,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            week_start: Weekday::Mon,
        }
    }
}

impl Calendar {
    pub const fn new(week_start: Weekday) -> Self {
        Self { week_start }
    }

    /// First day of the week containing `date`.
    pub fn week_start_of(&self, date: NaiveDate) -> NaiveDate {
        let offset = (date.weekday().num_days_from_monday() + 7
            - self.week_start.num_days_from_monday())
            % 7;
        date - Days::new(u64::from(offset))
    }

    /// The seven dates of the week containing `date`, first day first.
    pub fn dates_of_week(&self, date: NaiveDate) -> Vec<NaiveDate> {
        self.week_start_of(date).iter_days().take(7).collect()
    }
}

/// Lists candidate log files.
pub trait FileListing {
    /// Every regular file below the root.
    fn files(&self) -> Result<Vec<PathBuf>, LocateError>;

    /// Human-readable root, used in error messages.
    fn root(&self) -> String;
}

/// Recursive listing of a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    root: PathBuf,
}

impl DirectoryListing {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}

impl FileListing for DirectoryListing {
    fn files(&self) -> Result<Vec<PathBuf>, LocateError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn root(&self) -> String {
        self.root.display().to_string()
    }
}

/// In-memory listing.
impl FileListing for Vec<PathBuf> {
    fn files(&self) -> Result<Vec<PathBuf>, LocateError> {
        Ok(self.clone())
    }

    fn root(&self) -> String {
        "<memory>".to_string()
    }
}

/// A week file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekFile {
    pub key: WeekKey,
    pub path: PathBuf,
}

/// Maps dates to week files.
#[derive(Debug, Clone)]
pub struct WeekFileLocator<L> {
    listing: L,
    today: NaiveDate,
    calendar: Calendar,
}

impl<L: FileListing> WeekFileLocator<L> {
    pub fn new(listing: L, today: NaiveDate) -> Self {
        Self {
            listing,
            today,
            calendar: Calendar::default(),
        }
    }

    #[must_use]
    pub const fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    pub const fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// The week a requested date belongs to. Future dates map to this week.
    pub fn week_of(&self, date: DateSpec) -> WeekKey {
        let date = date.resolve(self.today).min(self.today);
        WeekKey::of(date)
    }

    /// Canonical week file name for a requested date.
    pub fn week_file_name(&self, date: DateSpec) -> String {
        self.week_of(date).file_name()
    }

    /// All week files, ordered by week.
    pub fn week_files(&self) -> Result<Vec<WeekFile>, LocateError> {
        let mut files: Vec<WeekFile> = self
            .listing
            .files()?
            .into_iter()
            .filter_map(|path| {
                let key = WeekKey::from_file_name(path.file_name()?.to_str()?)?;
                Some(WeekFile { key, path })
            })
            .collect();
        files.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.path.cmp(&b.path)));
        Ok(files)
    }

    /// The file holding `date`, or the closest later week file.
    pub fn find_week_file_by_date(&self, date: DateSpec) -> Result<PathBuf, LocateError> {
        let files = self.week_files()?;
        let index = self.locate(&files, date)?;
        Ok(files[index].path.clone())
    }

    /// The week file for the current date.
    pub fn find_last_week_file(&self) -> Result<PathBuf, LocateError> {
        self.find_week_file_by_date(DateSpec::Now)
    }

    /// Every week file from the week of `from` through the week of `to`.
    pub fn find_week_files_in_span(
        &self,
        from: DateSpec,
        to: DateSpec,
    ) -> Result<Vec<PathBuf>, LocateError> {
        let files = self.week_files()?;
        let fr_index = self.locate(&files, from)?;
        let to_index = self.locate(&files, to)?;
        if to_index < fr_index {
            return Ok(Vec::new());
        }
        Ok(files[fr_index..=to_index]
            .iter()
            .map(|f| f.path.clone())
            .collect())
    }

    fn locate(&self, files: &[WeekFile], date: DateSpec) -> Result<usize, LocateError> {
        if files.is_empty() {
            return Err(LocateError::NoWeekFiles {
                root: self.listing.root(),
            });
        }

        let target = self.week_of(date);
        if let Some(index) = files.iter().position(|f| f.key == target) {
            tracing::debug!(week = %target, path = ?files[index].path, "found week file");
            return Ok(index);
        }

        // Sorted, so the first later week is the closest one.
        let index = files
            .iter()
            .position(|f| f.key > target)
            .ok_or_else(|| LocateError::NoLaterWeekFile {
                name: target.file_name(),
            })?;
        tracing::debug!(
            week = %target,
            path = ?files[index].path,
            "week file missing, using next week file"
        );
        Ok(index)
    }
}
