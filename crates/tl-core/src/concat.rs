//! Joining week files into the log of a date span.
//!
//! Boundary files are trimmed to the requested dates: lines before the first
//! line of the start date are dropped from the first file, lines after the
//! last line of the end date are dropped from the last file. A boundary date
//! with no logged tasks falls back to the nearest logged date of its week.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::span::DATE_FORMAT;
use crate::week::{Calendar, DateSpec, FileListing, LocateError, WeekFileLocator};

#[derive(Debug, Error)]
pub enum ConcatError {
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Byte offset of the line boundary around `needle`.
///
/// With `including_last`, the end of the last line containing `needle`.
/// Otherwise the start of the first line containing it, at its leading newline.
fn line_boundary(s: &str, needle: &str, including_last: bool) -> Option<usize> {
    if including_last {
        let pos = s.rfind(needle)?;
        Some(s[pos..].find('\n').map_or(s.len(), |i| pos + i))
    } else {
        let pos = s.find(needle)?;
        Some(s[..pos].rfind('\n').unwrap_or(0))
    }
}

/// Drops the lines before the line containing `needle`.
///
/// With `including_last`, also drops every line containing it.
/// Returns false and leaves `s` untouched when `needle` is absent.
pub fn remove_lines_before(s: &mut String, needle: &str, including_last: bool) -> bool {
    let Some(pos) = line_boundary(s, needle, including_last) else {
        return false;
    };
    s.drain(..pos);
    true
}

/// Drops the lines after the last line containing `needle`.
///
/// Without `including_last`, drops from the first line containing it instead.
/// Returns false and leaves `s` untouched when `needle` is absent.
pub fn remove_lines_after(s: &mut String, needle: &str, including_last: bool) -> bool {
    let Some(pos) = line_boundary(s, needle, including_last) else {
        return false;
    };
    s.truncate(pos);
    true
}

fn date_string(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Drops everything logged before `date`.
///
/// Falls back to dropping through the nearest earlier date of the week when
/// `date` itself has no lines.
pub fn remove_lines_before_date(s: &mut String, date: NaiveDate, calendar: &Calendar) -> bool {
    if remove_lines_before(s, &date_string(date), false) {
        return true;
    }

    let week = calendar.dates_of_week(date);
    let index = week.iter().position(|d| *d == date).unwrap_or(0);
    for earlier in week[..index].iter().rev() {
        if remove_lines_before(s, &date_string(*earlier), true) {
            tracing::debug!(%date, %earlier, "trimmed start at earlier date");
            return true;
        }
    }
    false
}

/// Drops everything logged after `date`.
///
/// Falls back to dropping from the nearest later date of the week when
/// `date` itself has no lines.
pub fn remove_lines_after_date(s: &mut String, date: NaiveDate, calendar: &Calendar) -> bool {
    if remove_lines_after(s, &date_string(date), true) {
        return true;
    }

    let week = calendar.dates_of_week(date);
    let index = week.iter().position(|d| *d == date).unwrap_or(week.len());
    for later in week.iter().skip(index + 1) {
        if remove_lines_after(s, &date_string(*later), false) {
            tracing::debug!(%date, %later, "trimmed end at later date");
            return true;
        }
    }
    false
}

fn file_content(path: &Path) -> Result<String, ConcatError> {
    fs::read_to_string(path).map_err(|source| ConcatError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn push_file(out: &mut String, content: &str) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(content);
}

/// Concatenates week files, trimming the first and last to the date range.
pub fn concat_week_files(
    paths: &[PathBuf],
    from: NaiveDate,
    to: NaiveDate,
    calendar: &Calendar,
) -> Result<String, ConcatError> {
    let (Some(first), Some(last)) = (paths.first(), paths.last()) else {
        return Ok(String::new());
    };

    if paths.len() == 1 {
        let mut content = file_content(first)?;
        remove_lines_before_date(&mut content, from, calendar);
        remove_lines_after_date(&mut content, to, calendar);
        return Ok(content.trim().to_string());
    }

    let mut content_first = file_content(first)?;
    let mut content_last = file_content(last)?;
    remove_lines_before_date(&mut content_first, from, calendar);
    remove_lines_after_date(&mut content_last, to, calendar);

    let mut out = String::new();
    push_file(&mut out, &content_first);
    for path in &paths[1..paths.len() - 1] {
        push_file(&mut out, &file_content(path)?);
    }
    push_file(&mut out, &content_last);
    Ok(out.trim().to_string())
}

/// Loads the log text between two dates, both inclusive.
///
/// Endpoints given in reverse order are swapped.
pub fn resolve_span<L: FileListing>(
    locator: &WeekFileLocator<L>,
    from: DateSpec,
    to: DateSpec,
) -> Result<String, ConcatError> {
    let today = locator.today();
    let (mut from, mut to) = (from.resolve(today), to.resolve(today));
    if to < from {
        std::mem::swap(&mut from, &mut to);
    }

    let paths = locator.find_week_files_in_span(from.into(), to.into())?;
    tracing::debug!(%from, %to, files = paths.len(), "resolved date span");
    concat_week_files(&paths, from, to, locator.calendar())
}
