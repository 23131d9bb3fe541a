//! Show command: the tasks logged over a date span.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;

use tl_core::{ConcatError, DateSpec, DirectoryListing, WeekFileLocator, resolve_span};

use crate::commands::view;
use crate::{Config, ViewArgs};

fn date_arg(value: Option<&str>, default: DateSpec) -> Result<DateSpec> {
    Ok(value.map(str::parse::<DateSpec>).transpose()?.unwrap_or(default))
}

/// Prints the tasks between `from` and `to`.
///
/// The span defaults to the start of the current week through `today`.
pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    today: NaiveDate,
    from: Option<&str>,
    to: Option<&str>,
    args: &ViewArgs,
) -> Result<()> {
    let calendar = config.calendar();
    let locator = WeekFileLocator::new(DirectoryListing::new(config.log_dir()?), today)
        .with_calendar(calendar);

    let from = date_arg(from, DateSpec::Date(calendar.week_start_of(today)))?;
    let to = date_arg(to, DateSpec::Now)?;

    let text = match resolve_span(&locator, from, to) {
        Ok(text) => text,
        Err(ConcatError::Locate(e)) if e.is_missing() => {
            tracing::warn!(error = %e, "no log for requested span");
            eprintln!("Warning: {e}");
            String::new()
        }
        Err(e) => return Err(e.into()),
    };

    view::run(writer, &text, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::path::Path;

    use insta::assert_snapshot;

    const WEEK_01: &str = "\
Monday (2022-01-03) 09:00 → 09:15 standup
Monday (2022-01-03) 09:15 → 11:00 review
Tuesday (2022-01-04) 09:00 → 09:20 standup
Thursday (2022-01-06) 09:00 → 09:10 standup
Thursday (2022-01-06) 10:00 → 12:00 write docs
Sunday (2022-01-09) 20:00 → 21:00 reading
";

    fn thursday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, 6).unwrap()
    }

    fn config(dir: &Path) -> Config {
        Config {
            log_dir: Some(dir.to_path_buf()),
            ..Config::default()
        }
    }

    fn show(config: &Config, from: Option<&str>, to: Option<&str>, args: &ViewArgs) -> String {
        let mut out = Vec::new();
        run(&mut out, config, thursday(), from, to, args).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_default_span_is_week_to_date() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("week-01-2022.txt"), WEEK_01).unwrap();

        assert_snapshot!(show(&config(temp.path()), None, None, &ViewArgs::default()), @r"
        Monday (2022-01-03) 09:00 → 09:15 <00:15> standup
        Monday (2022-01-03) 09:15 → 11:00 <01:45> review
        Tuesday (2022-01-04) 09:00 → 09:20 <00:20> standup
        Thursday (2022-01-06) 09:00 → 09:10 <00:10> standup
        Thursday (2022-01-06) 10:00 → 12:00 <02:00> write docs
        avg: 00:54  max: 02:00  min: 00:10  sum: 04:30  rec: 5
        ");
    }

    #[test]
    fn test_merged_span() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("week-01-2022.txt"), WEEK_01).unwrap();
        let args = ViewArgs {
            merge: true,
            ..ViewArgs::default()
        };

        assert_snapshot!(show(&config(temp.path()), None, None, &args), @r"
        *M (2022-01-03 >> 2022-01-06) <00:45> standup
        Monday (2022-01-03) 09:15 → 11:00 <01:45> review
        Thursday (2022-01-06) 10:00 → 12:00 <02:00> write docs
        avg: 01:30  max: 02:00  min: 00:45  sum: 04:30  rec: 3
        ");
    }

    #[test]
    fn test_explicit_single_day() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("week-01-2022.txt"), WEEK_01).unwrap();

        let out = show(
            &config(temp.path()),
            Some("2022-01-04"),
            Some("2022-01-04"),
            &ViewArgs::default(),
        );
        assert_snapshot!(out, @r"
        Tuesday (2022-01-04) 09:00 → 09:20 <00:20> standup
        avg: 00:20  max: 00:20  min: 00:20  sum: 00:20  rec: 1
        ");
    }

    #[test]
    fn test_missing_log_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let out = show(&config(temp.path()), None, None, &ViewArgs::default());
        assert_eq!(out, "rec: 0\n");
    }

    #[test]
    fn test_unconfigured_log_dir_fails() {
        let mut out = Vec::new();
        let err = run(&mut out, &Config::default(), thursday(), None, None, &ViewArgs::default())
            .unwrap_err();
        assert!(err.downcast_ref::<crate::ConfigError>().is_some());
    }

    #[test]
    fn test_invalid_date_fails() {
        let temp = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = run(
            &mut out,
            &config(temp.path()),
            thursday(),
            Some("yesterday"),
            None,
            &ViewArgs::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }
}
