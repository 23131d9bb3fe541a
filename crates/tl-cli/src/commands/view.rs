//! Task listing shared by `show` and `parse`: filter, parse, merge, summarize.

use std::borrow::Cow;
use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use tl_core::{
    HumanStats, IdSequence, ParseError, Stats, Task, humanize, merge, parse_parallel, to_text,
};

use crate::ViewArgs;

/// Tasks of one invocation with their text form and statistics.
#[derive(Debug, Serialize)]
pub struct Report {
    pub tasks: Vec<Task>,
    #[serde(skip)]
    pub text: String,
    pub stats: Option<Stats>,
    pub summary: Option<HumanStats>,
}

/// Keeps the lines matching `pattern`.
///
/// An invalid pattern is reported and the text is kept whole.
fn apply_filter<'a>(text: &'a str, pattern: &str) -> Cow<'a, str> {
    match tl_core::filter::compile(pattern) {
        Ok(re) => Cow::Owned(tl_core::filter::filter_lines(text, &re)),
        Err(e) => {
            tracing::warn!(pattern, error = %e, "ignoring filter");
            eprintln!("Warning: {e}; showing unfiltered tasks");
            Cow::Borrowed(text)
        }
    }
}

/// Runs the pipeline over raw log text.
pub fn build(text: &str, args: &ViewArgs) -> Result<Report, ParseError> {
    let text = match &args.filter {
        Some(pattern) => apply_filter(text, pattern),
        None => Cow::Borrowed(text),
    };

    let tasks = parse_parallel(&text, &IdSequence::new())?;
    let spent = to_text(&tasks);
    let (tasks, text) = if args.merge {
        let merged = merge(&tasks, &spent);
        (merged.tasks, merged.text)
    } else {
        (tasks, spent)
    };

    // Only fails on an empty task list.
    let stats = tl_core::stats(&tasks).ok();
    let summary = stats.as_ref().map(humanize);

    Ok(Report {
        tasks,
        text,
        stats,
        summary,
    })
}

/// Writes the report as task lines and a statistics footer, or as JSON.
pub fn write_report<W: Write>(writer: &mut W, report: &Report, json: bool) -> Result<()> {
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(report)?)?;
        return Ok(());
    }

    write!(writer, "{}", report.text)?;
    match &report.summary {
        Some(summary) => writeln!(writer, "{summary}")?,
        None => writeln!(writer, "rec: 0")?,
    }
    Ok(())
}

pub fn run<W: Write>(writer: &mut W, text: &str, args: &ViewArgs) -> Result<()> {
    let report = build(text, args)?;
    tracing::debug!(tasks = report.tasks.len(), merge = args.merge, "built report");
    write_report(writer, &report, args.json)
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    const LOG: &str = "\
Monday (2022-01-03) 09:00 → 09:10 standup
Monday (2022-01-03) 09:10 → 11:00 review [tl]
Monday (2022-01-03) 13:00 → 13:15 standup
";

    fn output(text: &str, args: &ViewArgs) -> String {
        let mut out = Vec::new();
        run(&mut out, text, args).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_listing() {
        assert_snapshot!(output(LOG, &ViewArgs::default()), @r"
        Monday (2022-01-03) 09:00 → 09:10 <00:10> standup
        Monday (2022-01-03) 09:10 → 11:00 <01:50> review [tl]
        Monday (2022-01-03) 13:00 → 13:15 <00:15> standup
        avg: 00:45  max: 01:50  min: 00:10  sum: 02:15  rec: 3
        ");
    }

    #[test]
    fn test_merged_listing() {
        let args = ViewArgs {
            merge: true,
            ..ViewArgs::default()
        };
        assert_snapshot!(output(LOG, &args), @r"
        *M (2022-01-03) 09:00 > 13:15 <00:25> standup
        Monday (2022-01-03) 09:10 → 11:00 <01:50> review [tl]
        avg: 01:07  max: 01:50  min: 00:25  sum: 02:15  rec: 2
        ");
    }

    #[test]
    fn test_filtered_listing() {
        let args = ViewArgs {
            filter: Some("STANDUP".to_string()),
            ..ViewArgs::default()
        };
        assert_snapshot!(output(LOG, &args), @r"
        Monday (2022-01-03) 09:00 → 09:10 <00:10> standup
        Monday (2022-01-03) 13:00 → 13:15 <00:15> standup
        avg: 00:12  max: 00:15  min: 00:10  sum: 00:25  rec: 2
        ");
    }

    #[test]
    fn test_invalid_filter_keeps_everything() {
        let args = ViewArgs {
            filter: Some("[".to_string()),
            ..ViewArgs::default()
        };
        assert_eq!(output(LOG, &args), output(LOG, &ViewArgs::default()));
    }

    #[test]
    fn test_no_tasks_prints_zero_records() {
        let args = ViewArgs {
            filter: Some("holiday".to_string()),
            ..ViewArgs::default()
        };
        assert_eq!(output(LOG, &args), "rec: 0\n");
        assert_eq!(output("", &ViewArgs::default()), "rec: 0\n");
    }

    #[test]
    fn test_json_report() {
        let args = ViewArgs {
            json: true,
            merge: true,
            ..ViewArgs::default()
        };
        let value: serde_json::Value = serde_json::from_str(&output(LOG, &args)).unwrap();

        assert_eq!(value["tasks"].as_array().unwrap().len(), 2);
        assert_eq!(value["tasks"][0]["text"], "standup");
        assert_eq!(value["tasks"][0]["label"], "*M (2022-01-03) 09:00 > 13:15");
        assert_eq!(value["tasks"][0]["sub_tasks"].as_array().unwrap().len(), 2);
        assert!(value["tasks"][1].get("sub_tasks").is_none());
        assert_eq!(value["stats"]["sum"], 8100);
        assert_eq!(value["summary"]["sum"], "02:15");
        assert!(value.get("text").is_none());
    }

    #[test]
    fn test_parse_error_surfaces_line() {
        let err = build("09:00 → 09:10 standup\noops\n", &ViewArgs::default()).unwrap_err();
        assert_eq!(err.line(), "oops");
        assert_eq!(err.line_number(), 2);
    }
}
