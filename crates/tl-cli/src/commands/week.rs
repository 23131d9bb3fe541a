//! Week command: the week file holding a date.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;

use tl_core::{DateSpec, DirectoryListing, WeekFileLocator};

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config, today: NaiveDate, date: &str) -> Result<()> {
    let date: DateSpec = date.parse()?;
    let locator = WeekFileLocator::new(DirectoryListing::new(config.log_dir()?), today)
        .with_calendar(config.calendar());

    let path = match date {
        DateSpec::Now => locator.find_last_week_file()?,
        DateSpec::Date(_) => locator.find_week_file_by_date(date)?,
    };
    writeln!(writer, "{}", path.display())?;
    Ok(())
}
