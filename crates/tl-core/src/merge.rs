//! Merging of recurring tasks.
//!
//! Tasks with exactly the same text collapse into the first occurrence, which
//! keeps its position and carries every occurrence as a sub-task. Its duration
//! becomes the sum of all occurrences and its span is replaced by a summary
//! label:
//!
//! ```text
//! *M (2022-01-03) 09:00 > 17:15          all occurrences on one day
//! *M (2022-01-03 >> 2022-01-07)          occurrences over several days
//! ```

use serde::Serialize;

use crate::render::to_text;
use crate::span::{CLOCK_FORMAT, DATE_FORMAT};
use crate::task::{SubTasks, Task};

/// Prefix of merged task labels.
pub const MERGED_MARK: &str = "*M";

/// Result of a merge: the reduced tasks and their text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Merged {
    pub tasks: Vec<Task>,
    pub text: String,
}

/// Merges tasks with identical text.
///
/// Tasks whose text does not occur in `reference` are dropped first, so the
/// merge follows whatever filter produced the displayed text.
pub fn merge(tasks: &[Task], reference: &str) -> Merged {
    let mut slots: Vec<Option<Task>> = tasks
        .iter()
        .filter(|t| reference.contains(t.text.as_str()))
        .cloned()
        .map(Some)
        .collect();

    let mut merged = Vec::with_capacity(slots.len());
    for i in 0..slots.len() {
        let Some(mut main) = slots[i].take() else {
            continue;
        };

        let duplicates: Vec<Task> = slots[i + 1..]
            .iter_mut()
            .filter_map(|slot| {
                if slot.as_ref().is_some_and(|t| t.text == main.text) {
                    slot.take()
                } else {
                    None
                }
            })
            .collect();

        if !duplicates.is_empty() {
            let mut first = main.clone();
            first.sub_tasks = SubTasks::default();
            main.sub_tasks = std::iter::once(first).chain(duplicates).collect();
            aggregate(&mut main);
        }
        merged.push(main);
    }

    tracing::debug!(before = tasks.len(), after = merged.len(), "merged tasks");
    let text = to_text(&merged);
    Merged {
        tasks: merged,
        text,
    }
}

/// Recomputes duration and label of a main task from its sub-tasks.
fn aggregate(main: &mut Task) {
    if main.sub_tasks.len() < 2 {
        return;
    }
    let (Some(first), Some(last)) = (main.sub_tasks.first(), main.sub_tasks.last()) else {
        return;
    };

    let seconds: u64 = main.sub_tasks.iter().map(|t| t.duration.seconds).sum();
    let same_day = main
        .sub_tasks
        .iter()
        .all(|t| t.duration.date_fr == first.duration.date_fr);

    let label = if same_day {
        format!(
            "{MERGED_MARK} ({}) {} > {}",
            date_label(first.duration.date_fr),
            first.duration.start.format(CLOCK_FORMAT),
            last.duration.end.format(CLOCK_FORMAT),
        )
    } else {
        format!(
            "{MERGED_MARK} ({} >> {})",
            date_label(first.duration.date_fr),
            date_label(last.duration.date_to),
        )
    };
    let end = last.duration.end;
    let date_to = last.duration.date_to;

    main.duration.seconds = seconds;
    main.duration.end = end;
    main.duration.date_to = date_to;
    main.label = Some(label);
}

fn date_label(date: Option<chrono::NaiveDate>) -> String {
    date.map_or_else(|| "?".to_string(), |d| d.format(DATE_FORMAT).to_string())
}
