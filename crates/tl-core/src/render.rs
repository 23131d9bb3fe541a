//! Text form of parsed tasks.
//!
//! One line per task, `<label> <HH:MM> <text>`, where the label is the span
//! exactly as it was read, or the summary of a merged task.

use crate::task::Task;

/// Serializes tasks, one newline-terminated line each.
pub fn to_text(tasks: &[Task]) -> String {
    tasks.iter().map(|task| format!("{task}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use crate::task::IdSequence;

    #[test]
    fn test_to_text_keeps_raw_span() {
        let text = "Saturday (2022-01-08) 23:53 → 00:07 late fix\n\
                    08:00-08:30 [tl] docs\n";
        let tasks = parse(text, &IdSequence::new()).unwrap();
        assert_eq!(
            to_text(&tasks),
            "Saturday (2022-01-08) 23:53 → 00:07 <00:14> late fix\n\
             08:00-08:30 <00:30> [tl] docs\n"
        );
    }

    #[test]
    fn test_to_text_of_nothing() {
        assert_eq!(to_text(&[]), "");
    }
}
