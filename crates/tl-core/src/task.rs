//! Task records and single-line parsing.

use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

use regex::Regex;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::span::{SpanError, TimeSpan, time_spent};

/// Splits a line into the span-and-date prefix and the task text.
///
/// The prefix is greedy: it runs through the last `HH:MM` that is followed by
/// a space, provided two clock times are present.
static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*\d\d:\d\d.*\d\d:\d\d) (.*)$").unwrap());

/// Separators between words of a task text.
static WORD_SEP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s[:punct:]]+").unwrap());

/// A bracketed run of project tags, e.g. `[nvim][lsp]`.
static PROJECTS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.*\]").unwrap());

/// Brackets separating project tags inside a bracketed run.
static BRACKET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\[\]]").unwrap());

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line_number}: time span was not found: {line}")]
    NoTimeSpan { line_number: usize, line: String },
    #[error("line {line_number}: {source}: {line}")]
    Span {
        line_number: usize,
        line: String,
        #[source]
        source: SpanError,
    },
}

impl ParseError {
    /// The offending line content.
    pub fn line(&self) -> &str {
        match self {
            Self::NoTimeSpan { line, .. } | Self::Span { line, .. } => line,
        }
    }

    /// One-based line number within the parsed text.
    pub const fn line_number(&self) -> usize {
        match self {
            Self::NoTimeSpan { line_number, .. } | Self::Span { line_number, .. } => *line_number,
        }
    }
}

/// Identifier of a parsed task.
///
/// Only used to order tasks by appearance; carries no other meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// The id `offset` positions after this one.
    #[must_use]
    pub const fn offset(self, offset: usize) -> Self {
        Self(self.0 + offset as u64)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic source of task ids.
///
/// Owned by the caller of the parser, so two parses with fresh sequences
/// produce identical ids.
#[derive(Debug, Default)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Hands out the next id.
    pub fn next_id(&self) -> TaskId {
        TaskId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Reserves `count` consecutive ids and returns the first of them.
    pub fn reserve(&self, count: usize) -> TaskId {
        TaskId(self.next.fetch_add(count as u64, Ordering::Relaxed))
    }
}

/// Occurrences of a merged task, in the order they were logged.
///
/// Ids are not assumed unique: tasks from separate parses may share them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubTasks(Vec<Task>);

impl SubTasks {
    /// Appends an occurrence.
    pub fn push(&mut self, task: Task) {
        self.0.push(task);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The earliest occurrence.
    pub fn first(&self) -> Option<&Task> {
        self.0.first()
    }

    /// The latest occurrence.
    pub fn last(&self) -> Option<&Task> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a SubTasks {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Task> for SubTasks {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for SubTasks {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(&self.0)
    }
}

/// One parsed log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: TaskId,
    /// Span and date text exactly as it appeared on the line.
    pub raw_span_text: String,
    /// Everything after the span.
    pub text: String,
    pub duration: TimeSpan,
    pub words: Vec<String>,
    pub project_tags: Vec<String>,
    /// Summary label of a merged task, replacing `raw_span_text` on output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Occurrences folded into this task by a merge.
    #[serde(skip_serializing_if = "SubTasks::is_empty")]
    pub sub_tasks: SubTasks,
}

impl Task {
    /// Parses one log line into a task with the given id.
    ///
    /// `line_number` is only used for error reporting.
    pub fn from_line(line: &str, line_number: usize, id: TaskId) -> Result<Self, ParseError> {
        let (raw_span_text, text) = split_line(line).ok_or_else(|| ParseError::NoTimeSpan {
            line_number,
            line: line.to_string(),
        })?;

        let duration = time_spent(raw_span_text).map_err(|source| ParseError::Span {
            line_number,
            line: line.to_string(),
            source,
        })?;

        Ok(Self {
            id,
            raw_span_text: raw_span_text.to_string(),
            text: text.to_string(),
            duration,
            words: split_on_words(text),
            project_tags: projects_of_task(text),
            label: None,
            sub_tasks: SubTasks::default(),
        })
    }

    /// Label shown in front of the duration when rendered.
    pub fn span_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.raw_span_text)
    }

    /// Whether this task is the survivor of a merge.
    pub fn is_merged(&self) -> bool {
        !self.sub_tasks.is_empty()
    }
}

/// Renders the task as one log line: `<label> <HH:MM> <text>`.
impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {}", self.span_label(), self.duration, self.text)
    }
}

/// Parses a single line, drawing its id from `ids`.
pub fn parse_line(line: &str, ids: &IdSequence) -> Result<Task, ParseError> {
    Task::from_line(line, 1, ids.next_id())
}

/// Splits a line into `(span_and_date_prefix, task_text)`.
pub fn split_line(line: &str) -> Option<(&str, &str)> {
    let caps = LINE_RE.captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Splits text on runs of whitespace and punctuation.
pub fn split_on_words(text: &str) -> Vec<String> {
    resplit(text, &WORD_SEP_RE)
}

/// Tags from a bracketed run: `[nvim][lsp] fix` gives `nvim`, `lsp`.
pub fn projects_of_task(text: &str) -> Vec<String> {
    PROJECTS_RE
        .find(text)
        .map(|m| resplit(m.as_str(), &BRACKET_RE))
        .unwrap_or_default()
}

fn resplit(text: &str, separator: &Regex) -> Vec<String> {
    separator
        .split(text)
        .filter(|token| !token.trim().is_empty())
        .map(String::from)
        .collect()
}
