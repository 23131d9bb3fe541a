//! Multi-line log parsing, sequential and chunked-parallel.
//!
//! Parallel parsing splits the lines into contiguous chunks, parses each chunk
//! on the rayon pool and concatenates the results in chunk order. Ids are
//! reserved up front and assigned by line position, so both paths produce the
//! same tasks with the same ids from a fresh [`IdSequence`].

use std::num::NonZeroUsize;
use std::ops::Range;

use rayon::prelude::*;

use crate::task::{IdSequence, ParseError, Task, TaskId};

/// Inputs with fewer newlines than this are always parsed sequentially.
pub const PARALLEL_MIN_NEWLINES: usize = 101;

/// Parses every non-blank line of `text`, in order.
///
/// The first malformed line aborts the whole parse.
pub fn parse(text: &str, ids: &IdSequence) -> Result<Vec<Task>, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    let first = ids.reserve(lines.len());
    parse_chunk(&lines, 0, first)
}

/// Same contract as [`parse`], using the available parallelism.
pub fn parse_parallel(text: &str, ids: &IdSequence) -> Result<Vec<Task>, ParseError> {
    let threads = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    parse_parallel_with(text, ids, threads)
}

/// Same contract as [`parse`], with an explicit thread budget.
///
/// One thread of the budget is kept for coordination, the remaining ones get
/// one equal-sized chunk each. Leftover lines form one extra final chunk.
pub fn parse_parallel_with(
    text: &str,
    ids: &IdSequence,
    threads: usize,
) -> Result<Vec<Task>, ParseError> {
    let newlines = text.bytes().filter(|&b| b == b'\n').count();
    if threads < 2 || newlines < PARALLEL_MIN_NEWLINES {
        tracing::debug!(threads, newlines, "parsing sequentially");
        return parse(text, ids);
    }

    let lines: Vec<&str> = text.lines().collect();
    let chunks = chunk_ranges(lines.len(), threads - 1);
    tracing::debug!(
        threads,
        lines = lines.len(),
        chunks = chunks.len(),
        "parsing in parallel"
    );

    let first = ids.reserve(lines.len());
    let results: Vec<Result<Vec<Task>, ParseError>> = chunks
        .par_iter()
        .map(|range| parse_chunk(&lines[range.clone()], range.start, first))
        .collect();

    // Chunk order, so the reported error is the first one in the text.
    let mut tasks = Vec::with_capacity(lines.len());
    for result in results {
        tasks.extend(result?);
    }
    Ok(tasks)
}

/// Splits `len` lines into `workers` equal ranges plus a remainder range.
pub fn chunk_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let per_chunk = len / workers;
    let mut ranges: Vec<Range<usize>> = (0..workers)
        .map(|i| i * per_chunk..(i + 1) * per_chunk)
        .collect();
    if len % workers != 0 {
        ranges.push(workers * per_chunk..len);
    }
    ranges
}

/// Parses lines starting at `offset` within the whole text.
///
/// Line `i` of the whole text gets id `first + i`. Blank lines are skipped.
fn parse_chunk(lines: &[&str], offset: usize, first: TaskId) -> Result<Vec<Task>, ParseError> {
    let mut tasks = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let position = offset + i;
        let task = Task::from_line(line, position + 1, first.offset(position)).inspect_err(|e| {
            tracing::debug!(line_number = e.line_number(), "failed to parse line");
        })?;
        tasks.push(task);
    }
    Ok(tasks)
}
