//! Parse command: the task listing of a single log file or stdin.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::ViewArgs;
use crate::commands::view;

/// Reads the whole log from `file`, or from `stdin` when no file is given.
pub fn read_input<R: Read>(file: Option<&Path>, mut stdin: R) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

pub fn run<W: Write, R: Read>(
    writer: &mut W,
    file: Option<&Path>,
    stdin: R,
    args: &ViewArgs,
) -> Result<()> {
    let text = read_input(file, stdin)?;
    view::run(writer, &text, args)
}
