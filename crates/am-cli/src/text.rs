//! Splitting files into lines and writing them back.
//!
//! Lines are separated by `\n`. A `\r` before the separator stays part of
//! the line, so CRLF files round-trip unchanged.

use std::fs;
use std::path::Path;

use anyhow::Context;

/// A text file as an ordered list of lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextFile {
    pub lines: Vec<String>,
    /// Whether the last line was terminated by `\n`.
    pub trailing_newline: bool,
}

pub fn split_lines(text: &str) -> TextFile {
    if text.is_empty() {
        return TextFile::default();
    }

    let mut lines: Vec<String> = text.split('\n').map(str::to_owned).collect();
    let trailing_newline = text.ends_with('\n');
    if trailing_newline {
        lines.pop();
    }
    TextFile {
        lines,
        trailing_newline,
    }
}

pub fn join_lines(lines: &[String], trailing_newline: bool) -> String {
    let mut text = lines.join("\n");
    if trailing_newline && !lines.is_empty() {
        text.push('\n');
    }
    text
}

pub fn read_lines(path: &Path) -> anyhow::Result<TextFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(split_lines(&text))
}

pub fn write_lines(path: &Path, lines: &[String], trailing_newline: bool) -> anyhow::Result<()> {
    fs::write(path, join_lines(lines, trailing_newline))
        .with_context(|| format!("failed to write {}", path.display()))
}
