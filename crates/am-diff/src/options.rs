use serde::{Deserialize, Serialize};

use crate::matching::is_closing_delimiter;

/// Tuning knobs for the diff engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Never anchor a re-synchronisation on a pure closing delimiter.
    pub skip_closing_delimiters: bool,
    /// Extra lines (compared trimmed) treated as closing delimiters.
    pub delimiters: Vec<String>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            skip_closing_delimiters: true,
            delimiters: Vec::new(),
        }
    }
}

impl DiffOptions {
    /// Options that anchor on any line, delimiters included.
    pub fn exact() -> Self {
        Self {
            skip_closing_delimiters: false,
            delimiters: Vec::new(),
        }
    }

    /// Returns `true` if `line` must not be used as a match anchor.
    pub fn is_skipped(&self, line: &str) -> bool {
        if !self.skip_closing_delimiters {
            return false;
        }
        is_closing_delimiter(line) || {
            let trimmed = line.trim();
            self.delimiters.iter().any(|d| d.trim() == trimmed)
        }
    }
}
