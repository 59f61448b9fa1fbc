//! Classified edit blocks.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::indices::{Indices, Offset};

/// Edit classification of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Lines present unchanged on both sides.
    Unchanged,
    /// Original lines replaced by modified lines.
    Changed,
    /// Lines only present in the modified sequence.
    Added,
    /// Lines only present in the original sequence.
    Removed,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::Unchanged => "Unchanged",
            BlockKind::Changed => "Changed",
            BlockKind::Added => "Added",
            BlockKind::Removed => "Removed",
        };
        f.write_str(name)
    }
}

/// A maximal run of one edit classification.
///
/// A block owns copies of the lines it spans on each side. `Added` blocks
/// carry no original lines and `Removed` blocks carry no modified lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    kind: BlockKind,
    start: Indices,
    original_lines: Vec<String>,
    modified_lines: Vec<String>,
}

impl Block {
    pub fn new(
        kind: BlockKind,
        start: Indices,
        original_lines: Vec<String>,
        modified_lines: Vec<String>,
    ) -> Self {
        Self {
            kind,
            start,
            original_lines,
            modified_lines,
        }
    }

    /// An `Unchanged` block; the same lines appear on both sides.
    pub fn unchanged(start: Indices, lines: Vec<String>) -> Self {
        Self::new(BlockKind::Unchanged, start, lines.clone(), lines)
    }

    pub fn added(start: Indices, lines: Vec<String>) -> Self {
        Self::new(BlockKind::Added, start, Vec::new(), lines)
    }

    pub fn removed(start: Indices, lines: Vec<String>) -> Self {
        Self::new(BlockKind::Removed, start, lines, Vec::new())
    }

    pub fn changed(start: Indices, original: Vec<String>, modified: Vec<String>) -> Self {
        Self::new(BlockKind::Changed, start, original, modified)
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn start(&self) -> Indices {
        self.start
    }

    /// Exclusive end cursor: `start + (original_len, modified_len)`.
    ///
    /// An empty side yields `end == start` on that side.
    pub fn end(&self) -> Indices {
        self.start + Indices::new(self.original_len(), self.modified_len())
    }

    pub fn original_lines(&self) -> &[String] {
        &self.original_lines
    }

    pub fn modified_lines(&self) -> &[String] {
        &self.modified_lines
    }

    pub fn original_len(&self) -> usize {
        self.original_lines.len()
    }

    pub fn modified_len(&self) -> usize {
        self.modified_lines.len()
    }

    /// Range of original lines this block consumes.
    ///
    /// A block anchored at the sentinel is treated as sitting at `usize::MAX`.
    pub fn original_range(&self) -> Range<usize> {
        let start = self.start.original.resolve(usize::MAX);
        start..start.saturating_add(self.original_len())
    }

    /// Original line this block is anchored at.
    pub fn anchor(&self) -> Offset {
        self.start.original
    }

    /// Returns `true` if both sides carry the same lines under the same kind.
    pub fn same_edit(&self, other: &Block) -> bool {
        self.kind == other.kind
            && self.original_lines == other.original_lines
            && self.modified_lines == other.modified_lines
    }

    /// Consume the block, returning `(original_lines, modified_lines)`.
    pub fn into_lines(self) -> (Vec<String>, Vec<String>) {
        (self.original_lines, self.modified_lines)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let original = self.original_lines.join("\n");
        let modified = self.modified_lines.join("\n");
        match self.kind {
            BlockKind::Unchanged | BlockKind::Added => write!(f, "{}: {modified}", self.kind),
            BlockKind::Removed => write!(f, "{}: {original}", self.kind),
            BlockKind::Changed if self.original_len() == self.modified_len() => {
                write!(f, "{}: replaced with {modified}", self.kind)
            }
            BlockKind::Changed => write!(f, "{}: {original} > {modified}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn end_spans_both_sides() {
        let block = Block::changed(Indices::new(2, 3), lines(&["a", "b"]), lines(&["c"]));
        assert_eq!(block.end(), Indices::new(4, 4));
        assert_eq!(block.original_range(), 2..4);
    }

    #[test]
    fn empty_side_keeps_end_at_start() {
        let added = Block::added(Indices::new(5, 5), lines(&["x", "y"]));
        assert_eq!(added.end().original, added.start().original);
        assert_eq!(added.end().modified, Offset::At(7));
        assert!(added.original_range().is_empty());

        let removed = Block::removed(Indices::new(1, 1), lines(&["x"]));
        assert_eq!(removed.end().modified, removed.start().modified);
    }

    #[test]
    fn unchanged_mirrors_lines() {
        let block = Block::unchanged(Indices::ZERO, lines(&["a"]));
        assert_eq!(block.original_lines(), block.modified_lines());
        assert_eq!(block.kind(), BlockKind::Unchanged);
    }

    #[test]
    fn same_edit_ignores_position() {
        let a = Block::added(Indices::new(1, 1), lines(&["x"]));
        let b = Block::added(Indices::new(1, 4), lines(&["x"]));
        let c = Block::added(Indices::new(1, 1), lines(&["y"]));
        assert!(a.same_edit(&b));
        assert!(!a.same_edit(&c));
    }

    #[test]
    fn display_summaries() {
        let same_len = Block::changed(Indices::ZERO, lines(&["a"]), lines(&["b"]));
        assert_eq!(same_len.to_string(), "Changed: replaced with b");

        let diff_len = Block::changed(Indices::ZERO, lines(&["a"]), lines(&["b", "c"]));
        assert_eq!(diff_len.to_string(), "Changed: a > b\nc");

        let removed = Block::removed(Indices::ZERO, lines(&["gone"]));
        assert_eq!(removed.to_string(), "Removed: gone");
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&BlockKind::Unchanged).unwrap();
        assert_eq!(json, "\"unchanged\"");
    }
}
