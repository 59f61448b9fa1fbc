//! Merge results and conflict records.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// One of the two edited copies in a three-way merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Ours,
    Theirs,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Ours => f.write_str("ours"),
            Side::Theirs => f.write_str("theirs"),
        }
    }
}

/// A base region both sides edited in incompatible ways.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Conflict {
    /// Base lines the region spans.
    pub base_range: Range<usize>,
    /// Base text of the region.
    pub base: Vec<String>,
    /// Our text for the region.
    pub ours: Vec<String>,
    /// Their text for the region.
    pub theirs: Vec<String>,
}

impl Conflict {
    /// Text of the region on one side.
    pub fn side(&self, side: Side) -> &[String] {
        match side {
            Side::Ours => &self.ours,
            Side::Theirs => &self.theirs,
        }
    }
}

/// The merged line sequence plus every conflict met on the way.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub lines: Vec<String>,
    pub conflicts: Vec<Conflict>,
}

impl MergeOutcome {
    /// Returns `true` if the merge needed no conflict resolution.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
