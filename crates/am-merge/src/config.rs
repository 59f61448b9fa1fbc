use am_diff::DiffOptions;
use serde::{Deserialize, Serialize};

/// What to do with a region both sides edited incompatibly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Write both sides between git-style conflict markers.
    #[default]
    Markers,
    /// Keep our side of the region.
    Ours,
    /// Keep their side of the region.
    Theirs,
    /// Fail the whole merge on the first conflict.
    Abort,
}

/// Order of two different insertions anchored at the same base line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertionOrder {
    #[default]
    OursFirst,
    TheirsFirst,
}

/// Configuration for the three-way merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub conflict_policy: ConflictPolicy,
    pub insertion_order: InsertionOrder,
    /// Width of the `<<<<<<<` / `=======` / `>>>>>>>` markers.
    pub marker_size: usize,
    /// Label written after the opening marker.
    pub ours_label: String,
    /// Label written after the closing marker.
    pub theirs_label: String,
    /// Options for the two pairwise diffs against the base.
    pub diff: DiffOptions,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            conflict_policy: ConflictPolicy::Markers,
            insertion_order: InsertionOrder::OursFirst,
            marker_size: 7,
            ours_label: "ours".into(),
            theirs_label: "theirs".into(),
            diff: DiffOptions::default(),
        }
    }
}

impl MergeConfig {
    /// Configuration that fails on any conflict instead of recording it.
    pub fn strict() -> Self {
        Self {
            conflict_policy: ConflictPolicy::Abort,
            ..Default::default()
        }
    }

    pub(crate) fn marker(&self, ch: char, label: &str) -> String {
        let mut marker = String::from(ch).repeat(self.marker_size.max(1));
        if !label.is_empty() {
            marker.push(' ');
            marker.push_str(label);
        }
        marker
    }
}
