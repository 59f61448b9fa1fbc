//! Error types for the merge crate.

use am_diff::DiffError;

use crate::conflict::{Conflict, Side};

/// Errors that can occur during a three-way merge.
///
/// Apart from [`MergeError::Conflict`], which only surfaces under
/// [`ConflictPolicy::Abort`](crate::ConflictPolicy::Abort), every variant
/// signals a defect in the diff or merge engine rather than a property of
/// the input files.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// Building or validating one of the pairwise diffs failed.
    #[error("diff error: {0}")]
    Diff(#[from] DiffError),

    /// The two diffs do not describe the same base.
    #[error("base has {base} lines but ours covers {ours} and theirs covers {theirs}")]
    BaseLengthMismatch {
        base: usize,
        ours: usize,
        theirs: usize,
    },

    /// More than one insertion is anchored at end-of-file on one side.
    #[error("{side} has {count} end-of-file insertions; at most one is allowed")]
    TrailingBlocks { side: Side, count: usize },

    /// A diff stopped covering the base partway through the walk.
    #[error("{side} diff has no block for base line {line}")]
    Desync { side: Side, line: usize },

    /// Both sides changed the same region and the policy forbids resolving it.
    #[error(
        "unresolved conflict over base lines {}..{}",
        .0.base_range.start,
        .0.base_range.end
    )]
    Conflict(Box<Conflict>),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
