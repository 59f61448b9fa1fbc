//! Error types for the diff crate.

use crate::indices::{Indices, Offset};

/// Errors that can occur while building or querying a diff.
///
/// Everything except [`DiffError::LineOutOfRange`] is an internal
/// consistency failure of the diff engine, not a property of the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// Blocks do not account for every original line exactly once.
    #[error("diff covers {covered} original lines but the base has {expected}")]
    CoverageMismatch { expected: usize, covered: usize },

    /// A block's end cursor precedes its start cursor.
    #[error("block {index} ends at {end} before its start {start}")]
    InvertedBlock {
        index: usize,
        start: Indices,
        end: Indices,
    },

    /// Two neighbouring blocks leave a gap or overlap in the original sequence.
    #[error("block {index} starts at original line {found} but the previous block ends at {expected}")]
    Discontinuous {
        index: usize,
        expected: Offset,
        found: Offset,
    },

    /// A block starts before its predecessor.
    #[error("block {index} at {start} precedes the previous block at {previous}")]
    OutOfOrder {
        index: usize,
        previous: Indices,
        start: Indices,
    },

    /// No block consumes the requested original line.
    #[error("no block covers original line {line} (base has {len} lines)")]
    LineOutOfRange { line: usize, len: usize },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
