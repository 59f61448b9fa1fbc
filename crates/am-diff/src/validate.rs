//! Structural invariants of a finished diff.
//!
//! # Invariants
//!
//! - The blocks consume every original line exactly once.
//! - No block ends before it starts.
//! - Blocks are in non-decreasing start order, and each block starts on
//!   the original line where its predecessor ends. `Added` blocks are
//!   exempt from the second rule: they annotate an anchor line rather than
//!   consume it.
//!
//! A violation means the diff engine itself is broken.

use crate::block::{Block, BlockKind};
use crate::engine::Diff;
use crate::error::{DiffError, DiffResult};

/// Check a diff against a base of `base_len` lines.
pub fn validate(base_len: usize, diff: &Diff) -> DiffResult<()> {
    validate_blocks(base_len, diff.blocks())
}

/// Check a raw block list against a base of `base_len` lines.
pub fn validate_blocks(base_len: usize, blocks: &[Block]) -> DiffResult<()> {
    let covered: usize = blocks.iter().map(Block::original_len).sum();
    if covered != base_len {
        return Err(DiffError::CoverageMismatch {
            expected: base_len,
            covered,
        });
    }

    // Unreachable through the `Block` constructors, which derive `end` from
    // non-negative lengths. Kept so every validated list is checked for it.
    for (index, block) in blocks.iter().enumerate() {
        if block.end() < block.start() {
            return Err(DiffError::InvertedBlock {
                index,
                start: block.start(),
                end: block.end(),
            });
        }
    }

    for (offset, pair) in blocks.windows(2).enumerate() {
        let (previous, next) = (&pair[0], &pair[1]);
        let index = offset + 1;

        if next.start() < previous.start() {
            return Err(DiffError::OutOfOrder {
                index,
                previous: previous.start(),
                start: next.start(),
            });
        }

        let anchored = previous.kind() == BlockKind::Added || next.kind() == BlockKind::Added;
        if !anchored && next.start().original != previous.end().original {
            return Err(DiffError::Discontinuous {
                index,
                expected: previous.end().original,
                found: next.start().original,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::{Indices, Offset};

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_diff_of_empty_base_is_valid() {
        assert_eq!(validate_blocks(0, &[]), Ok(()));
    }

    #[test]
    fn well_formed_blocks_pass() {
        let blocks = vec![
            Block::unchanged(Indices::ZERO, lines(&["A"])),
            Block::added(Indices::new(1, 1), lines(&["X"])),
            Block::removed(Indices::new(1, 2), lines(&["B"])),
            Block::unchanged(Indices::new(2, 2), lines(&["C"])),
        ];
        assert_eq!(validate_blocks(3, &blocks), Ok(()));
    }

    #[test]
    fn coverage_is_checked_first() {
        let blocks = vec![Block::unchanged(Indices::ZERO, lines(&["A"]))];
        assert_eq!(
            validate_blocks(2, &blocks),
            Err(DiffError::CoverageMismatch {
                expected: 2,
                covered: 1
            })
        );
    }

    #[test]
    fn gap_between_blocks_is_rejected() {
        let blocks = vec![
            Block::unchanged(Indices::ZERO, lines(&["A"])),
            Block::unchanged(Indices::new(2, 1), lines(&["C"])),
        ];
        assert_eq!(
            validate_blocks(2, &blocks),
            Err(DiffError::Discontinuous {
                index: 1,
                expected: Offset::At(1),
                found: Offset::At(2),
            })
        );
    }

    #[test]
    fn added_blocks_may_share_an_anchor() {
        let blocks = vec![
            Block::added(Indices::ZERO, lines(&["X"])),
            Block::unchanged(Indices::new(0, 1), lines(&["A"])),
            Block::added(Indices::new(1, 2), lines(&["Y"])),
        ];
        assert_eq!(validate_blocks(1, &blocks), Ok(()));
    }

    #[test]
    fn out_of_order_blocks_are_rejected() {
        let blocks = vec![
            Block::removed(Indices::new(1, 0), lines(&["B"])),
            Block::added(Indices::new(0, 0), lines(&["X"])),
            Block::removed(Indices::new(2, 1), lines(&["C"])),
        ];
        assert!(matches!(
            validate_blocks(2, &blocks),
            Err(DiffError::OutOfOrder { index: 1, .. })
        ));
    }
}
