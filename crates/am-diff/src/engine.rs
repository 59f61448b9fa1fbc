//! The pairwise diff engine.
//!
//! Walks both sequences with a single cursor, alternating between
//! unchanged runs (lines equal in lock-step) and divergent runs (bounded
//! by the nearest line that reappears on the other side). The raw block
//! list is then coalesced and validated.
//!
//! The matcher is a greedy nearest-match heuristic, not a minimal edit
//! script. Swapping two lines, for instance, is reported as an insertion
//! plus a deletion rather than a single two-line change.

use serde::Serialize;
use tracing::debug;

use crate::block::{Block, BlockKind};
use crate::coalesce::coalesce;
use crate::error::{DiffError, DiffResult};
use crate::indices::Indices;
use crate::matching::{find_next_difference, find_next_equal};
use crate::options::DiffOptions;
use crate::validate::validate;

/// The classified difference between an original and a modified sequence.
///
/// Built once by [`Diff::make`] and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Diff {
    blocks: Vec<Block>,
}

impl Diff {
    /// Diff two line sequences with default options.
    pub fn make<S: AsRef<str>>(base: &[S], modified: &[S]) -> DiffResult<Self> {
        Self::make_with(base, modified, &DiffOptions::default())
    }

    /// Diff two line sequences.
    ///
    /// Fails only if the produced block list breaks a structural
    /// invariant, which indicates a defect in the engine.
    pub fn make_with<S: AsRef<str>>(
        base: &[S],
        modified: &[S],
        options: &DiffOptions,
    ) -> DiffResult<Self> {
        let raw = raw_blocks(base, modified, options);
        let raw_count = raw.len();
        let diff = Diff {
            blocks: coalesce(raw),
        };
        validate(base.len(), &diff)?;

        debug!(
            base_lines = base.len(),
            modified_lines = modified.len(),
            raw_blocks = raw_count,
            blocks = diff.blocks.len(),
            "diff built"
        );
        Ok(diff)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total original lines consumed by the blocks.
    pub fn original_len(&self) -> usize {
        self.blocks.iter().map(Block::original_len).sum()
    }

    /// Total modified lines produced by the blocks.
    pub fn modified_len(&self) -> usize {
        self.blocks.iter().map(Block::modified_len).sum()
    }

    /// Returns `true` if the modified sequence equals the original.
    pub fn is_identity(&self) -> bool {
        self.blocks
            .iter()
            .all(|b| b.kind() == BlockKind::Unchanged)
    }

    /// Lines introduced by the modified side (added or changed-to).
    pub fn additions(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b.kind(), BlockKind::Added | BlockKind::Changed))
            .map(Block::modified_len)
            .sum()
    }

    /// Original lines dropped by the modified side (removed or changed-from).
    pub fn deletions(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b.kind(), BlockKind::Removed | BlockKind::Changed))
            .map(Block::original_len)
            .sum()
    }

    /// The block consuming original line `line`.
    ///
    /// `Added` blocks consume no original line and are never returned.
    pub fn block_at(&self, line: usize) -> DiffResult<&Block> {
        self.block_index_at(line).map(|index| &self.blocks[index])
    }

    /// Position in [`Diff::blocks`] of the block consuming original line `line`.
    pub fn block_index_at(&self, line: usize) -> DiffResult<usize> {
        self.blocks
            .iter()
            .position(|b| b.original_range().contains(&line))
            .ok_or(DiffError::LineOutOfRange {
                line,
                len: self.original_len(),
            })
    }

    /// Rebuild the modified sequence from the blocks.
    pub fn modified_lines(&self) -> Vec<String> {
        self.blocks
            .iter()
            .flat_map(|b| b.modified_lines().iter().cloned())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Diff {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Produce the uncoalesced block list.
fn raw_blocks<S: AsRef<str>>(base: &[S], modified: &[S], options: &DiffOptions) -> Vec<Block> {
    match (base.is_empty(), modified.is_empty()) {
        (true, true) => return Vec::new(),
        (true, false) => return vec![Block::added(Indices::ZERO, to_owned(modified))],
        (false, true) => return vec![Block::removed(Indices::ZERO, to_owned(base))],
        (false, false) => {}
    }

    let mut blocks = Vec::new();
    let mut current = Indices::ZERO;

    while !current.is_end() {
        let (o, m) = current.resolve(base.len(), modified.len());
        if o >= base.len() && m >= modified.len() {
            break;
        }
        let (rest_base, rest_modified) = (&base[o..], &modified[m..]);

        let in_step = match (rest_base.first(), rest_modified.first()) {
            (Some(b), Some(d)) => b.as_ref() == d.as_ref(),
            _ => false,
        };

        let step = if in_step {
            find_next_difference(rest_base, rest_modified)
        } else {
            find_next_equal(rest_base, rest_modified, |line| options.is_skipped(line))
        };
        let next = current + step;
        let (next_o, next_m) = next.resolve(base.len(), modified.len());

        let original = to_owned(&base[o..next_o]);
        let changed = to_owned(&modified[m..next_m]);

        let block = if in_step {
            Block::unchanged(current, original)
        } else if original.is_empty() {
            Block::added(current, changed)
        } else if changed.is_empty() {
            Block::removed(current, original)
        } else {
            Block::changed(current, original, changed)
        };
        blocks.push(block);

        current = next;
    }

    blocks
}

fn to_owned<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines.iter().map(|l| l.as_ref().to_owned()).collect()
}
