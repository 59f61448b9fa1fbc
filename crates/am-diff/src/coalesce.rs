//! Block coalescing: folds neighbouring single-line insertions and
//! deletions into `Changed` blocks.
//!
//! The matcher anchors on single lines, so it often reports a one-line
//! deletion right next to a one-line insertion. Seen as one `Changed`
//! edit, the pair lines up with the other side of a three-way merge
//! instead of producing a spurious conflict.

use crate::block::{Block, BlockKind};

/// Coalesce a raw block list in a single forward pass.
///
/// `Unchanged` blocks pass through and close any open accumulation.
/// Each group of folded blocks keeps the start cursor of its first block.
pub fn coalesce(blocks: Vec<Block>) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    let mut open: Option<Block> = None;

    for block in blocks {
        if block.kind() == BlockKind::Unchanged {
            out.extend(open.take());
            out.push(block);
            continue;
        }

        open = Some(match open.take() {
            Some(acc) if folds(&acc, &block) => fold(acc, block),
            Some(acc) => {
                out.push(acc);
                block
            }
            None => block,
        });
    }

    out.extend(open);
    out
}

/// Whether `next` may be folded into the open accumulator `acc`.
fn folds(acc: &Block, next: &Block) -> bool {
    use BlockKind::*;

    match (acc.kind(), next.kind()) {
        (Added, Removed) | (Added, Changed) => acc.modified_len() == 1,
        (Removed, Added) | (Removed, Changed) => acc.original_len() == 1,
        (Changed, Changed) => true,
        (Changed, Added) => next.modified_len() == 1,
        (Changed, Removed) => next.original_len() == 1,
        _ => false,
    }
}

fn fold(acc: Block, next: Block) -> Block {
    let start = acc.start();
    let (mut original, mut modified) = acc.into_lines();
    let (next_original, next_modified) = next.into_lines();
    original.extend(next_original);
    modified.extend(next_modified);
    Block::changed(start, original, modified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::Indices;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn kinds(blocks: &[Block]) -> Vec<BlockKind> {
        blocks.iter().map(Block::kind).collect()
    }

    #[test]
    fn empty_stays_empty() {
        assert!(coalesce(Vec::new()).is_empty());
    }

    #[test]
    fn single_added_then_removed_becomes_changed() {
        let raw = vec![
            Block::unchanged(Indices::ZERO, lines(&["A"])),
            Block::added(Indices::new(1, 1), lines(&["X"])),
            Block::removed(Indices::new(1, 2), lines(&["B"])),
            Block::unchanged(Indices::new(2, 2), lines(&["C"])),
        ];

        let out = coalesce(raw);
        assert_eq!(
            kinds(&out),
            vec![BlockKind::Unchanged, BlockKind::Changed, BlockKind::Unchanged]
        );
        assert_eq!(out[1].start(), Indices::new(1, 1));
        assert_eq!(out[1].original_lines(), &lines(&["B"])[..]);
        assert_eq!(out[1].modified_lines(), &lines(&["X"])[..]);
    }

    #[test]
    fn single_removed_then_added_becomes_changed() {
        let raw = vec![
            Block::removed(Indices::ZERO, lines(&["B"])),
            Block::added(Indices::new(1, 0), lines(&["X", "Y"])),
        ];

        let out = coalesce(raw);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind(), BlockKind::Changed);
        assert_eq!(out[0].start(), Indices::ZERO);
        assert_eq!(out[0].end(), Indices::new(1, 2));
    }

    #[test]
    fn multi_line_added_does_not_fold() {
        let raw = vec![
            Block::added(Indices::ZERO, lines(&["X", "Y"])),
            Block::removed(Indices::new(0, 2), lines(&["B"])),
        ];

        let out = coalesce(raw);
        assert_eq!(kinds(&out), vec![BlockKind::Added, BlockKind::Removed]);
    }

    #[test]
    fn changed_keeps_accumulating() {
        let raw = vec![
            Block::changed(Indices::ZERO, lines(&["a"]), lines(&["b"])),
            Block::changed(Indices::new(1, 1), lines(&["c"]), lines(&["d"])),
            Block::added(Indices::new(2, 2), lines(&["e"])),
            Block::removed(Indices::new(2, 3), lines(&["f"])),
        ];

        let out = coalesce(raw);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].original_lines(), &lines(&["a", "c", "f"])[..]);
        assert_eq!(out[0].modified_lines(), &lines(&["b", "d", "e"])[..]);
    }

    #[test]
    fn unchanged_closes_accumulation() {
        let raw = vec![
            Block::changed(Indices::ZERO, lines(&["a"]), lines(&["b"])),
            Block::unchanged(Indices::new(1, 1), lines(&["k"])),
            Block::changed(Indices::new(2, 2), lines(&["c"]), lines(&["d"])),
        ];

        let out = coalesce(raw.clone());
        assert_eq!(out, raw);
    }

    #[test]
    fn non_qualifying_block_starts_fresh() {
        let raw = vec![
            Block::changed(Indices::ZERO, lines(&["a"]), lines(&["b"])),
            Block::removed(Indices::new(1, 1), lines(&["c", "d"])),
            Block::added(Indices::new(3, 1), lines(&["e"])),
        ];

        let out = coalesce(raw);
        // The two-line removal closes the change but is itself too long to
        // open a fold, so the trailing insertion stays on its own.
        assert_eq!(
            kinds(&out),
            vec![BlockKind::Changed, BlockKind::Removed, BlockKind::Added]
        );
    }
}
