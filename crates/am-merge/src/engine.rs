//! Three-way merge over two diffs that share a base.
//!
//! The walk keeps one forward-only cursor over base lines and one block
//! cursor per side. Each step either emits pending insertions anchored at
//! the current base line, advances by one line, or jumps past whatever
//! block(s) it just resolved so both sides stay synchronised on the same
//! base line.
//!
//! # Resolution rules
//!
//! | ours | theirs | result |
//! |---|---|---|
//! | Unchanged | Unchanged | base line |
//! | Removed / Unchanged | Unchanged / Removed | nothing |
//! | Added | Unchanged | our insertion, before the base line |
//! | Unchanged | Added | their insertion, before the base line |
//! | Added | Added | once if identical, else both in [`InsertionOrder`] |
//! | Changed | Unchanged | our change, if it fits inside their unchanged run |
//! | Unchanged | Changed | their change, if it fits inside our unchanged run |
//! | Changed | Changed | the change once, if both are identical |
//!
//! Anything else is a conflict handled by the configured [`ConflictPolicy`].
//! An insertion anchored at a line the other side changes or removes opens
//! a conflict at the anchor.

use std::ops::Range;

use am_diff::{Block, BlockKind, Diff};
use tracing::{debug, trace, warn};

use crate::config::{ConflictPolicy, InsertionOrder, MergeConfig};
use crate::conflict::{Conflict, MergeOutcome, Side};
use crate::error::{MergeError, MergeResult};

/// Merge `ours` and `theirs` against their common `base` with the default
/// configuration.
pub fn merge<S: AsRef<str>>(ours: &[S], base: &[S], theirs: &[S]) -> MergeResult<MergeOutcome> {
    Merger::default().merge(ours, base, theirs)
}

/// Three-way line merger.
#[derive(Clone, Debug, Default)]
pub struct Merger {
    config: MergeConfig,
}

impl Merger {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Diff both sides against `base` and merge the result.
    pub fn merge<S: AsRef<str>>(
        &self,
        ours: &[S],
        base: &[S],
        theirs: &[S],
    ) -> MergeResult<MergeOutcome> {
        let ours_diff = Diff::make_with(base, ours, &self.config.diff)?;
        let theirs_diff = Diff::make_with(base, theirs, &self.config.diff)?;
        self.merge_diffs(base, &ours_diff, &theirs_diff)
    }

    /// Merge two precomputed diffs of the same `base`.
    pub fn merge_diffs<S: AsRef<str>>(
        &self,
        base: &[S],
        ours: &Diff,
        theirs: &Diff,
    ) -> MergeResult<MergeOutcome> {
        if ours.original_len() != base.len() || theirs.original_len() != base.len() {
            return Err(MergeError::BaseLengthMismatch {
                base: base.len(),
                ours: ours.original_len(),
                theirs: theirs.original_len(),
            });
        }
        check_trailing(Side::Ours, ours, base.len())?;
        check_trailing(Side::Theirs, theirs, base.len())?;

        let outcome = Walk {
            config: &self.config,
            base,
            ours: Track::new(Side::Ours, ours.blocks()),
            theirs: Track::new(Side::Theirs, theirs.blocks()),
            line: 0,
            lines: Vec::with_capacity(base.len()),
            conflicts: Vec::new(),
        }
        .run()?;

        debug!(
            base_lines = base.len(),
            merged_lines = outcome.lines.len(),
            conflicts = outcome.conflicts.len(),
            "merge finished"
        );
        Ok(outcome)
    }
}

/// At most one insertion per side may sit at or past the last base line.
fn check_trailing(side: Side, diff: &Diff, base_len: usize) -> MergeResult<()> {
    let count = diff
        .blocks()
        .iter()
        .filter(|b| b.kind() == BlockKind::Added && b.original_range().start >= base_len)
        .count();
    if count > 1 {
        return Err(MergeError::TrailingBlocks { side, count });
    }
    Ok(())
}

/// Block cursor over one side's diff.
struct Track<'a> {
    side: Side,
    blocks: &'a [Block],
    next: usize,
}

impl<'a> Track<'a> {
    fn new(side: Side, blocks: &'a [Block]) -> Self {
        Self {
            side,
            blocks,
            next: 0,
        }
    }

    /// Skip every block that lies wholly before base line `line`.
    fn settle(&mut self, line: usize) {
        while let Some(block) = self.blocks.get(self.next) {
            let range = block.original_range();
            let consumed = match block.kind() {
                BlockKind::Added => range.start < line,
                _ => range.end <= line,
            };
            if !consumed {
                break;
            }
            self.next += 1;
        }
    }

    fn current(&self) -> Option<&'a Block> {
        self.blocks.get(self.next)
    }

    /// The insertion anchored at `line`, if it is up next.
    fn insertion_at(&self, line: usize) -> Option<&'a Block> {
        self.current()
            .filter(|b| b.kind() == BlockKind::Added && b.original_range().start == line)
    }

    /// The block covering the current base line.
    fn covering(&self, line: usize) -> MergeResult<&'a Block> {
        self.current().ok_or_else(|| self.desync(line))
    }

    /// Whether an insertion from the other side may land before `line`
    /// without touching an edit of this side.
    fn leaves_intact(&self) -> bool {
        self.current()
            .map_or(true, |b| b.kind() == BlockKind::Unchanged)
    }

    fn advance(&mut self) {
        self.next += 1;
    }

    fn desync(&self, line: usize) -> MergeError {
        MergeError::Desync {
            side: self.side,
            line,
        }
    }

    /// Grow `end` until no pending edit of this side straddles it.
    fn reach(&self, end: usize) -> usize {
        let mut end = end;
        for block in &self.blocks[self.next..] {
            let range = block.original_range();
            if range.start >= end {
                break;
            }
            if matches!(block.kind(), BlockKind::Changed | BlockKind::Removed) {
                end = end.max(range.end);
            }
        }
        end
    }

    /// This side's text for the base region `region`.
    fn project<S: AsRef<str>>(&self, base: &[S], region: &Range<usize>) -> Vec<String> {
        let mut out = Vec::new();
        for block in &self.blocks[self.next..] {
            let range = block.original_range();
            if range.start >= region.end {
                break;
            }
            match block.kind() {
                BlockKind::Added if range.start >= region.start => {
                    out.extend(block.modified_lines().iter().cloned());
                }
                BlockKind::Unchanged => {
                    let lo = range.start.max(region.start);
                    let hi = range.end.min(region.end);
                    if lo < hi {
                        out.extend(base[lo..hi].iter().map(|l| l.as_ref().to_owned()));
                    }
                }
                BlockKind::Changed => out.extend(block.modified_lines().iter().cloned()),
                BlockKind::Added | BlockKind::Removed => {}
            }
        }
        out
    }
}

struct Walk<'a, S> {
    config: &'a MergeConfig,
    base: &'a [S],
    ours: Track<'a>,
    theirs: Track<'a>,
    line: usize,
    lines: Vec<String>,
    conflicts: Vec<Conflict>,
}

impl<'a, S: AsRef<str>> Walk<'a, S> {
    fn run(mut self) -> MergeResult<MergeOutcome> {
        loop {
            self.ours.settle(self.line);
            self.theirs.settle(self.line);

            match (
                self.ours.insertion_at(self.line),
                self.theirs.insertion_at(self.line),
            ) {
                (Some(ours), Some(theirs)) => {
                    self.insert_both(ours, theirs);
                    self.ours.advance();
                    self.theirs.advance();
                    continue;
                }
                (Some(ours), None) if self.theirs.leaves_intact() => {
                    trace!(line = self.line, lines = ours.modified_len(), "ours inserts");
                    self.emit(ours.modified_lines());
                    self.ours.advance();
                    continue;
                }
                (None, Some(theirs)) if self.ours.leaves_intact() => {
                    trace!(line = self.line, lines = theirs.modified_len(), "theirs inserts");
                    self.emit(theirs.modified_lines());
                    self.theirs.advance();
                    continue;
                }
                (Some(ours), None) => {
                    let theirs = self.theirs.covering(self.line)?;
                    self.conflict(ours, theirs)?;
                    continue;
                }
                (None, Some(theirs)) => {
                    let ours = self.ours.covering(self.line)?;
                    self.conflict(ours, theirs)?;
                    continue;
                }
                (None, None) => {}
            }

            if self.line >= self.base.len() {
                if self.ours.current().is_some() {
                    return Err(self.ours.desync(self.line));
                }
                if self.theirs.current().is_some() {
                    return Err(self.theirs.desync(self.line));
                }
                break;
            }

            let ours = self.ours.covering(self.line)?;
            let theirs = self.theirs.covering(self.line)?;
            self.resolve(ours, theirs)?;
        }

        Ok(MergeOutcome {
            lines: self.lines,
            conflicts: self.conflicts,
        })
    }

    /// Resolve the two blocks covering the current base line.
    fn resolve(&mut self, ours: &Block, theirs: &Block) -> MergeResult<()> {
        use BlockKind::*;

        let line = self.line;
        let starts_here = |b: &Block| b.original_range().start == line;

        match (ours.kind(), theirs.kind()) {
            (Unchanged, Unchanged) => {
                self.lines.push(self.base[line].as_ref().to_owned());
                self.line += 1;
            }
            (Removed, Unchanged) | (Unchanged, Removed) | (Removed, Removed) => {
                self.line += 1;
            }
            (Changed, Changed)
                if starts_here(ours) && starts_here(theirs) && ours.same_edit(theirs) =>
            {
                trace!(line, "identical change on both sides");
                self.emit(ours.modified_lines());
                self.line = ours.original_range().end;
            }
            (Unchanged, Changed)
                if starts_here(theirs) && theirs.original_range().end <= ours.original_range().end =>
            {
                trace!(line, "theirs changes");
                self.emit(theirs.modified_lines());
                self.line = theirs.original_range().end;
            }
            (Changed, Unchanged)
                if starts_here(ours) && ours.original_range().end <= theirs.original_range().end =>
            {
                trace!(line, "ours changes");
                self.emit(ours.modified_lines());
                self.line = ours.original_range().end;
            }
            (Added, _) => return Err(self.ours.desync(line)),
            (_, Added) => return Err(self.theirs.desync(line)),
            _ => self.conflict(ours, theirs)?,
        }
        Ok(())
    }

    /// Two insertions at the same anchor: identical ones collapse, others
    /// are both kept.
    fn insert_both(&mut self, ours: &Block, theirs: &Block) {
        if ours.same_edit(theirs) {
            trace!(line = self.line, "identical insertion on both sides");
            self.emit(ours.modified_lines());
            return;
        }

        trace!(line = self.line, order = ?self.config.insertion_order, "both sides insert");
        let (first, second) = match self.config.insertion_order {
            InsertionOrder::OursFirst => (ours, theirs),
            InsertionOrder::TheirsFirst => (theirs, ours),
        };
        self.emit(first.modified_lines());
        self.emit(second.modified_lines());
    }

    fn conflict(&mut self, ours: &Block, theirs: &Block) -> MergeResult<()> {
        let start = self.line;
        let mut end = ours
            .original_range()
            .end
            .max(theirs.original_range().end)
            .max(start + 1);
        loop {
            let grown = self.ours.reach(end).max(self.theirs.reach(end));
            if grown == end {
                break;
            }
            end = grown;
        }

        let region = start..end;
        let conflict = Conflict {
            base: self.base[region.clone()]
                .iter()
                .map(|l| l.as_ref().to_owned())
                .collect(),
            ours: self.ours.project(self.base, &region),
            theirs: self.theirs.project(self.base, &region),
            base_range: region,
        };
        warn!(
            start,
            end,
            ours = ?ours.kind(),
            theirs = ?theirs.kind(),
            policy = ?self.config.conflict_policy,
            "conflicting edits"
        );

        match self.config.conflict_policy {
            ConflictPolicy::Abort => return Err(MergeError::Conflict(Box::new(conflict))),
            ConflictPolicy::Markers => {
                let open = self.config.marker('<', &self.config.ours_label);
                let middle = self.config.marker('=', "");
                let close = self.config.marker('>', &self.config.theirs_label);
                self.lines.push(open);
                self.lines.extend(conflict.ours.iter().cloned());
                self.lines.push(middle);
                self.lines.extend(conflict.theirs.iter().cloned());
                self.lines.push(close);
            }
            ConflictPolicy::Ours => self.lines.extend(conflict.ours.iter().cloned()),
            ConflictPolicy::Theirs => self.lines.extend(conflict.theirs.iter().cloned()),
        }

        self.conflicts.push(conflict);
        self.line = end;
        Ok(())
    }

    fn emit(&mut self, lines: &[String]) {
        self.lines.extend(lines.iter().cloned());
    }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    fn sequence() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-e]", 0..20)
    }

    proptest! {
        #[test]
        fn merging_identical_copies_returns_base(base in sequence()) {
            let outcome = merge(&base, &base, &base).unwrap();
            prop_assert!(outcome.is_clean());
            prop_assert_eq!(outcome.lines, base);
        }

        #[test]
        fn one_sided_change_from_ours(ours in sequence(), base in sequence()) {
            let outcome = merge(&ours, &base, &base).unwrap();
            prop_assert!(outcome.is_clean());
            prop_assert_eq!(outcome.lines, ours);
        }

        #[test]
        fn one_sided_change_from_theirs(base in sequence(), theirs in sequence()) {
            let outcome = merge(&base, &base, &theirs).unwrap();
            prop_assert!(outcome.is_clean());
            prop_assert_eq!(outcome.lines, theirs);
        }
    }
}
