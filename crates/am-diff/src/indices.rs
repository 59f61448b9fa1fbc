//! Cursor types: a pair of positions into the original and modified line
//! sequences, with an explicit end-of-sequence sentinel.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// A position inside one line sequence, or the end-of-sequence sentinel.
///
/// Combining `End` with anything yields `End`. `At(_)` always orders
/// before `End`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Offset {
    /// A concrete zero-based line offset.
    At(usize),
    /// No position: the sequence is exhausted.
    End,
}

impl Offset {
    /// The concrete offset, or `None` for the sentinel.
    pub fn index(self) -> Option<usize> {
        match self {
            Offset::At(i) => Some(i),
            Offset::End => None,
        }
    }

    /// Returns `true` for the sentinel.
    pub fn is_end(self) -> bool {
        matches!(self, Offset::End)
    }

    /// Map the sentinel onto a concrete sequence length.
    pub fn resolve(self, len: usize) -> usize {
        match self {
            Offset::At(i) => i,
            Offset::End => len,
        }
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        match (self, rhs) {
            (Offset::At(a), Offset::At(b)) => Offset::At(a.saturating_add(b)),
            _ => Offset::End,
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::At(i) => write!(f, "{i}"),
            Offset::End => f.write_str("end"),
        }
    }
}

/// An ordered `(original, modified)` position pair.
///
/// Ordering is lexicographic: `original` first, then `modified`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Indices {
    pub original: Offset,
    pub modified: Offset,
}

impl Indices {
    /// The start cursor.
    pub const ZERO: Indices = Indices::new(0, 0);

    /// The terminal cursor: both sides exhausted.
    pub const END: Indices = Indices {
        original: Offset::End,
        modified: Offset::End,
    };

    /// Cursor at concrete offsets on both sides.
    pub const fn new(original: usize, modified: usize) -> Self {
        Self {
            original: Offset::At(original),
            modified: Offset::At(modified),
        }
    }

    /// Returns `true` if this is exactly [`Indices::END`].
    pub fn is_end(&self) -> bool {
        self.original.is_end() && self.modified.is_end()
    }

    /// Resolve both components against the sequence lengths.
    pub fn resolve(&self, original_len: usize, modified_len: usize) -> (usize, usize) {
        (
            self.original.resolve(original_len),
            self.modified.resolve(modified_len),
        )
    }
}

impl Default for Indices {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Indices {
    type Output = Indices;

    fn add(self, rhs: Indices) -> Indices {
        Indices {
            original: self.original + rhs.original,
            modified: self.modified + rhs.modified,
        }
    }
}

impl fmt::Display for Indices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.original, self.modified)
    }
}
