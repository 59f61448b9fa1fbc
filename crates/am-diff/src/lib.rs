//! Diff engine for assetmerge.
//!
//! Turns two line sequences into an ordered list of classified edit
//! blocks that partition the original sequence.
//!
//! # Key Types
//!
//! - [`Indices`] / [`Offset`] -- cursor pair with an end-of-sequence sentinel
//! - [`Block`] / [`BlockKind`] -- one maximal run of an edit classification
//! - [`Diff`] -- validated block list built by [`Diff::make`]
//! - [`DiffOptions`] -- delimiter handling for the matcher
//!
//! The pipeline is: matcher ([`find_next_equal`], [`find_next_difference`])
//! → [`coalesce`] → [`validate`].

pub mod block;
pub mod coalesce;
pub mod engine;
pub mod error;
pub mod indices;
pub mod matching;
pub mod options;
pub mod validate;

pub use block::{Block, BlockKind};
pub use coalesce::coalesce;
pub use engine::Diff;
pub use error::{DiffError, DiffResult};
pub use indices::{Indices, Offset};
pub use matching::{find_next_difference, find_next_equal, is_closing_delimiter};
pub use options::DiffOptions;
pub use validate::{validate, validate_blocks};
