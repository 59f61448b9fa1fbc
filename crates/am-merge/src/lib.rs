//! Merge engine for assetmerge.
//!
//! Combines two diffs computed against the same base into one merged line
//! sequence. Non-overlapping edits from both sides are kept; overlapping
//! incompatible edits become [`Conflict`]s handled by a [`ConflictPolicy`].
//!
//! # Key Types
//!
//! - [`Merger`] / [`merge`] -- three-way merge entry points
//! - [`MergeConfig`] -- conflict policy, insertion order, marker layout
//! - [`MergeOutcome`] / [`Conflict`] -- merged lines and conflict records

pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;

pub use config::{ConflictPolicy, InsertionOrder, MergeConfig};
pub use conflict::{Conflict, MergeOutcome, Side};
pub use engine::{merge, Merger};
pub use error::{MergeError, MergeResult};
