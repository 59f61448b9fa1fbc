//! Line-matching heuristics used by the diff engine.
//!
//! Both functions operate on the *remaining* slices of the two sequences
//! and return a cursor relative to the start of those slices.

use std::collections::HashMap;

use crate::indices::Indices;

/// Closing markers that never anchor a match on their own.
const CLOSING_MARKERS: &[&str] = &["}", "]", ")", "};", "},", "],", "),"];

/// Find the extent of an unchanged run.
///
/// Scans both slices in lock-step and returns `(k, k)` where `k` is the
/// first offset at which the lines differ or one slice runs out. Returns
/// [`Indices::END`] when both slices run out together with no difference.
pub fn find_next_difference<S: AsRef<str>>(original: &[S], modified: &[S]) -> Indices {
    let common = original
        .iter()
        .zip(modified)
        .take_while(|&(o, m)| o.as_ref() == m.as_ref())
        .count();

    if common == original.len() && common == modified.len() {
        Indices::END
    } else {
        Indices::new(common, common)
    }
}

/// Find the nearest position where the two slices line up again.
///
/// Tries both directions: the first original line that reappears anywhere
/// in `modified`, and the first modified line that reappears anywhere in
/// `original`. The candidate that comes first in original order wins
/// (ties broken on the modified offset). Lines for which `skip` returns
/// `true` are never used as anchors. Returns [`Indices::END`] if the
/// slices share no usable line.
pub fn find_next_equal<S, F>(original: &[S], modified: &[S], skip: F) -> Indices
where
    S: AsRef<str>,
    F: Fn(&str) -> bool,
{
    let original_at = first_occurrences(original);
    let modified_at = first_occurrences(modified);

    let forward = original
        .iter()
        .map(|line| line.as_ref())
        .enumerate()
        .filter(|(_, line)| !skip(*line))
        .find_map(|(oi, line)| modified_at.get(line).map(|&mj| Indices::new(oi, mj)));

    let backward = modified
        .iter()
        .map(|line| line.as_ref())
        .enumerate()
        .filter(|(_, line)| !skip(*line))
        .find_map(|(mj, line)| original_at.get(line).map(|&oi| Indices::new(oi, mj)));

    match (forward, backward) {
        (Some(f), Some(b)) => f.min(b),
        (Some(found), None) | (None, Some(found)) => found,
        (None, None) => Indices::END,
    }
}

/// Returns `true` for a line that only closes a multi-line record:
/// a bracket terminator or an XML closing tag such as `</data>`.
pub fn is_closing_delimiter(line: &str) -> bool {
    let trimmed = line.trim();
    if CLOSING_MARKERS.contains(&trimmed) {
        return true;
    }
    match trimmed.strip_prefix("</").and_then(|rest| rest.strip_suffix('>')) {
        Some(name) => {
            !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.'))
        }
        None => false,
    }
}

fn first_occurrences<S: AsRef<str>>(lines: &[S]) -> HashMap<&str, usize> {
    let mut positions = HashMap::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        positions.entry(line.as_ref()).or_insert(index);
    }
    positions
}
