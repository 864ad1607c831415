//! Canonicalization of rich-text values for equality testing.
//!
//! Display text is never normalized; two answers are "the same answer"
//! iff their canonical keys are equal.

/// Canonical form of a rich-text value.
///
/// Line breaks are dropped outright (not replaced by spaces), remaining
/// whitespace runs collapse to single spaces, the result is lower-cased
/// and trimmed.
#[must_use]
pub fn canonical_key(text: &str) -> String {
    let flat: String = text
        .chars()
        .filter(|ch| *ch != '\r' && *ch != '\n')
        .collect();

    flat.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
