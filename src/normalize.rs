//! Text normalization for artist/title matching.
//!
//! Every comparison between the two song lists goes through this module, so
//! both sides of a match are always reduced by the same rules.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ComparisonKey;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Annotations in parentheses or brackets: "(feat. X)", "[Remastered]".
/// Opener and closer may be of either kind; matching is non-greedy and does not nest.
static ANNOTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\(\[].*?[\)\]]").unwrap());

/// Anything that is not a lowercase ASCII letter, ASCII digit or whitespace.
/// The ASCII information separators U+001C..U+001F count as whitespace.
static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s\x1C-\x1F]").unwrap());

/// Separator between the artist and title halves of a comparison key.
/// Normalized fields never contain '|', so the key is unambiguous.
pub const KEY_SEPARATOR: &str = "||";

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Reduce free text to its canonical comparison form.
///
/// Steps (order matters):
/// 1. Lowercase
/// 2. Drop bracketed/parenthesized annotations including delimiters
/// 3. Drop every character outside `[a-z0-9]` and whitespace
/// 4. Collapse whitespace runs to one space and trim
///
/// The result contains only lowercase ASCII letters, digits and single spaces.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_annotations = ANNOTATION.replace_all(&lowered, "");
    let alnum_only = NON_ALNUM.replace_all(&without_annotations, "");
    alnum_only
        .split(is_space)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1C}'..='\u{1F}').contains(&c)
}

/// Normalize a possibly-missing cell value. Missing values normalize to "".
pub fn normalize_value(value: Option<&str>) -> String {
    value.map(normalize_text).unwrap_or_default()
}

/// Build the comparison key for an (artist, title) pair.
pub fn comparison_key(artist: Option<&str>, title: Option<&str>) -> ComparisonKey {
    let mut key = normalize_value(artist);
    key.push_str(KEY_SEPARATOR);
    key.push_str(&normalize_value(title));
    ComparisonKey(key)
}

// ============================================================================
// TESTS
// ============================================================================
