//! Free-text region name canonicalization.
//!
//! The pipeline:
//! 1. Lowercase, trim, collapse internal whitespace
//! 2. Exact alias lookup
//! 3. Substring overlap against the alias table (first hit in table order)
//! 4. Substring overlap against the canonical names themselves
//! 5. Title-cased echo of the cleaned input

use std::sync::LazyLock;

use regex::Regex;

use crate::{VALID_STATES, aliases, is_canonical};

/// Regex to collapse runs of whitespace into a single space.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

fn clean(input: &str) -> String {
    WHITESPACE_RE
        .replace_all(input.trim(), " ")
        .to_lowercase()
}

/// Upper-cases the first character of every space-separated word.
///
/// The remainder of each word is left untouched.
#[must_use]
pub fn title_case(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Maps free-text region input to a canonical state/UT name.
///
/// Returns an empty string for empty or whitespace-only input. When no
/// alias or canonical name overlaps the input, the title-cased input is
/// returned as-is; that value is generally *not* a member of
/// [`VALID_STATES`], so callers that group by region must filter with
/// [`is_canonical`].
#[must_use]
pub fn normalize_state_name(input: &str) -> String {
    let cleaned = clean(input);
    if cleaned.is_empty() {
        return String::new();
    }

    if let Some(canonical) = aliases::lookup(&cleaned) {
        return canonical.to_string();
    }

    if let Some(canonical) = aliases::find_overlapping(&cleaned) {
        return canonical.to_string();
    }

    for valid in VALID_STATES {
        let lower = valid.to_lowercase();
        if lower.contains(&cleaned) || cleaned.contains(&lower) {
            return (*valid).to_string();
        }
    }

    title_case(&cleaned)
}

/// Returns `true` if `input` normalizes to one of the canonical names.
#[must_use]
pub fn is_valid_state(input: &str) -> bool {
    is_canonical(&normalize_state_name(input))
}
