#![allow(clippy::too_many_lines)]
//! Alias table for Indian state and union territory names.
//!
//! Maps lower-cased spellings (full names, vehicle-registration style
//! codes, historical names and common misspellings) to the canonical
//! display name. The table is an ordered slice: substring matching walks
//! it front to back and the first hit wins.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Ordered `(alias, canonical)` pairs.
pub const STATE_ALIASES: &[(&str, &str)] = &[
    // ── States ───────────────────────────────────────────
    ("andhra pradesh", "Andhra Pradesh"),
    ("ap", "Andhra Pradesh"),
    ("arunachal pradesh", "Arunachal Pradesh"),
    ("ar", "Arunachal Pradesh"),
    ("assam", "Assam"),
    ("as", "Assam"),
    ("bihar", "Bihar"),
    ("br", "Bihar"),
    ("chhattisgarh", "Chhattisgarh"),
    ("chattisgarh", "Chhattisgarh"),
    ("cg", "Chhattisgarh"),
    ("ct", "Chhattisgarh"),
    ("goa", "Goa"),
    ("ga", "Goa"),
    ("gujarat", "Gujarat"),
    ("gj", "Gujarat"),
    ("haryana", "Haryana"),
    ("hr", "Haryana"),
    ("himachal pradesh", "Himachal Pradesh"),
    ("hp", "Himachal Pradesh"),
    ("jharkhand", "Jharkhand"),
    ("jh", "Jharkhand"),
    ("karnataka", "Karnataka"),
    ("ka", "Karnataka"),
    ("kerala", "Kerala"),
    ("kl", "Kerala"),
    ("madhya pradesh", "Madhya Pradesh"),
    ("mp", "Madhya Pradesh"),
    ("maharashtra", "Maharashtra"),
    ("mh", "Maharashtra"),
    ("manipur", "Manipur"),
    ("mn", "Manipur"),
    ("meghalaya", "Meghalaya"),
    ("ml", "Meghalaya"),
    ("mizoram", "Mizoram"),
    ("mz", "Mizoram"),
    ("nagaland", "Nagaland"),
    ("nl", "Nagaland"),
    ("odisha", "Odisha"),
    ("orissa", "Odisha"),
    ("od", "Odisha"),
    ("or", "Odisha"),
    ("punjab", "Punjab"),
    ("pb", "Punjab"),
    ("rajasthan", "Rajasthan"),
    ("rj", "Rajasthan"),
    ("sikkim", "Sikkim"),
    ("sk", "Sikkim"),
    ("tamil nadu", "Tamil Nadu"),
    ("tamilnadu", "Tamil Nadu"),
    ("tn", "Tamil Nadu"),
    ("telangana", "Telangana"),
    ("tg", "Telangana"),
    ("ts", "Telangana"),
    ("tripura", "Tripura"),
    ("tr", "Tripura"),
    ("uttar pradesh", "Uttar Pradesh"),
    ("uttarpradesh", "Uttar Pradesh"),
    ("up", "Uttar Pradesh"),
    ("uttarakhand", "Uttarakhand"),
    ("uttaranchal", "Uttarakhand"),
    ("uk", "Uttarakhand"),
    ("ut", "Uttarakhand"),
    ("west bengal", "West Bengal"),
    ("westbengal", "West Bengal"),
    ("wb", "West Bengal"),
    // ── Union territories ────────────────────────────────
    ("andaman and nicobar islands", "Andaman and Nicobar Islands"),
    ("andaman and nicobar", "Andaman and Nicobar Islands"),
    ("andaman & nicobar islands", "Andaman and Nicobar Islands"),
    ("andaman & nicobar", "Andaman and Nicobar Islands"),
    ("a&n islands", "Andaman and Nicobar Islands"),
    ("an", "Andaman and Nicobar Islands"),
    ("chandigarh", "Chandigarh"),
    ("ch", "Chandigarh"),
    (
        "dadra and nagar haveli and daman and diu",
        "Dadra and Nagar Haveli and Daman and Diu",
    ),
    (
        "dadra and nagar haveli",
        "Dadra and Nagar Haveli and Daman and Diu",
    ),
    (
        "dadra & nagar haveli",
        "Dadra and Nagar Haveli and Daman and Diu",
    ),
    ("daman and diu", "Dadra and Nagar Haveli and Daman and Diu"),
    ("daman & diu", "Dadra and Nagar Haveli and Daman and Diu"),
    ("dnhdd", "Dadra and Nagar Haveli and Daman and Diu"),
    ("dn", "Dadra and Nagar Haveli and Daman and Diu"),
    ("dd", "Dadra and Nagar Haveli and Daman and Diu"),
    ("delhi", "Delhi"),
    ("nct of delhi", "Delhi"),
    ("new delhi", "Delhi"),
    ("dl", "Delhi"),
    ("jammu and kashmir", "Jammu and Kashmir"),
    ("jammu & kashmir", "Jammu and Kashmir"),
    ("j&k", "Jammu and Kashmir"),
    ("jk", "Jammu and Kashmir"),
    ("ladakh", "Ladakh"),
    ("la", "Ladakh"),
    ("lakshadweep", "Lakshadweep"),
    ("ld", "Lakshadweep"),
    ("puducherry", "Puducherry"),
    ("pondicherry", "Puducherry"),
    ("py", "Puducherry"),
];

/// Exact-match index over [`STATE_ALIASES`].
static ALIAS_INDEX: LazyLock<BTreeMap<&'static str, &'static str>> =
    LazyLock::new(|| STATE_ALIASES.iter().copied().collect());

/// Looks up an already-cleaned (lower-cased, whitespace-collapsed) alias.
#[must_use]
pub fn lookup(cleaned: &str) -> Option<&'static str> {
    ALIAS_INDEX.get(cleaned).copied()
}

/// Returns the canonical name of the first alias that either contains
/// `cleaned` or is contained by it, walking the table in order.
#[must_use]
pub fn find_overlapping(cleaned: &str) -> Option<&'static str> {
    STATE_ALIASES
        .iter()
        .find(|(alias, _)| cleaned.contains(alias) || alias.contains(cleaned))
        .map(|(_, canonical)| *canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VALID_STATES;

    #[test]
    fn aliases_are_lowercase() {
        for (alias, _) in STATE_ALIASES {
            assert_eq!(*alias, alias.to_lowercase(), "alias not lower-cased: {alias}");
        }
    }

    #[test]
    fn every_alias_targets_a_canonical_name() {
        for (alias, canonical) in STATE_ALIASES {
            assert!(
                VALID_STATES.contains(canonical),
                "{alias} maps to non-canonical {canonical}"
            );
        }
    }

    #[test]
    fn every_canonical_name_has_an_exact_alias() {
        for state in VALID_STATES {
            assert_eq!(lookup(&state.to_lowercase()), Some(*state));
        }
    }

    #[test]
    fn aliases_are_unique() {
        assert_eq!(ALIAS_INDEX.len(), STATE_ALIASES.len());
    }
}
