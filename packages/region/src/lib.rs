#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Indian state and union territory name normalization.
//!
//! Every region-scoped aggregate groups by one of the 36 canonical names in
//! [`VALID_STATES`]. Uploaded extracts spell regions in many ways ("MH",
//! "Orissa", "Tamilnadu", "NCT of Delhi"), so [`normalize_state_name`] maps
//! free text onto the canonical set, falling back to a title-cased echo of
//! the input when nothing matches.

pub mod aliases;
mod normalize;

pub use normalize::{is_valid_state, normalize_state_name, title_case};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The 28 states followed by the 8 union territories, in display order.
pub const VALID_STATES: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

/// Number of full states at the head of [`VALID_STATES`].
const STATE_COUNT: usize = 28;

/// Administrative class of a canonical region.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RegionKind {
    /// One of the 28 states.
    State,
    /// One of the 8 union territories.
    UnionTerritory,
}

/// Returns `true` if `name` is exactly one of the canonical names.
///
/// Unlike [`is_valid_state`], this does not normalize first.
#[must_use]
pub fn is_canonical(name: &str) -> bool {
    VALID_STATES.contains(&name)
}

/// Classifies a canonical region name.
///
/// Returns `None` for names outside [`VALID_STATES`].
#[must_use]
pub fn region_kind(name: &str) -> Option<RegionKind> {
    VALID_STATES
        .iter()
        .position(|s| *s == name)
        .map(|idx| {
            if idx < STATE_COUNT {
                RegionKind::State
            } else {
                RegionKind::UnionTerritory
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_count() {
        assert_eq!(VALID_STATES.len(), 36);
    }

    #[test]
    fn classifies_states_and_territories() {
        let states = VALID_STATES
            .iter()
            .filter(|s| region_kind(s) == Some(RegionKind::State))
            .count();
        let territories = VALID_STATES
            .iter()
            .filter(|s| region_kind(s) == Some(RegionKind::UnionTerritory))
            .count();
        assert_eq!(states, 28);
        assert_eq!(territories, 8);
        assert_eq!(region_kind("Ladakh"), Some(RegionKind::UnionTerritory));
        assert_eq!(region_kind("Kerala"), Some(RegionKind::State));
        assert_eq!(region_kind("Atlantis"), None);
    }

    #[test]
    fn canonical_membership_is_exact() {
        assert!(is_canonical("Tamil Nadu"));
        assert!(!is_canonical("tamil nadu"));
        assert!(!is_canonical(""));
    }
}
