#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw record types for the three Aadhaar data verticals.
//!
//! Uploaded extracts arrive as enrollment, demographic-update and
//! biometric-update rows. All three share the same location columns
//! (date, state, district, pincode) and differ only in their age-bucket
//! counts. Numeric fields are always defined: the ingest layer coerces
//! missing or unparseable cells to zero.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of fields assumed per record when computing completeness,
/// applied uniformly regardless of vertical.
pub const FIELDS_PER_RECORD: usize = 7;

/// One of the three data categories.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Vertical {
    /// New Aadhaar enrollments.
    Enrollment,
    /// Demographic detail updates.
    Demographic,
    /// Biometric updates.
    Biometric,
}

impl Vertical {
    /// All verticals in canonical processing order.
    pub const ALL: [Self; 3] = [Self::Enrollment, Self::Demographic, Self::Biometric];

    /// Capitalized singular label (e.g. `"Enrollment"`).
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Enrollment => "Enrollment",
            Self::Demographic => "Demographic",
            Self::Biometric => "Biometric",
        }
    }

    /// Capitalized plural label (e.g. `"Enrollments"`).
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Enrollment => "Enrollments",
            Self::Demographic => "Demographics",
            Self::Biometric => "Biometrics",
        }
    }
}

/// Common view over the three record shapes.
pub trait Record {
    /// The vertical this record belongs to.
    fn vertical(&self) -> Vertical;
    /// Raw date text as uploaded. May be empty or malformed.
    fn date(&self) -> &str;
    /// State text (normalized at ingest, but not guaranteed canonical).
    fn state(&self) -> &str;
    /// District text as uploaded.
    fn district(&self) -> &str;
    /// Pincode text as uploaded.
    fn pincode(&self) -> &str;
    /// Sum of this record's age-bucket counts.
    fn total(&self) -> u64;

    /// Number of empty text fields. Numeric fields are never missing.
    fn missing_fields(&self) -> usize {
        [self.date(), self.state(), self.district(), self.pincode()]
            .iter()
            .filter(|v| v.is_empty())
            .count()
    }
}

/// A new-enrollment row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    /// Raw date text.
    pub date: String,
    /// State name.
    pub state: String,
    /// District name.
    pub district: String,
    /// Postal pincode.
    pub pincode: String,
    /// Enrollments aged 0-5.
    pub age_0_5: u64,
    /// Enrollments aged 5-17.
    pub age_5_17: u64,
    /// Enrollments aged 18 and over.
    pub age_18_greater: u64,
}

/// A demographic-update row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicRecord {
    /// Raw date text.
    pub date: String,
    /// State name.
    pub state: String,
    /// District name.
    pub district: String,
    /// Postal pincode.
    pub pincode: String,
    /// Updates for ages 5-17.
    pub demo_age_5_17: u64,
    /// Updates for ages 17 and over.
    pub demo_age_17_plus: u64,
}

/// A biometric-update row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiometricRecord {
    /// Raw date text.
    pub date: String,
    /// State name.
    pub state: String,
    /// District name.
    pub district: String,
    /// Postal pincode.
    pub pincode: String,
    /// Updates for ages 5-17.
    pub bio_age_5_17: u64,
    /// Updates for ages 17 and over.
    pub bio_age_17_plus: u64,
}

macro_rules! impl_record {
    ($ty:ty, $vertical:expr, $($field:ident),+) => {
        impl Record for $ty {
            fn vertical(&self) -> Vertical {
                $vertical
            }
            fn date(&self) -> &str {
                &self.date
            }
            fn state(&self) -> &str {
                &self.state
            }
            fn district(&self) -> &str {
                &self.district
            }
            fn pincode(&self) -> &str {
                &self.pincode
            }
            fn total(&self) -> u64 {
                0u64 $(.saturating_add(self.$field))+
            }
        }
    };
}

impl_record!(
    EnrollmentRecord,
    Vertical::Enrollment,
    age_0_5,
    age_5_17,
    age_18_greater
);
impl_record!(
    DemographicRecord,
    Vertical::Demographic,
    demo_age_5_17,
    demo_age_17_plus
);
impl_record!(
    BiometricRecord,
    Vertical::Biometric,
    bio_age_5_17,
    bio_age_17_plus
);

/// The three parallel record collections.
///
/// Every derived view is a pure function of a `Dataset`; nothing caches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Enrollment rows in upload order.
    pub enrollment: Vec<EnrollmentRecord>,
    /// Demographic-update rows in upload order.
    pub demographic: Vec<DemographicRecord>,
    /// Biometric-update rows in upload order.
    pub biometric: Vec<BiometricRecord>,
}

impl Dataset {
    /// Returns `true` if no vertical holds any records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enrollment.is_empty() && self.demographic.is_empty() && self.biometric.is_empty()
    }

    /// Total record count across verticals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enrollment.len() + self.demographic.len() + self.biometric.len()
    }

    /// Record count for a single vertical.
    #[must_use]
    pub fn count(&self, vertical: Vertical) -> usize {
        match vertical {
            Vertical::Enrollment => self.enrollment.len(),
            Vertical::Demographic => self.demographic.len(),
            Vertical::Biometric => self.biometric.len(),
        }
    }

    /// Iterates the records of one vertical in upload order.
    pub fn records_of(&self, vertical: Vertical) -> Box<dyn Iterator<Item = &dyn Record> + '_> {
        match vertical {
            Vertical::Enrollment => Box::new(self.enrollment.iter().map(|r| r as &dyn Record)),
            Vertical::Demographic => Box::new(self.demographic.iter().map(|r| r as &dyn Record)),
            Vertical::Biometric => Box::new(self.biometric.iter().map(|r| r as &dyn Record)),
        }
    }

    /// Iterates every record: enrollment, then demographic, then biometric.
    pub fn records(&self) -> impl Iterator<Item = &dyn Record> + '_ {
        Vertical::ALL
            .into_iter()
            .flat_map(move |vertical| self.records_of(vertical))
    }
}
