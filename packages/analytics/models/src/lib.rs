#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived result types for the Aadhaar analytics engine.
//!
//! Every type here is a plain serializable value computed from a
//! [`Dataset`](aadhaar_insights_record_models::Dataset). Nothing in this
//! crate performs computation beyond trivial accessors; the derivations
//! live in `aadhaar_insights_analytics`.

mod config;

pub use config::AnalyticsConfig;

use aadhaar_insights_record_models::Vertical;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Three-letter month abbreviations, January first.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Returns the abbreviation for a 1-indexed calendar month.
#[must_use]
pub fn month_abbreviation(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| usize::try_from(idx).ok())
        .and_then(|idx| MONTH_ABBREVIATIONS.get(idx))
        .copied()
}

/// Per-vertical sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerticalTotals {
    /// Sum of enrollment age buckets.
    pub enrollment: u64,
    /// Sum of demographic-update age buckets.
    pub demographic: u64,
    /// Sum of biometric-update age buckets.
    pub biometric: u64,
}

impl VerticalTotals {
    /// Adds `value` to the bucket for `vertical`.
    pub const fn add(&mut self, vertical: Vertical, value: u64) {
        match vertical {
            Vertical::Enrollment => self.enrollment = self.enrollment.saturating_add(value),
            Vertical::Demographic => self.demographic = self.demographic.saturating_add(value),
            Vertical::Biometric => self.biometric = self.biometric.saturating_add(value),
        }
    }

    /// Adds every bucket of `other` into `self`.
    pub const fn merge(&mut self, other: &Self) {
        self.enrollment = self.enrollment.saturating_add(other.enrollment);
        self.demographic = self.demographic.saturating_add(other.demographic);
        self.biometric = self.biometric.saturating_add(other.biometric);
    }

    /// Returns the bucket for `vertical`.
    #[must_use]
    pub const fn get(&self, vertical: Vertical) -> u64 {
        match vertical {
            Vertical::Enrollment => self.enrollment,
            Vertical::Demographic => self.demographic,
            Vertical::Biometric => self.biometric,
        }
    }

    /// Combined total across all three verticals.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.enrollment
            .saturating_add(self.demographic)
            .saturating_add(self.biometric)
    }

    /// The vertical with the largest sum.
    ///
    /// Ties resolve in [`Vertical::ALL`] order.
    #[must_use]
    pub fn dominant(&self) -> Vertical {
        let mut best = Vertical::Enrollment;
        for vertical in Vertical::ALL {
            if self.get(vertical) > self.get(best) {
                best = vertical;
            }
        }
        best
    }
}

/// Totals for one canonical state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateAggregate {
    /// Canonical state or union territory name.
    pub state: String,
    /// Per-vertical sums.
    #[serde(flatten)]
    pub totals: VerticalTotals,
}

impl StateAggregate {
    /// Combined total across verticals.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.totals.total()
    }
}

/// Totals for a district or pincode within a drill-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaTotals {
    /// District name or pincode, as uploaded.
    pub name: String,
    /// Per-vertical sums.
    #[serde(flatten)]
    pub totals: VerticalTotals,
}

/// One calendar month of activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrendPoint {
    /// Zero-padded `YYYY-MM` key.
    pub month_key: String,
    /// Short display label (e.g. `"Jun 24"`).
    pub label: String,
    /// Per-vertical sums.
    #[serde(flatten)]
    pub totals: VerticalTotals,
}

/// One distinct upload date of activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrendPoint {
    /// Date text exactly as uploaded.
    pub date: String,
    /// Per-vertical sums.
    #[serde(flatten)]
    pub totals: VerticalTotals,
}

/// Raw age-bucket sums across all records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBreakdown {
    /// Enrollments aged 0-5.
    pub enrollment_0_5: u64,
    /// Enrollments aged 5-17.
    pub enrollment_5_17: u64,
    /// Enrollments aged 18 and over.
    pub enrollment_18_plus: u64,
    /// Demographic updates aged 5-17.
    pub demographic_5_17: u64,
    /// Demographic updates aged 17 and over.
    pub demographic_17_plus: u64,
    /// Biometric updates aged 5-17.
    pub biometric_5_17: u64,
    /// Biometric updates aged 17 and over.
    pub biometric_17_plus: u64,
}

impl AgeBreakdown {
    /// Sum of the three enrollment buckets.
    #[must_use]
    pub const fn enrollment_total(&self) -> u64 {
        self.enrollment_0_5 + self.enrollment_5_17 + self.enrollment_18_plus
    }
}

/// Lexicographic first and last non-empty date strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// Earliest date text, or `"N/A"`.
    pub start: String,
    /// Latest date text, or `"N/A"`.
    pub end: String,
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: "N/A".to_string(),
            end: "N/A".to_string(),
        }
    }
}

/// Diagnostic summary of the loaded records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityReport {
    /// Records across all verticals.
    pub total_records: usize,
    /// Distinct canonical states.
    pub unique_states: usize,
    /// Distinct non-empty district names (not normalized).
    pub unique_districts: usize,
    /// Date span by string ordering.
    pub date_range: DateRange,
    /// Empty text fields across all records.
    pub missing_values: usize,
    /// Records repeating an earlier (date, state, district, pincode) key.
    pub duplicates: usize,
    /// Percentage of populated fields, rounded.
    pub completeness: u32,
}

/// Whether an anomaly lies above or below its group mean.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnomalyDirection {
    /// Above the mean.
    Spike,
    /// Below the mean.
    Drop,
}

/// Anomaly severity.
///
/// `Low` is reserved: the z-score rule only emits `High` and `Medium`.
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
pub enum AnomalySeverity {
    /// |z| above the high-severity threshold.
    High,
    /// |z| above the flag threshold only.
    Medium,
    /// Reserved.
    Low,
}

/// A single flagged observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    /// Date text of the observation, or `"Entry N"` when it has none.
    pub date: String,
    /// Normalized state.
    pub state: String,
    /// District as uploaded.
    pub district: String,
    /// Vertical the observation came from.
    pub vertical: Vertical,
    /// Observed per-record total.
    pub value: u64,
    /// Spike or drop.
    pub direction: AnomalyDirection,
    /// Severity band.
    pub severity: AnomalySeverity,
    /// Z-score of the observation within its group.
    pub z_score: f64,
    /// Heuristic explanation from the event calendar.
    pub reason: String,
}

/// Direction of a vertical's historical trend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrendDirection {
    /// Rising faster than the trend band.
    Up,
    /// Falling faster than the trend band.
    Down,
    /// Within the trend band.
    Stable,
}

/// A projected month for one vertical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Display label (e.g. `"Jan 2025"`).
    pub label: String,
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-indexed.
    pub month: u32,
    /// Vertical being projected.
    pub vertical: Vertical,
    /// Projected total, never negative.
    pub predicted: u64,
    /// Confidence percentage.
    pub confidence: u32,
    /// Historical trend direction of the vertical.
    pub trend: TrendDirection,
}

/// Per-state outlook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePrediction {
    /// Canonical state name.
    pub state: String,
    /// Per-vertical sums.
    #[serde(flatten)]
    pub totals: VerticalTotals,
    /// Month abbreviation with the most activity.
    pub peak_month: String,
    /// Vertical with the largest total.
    pub dominant: Vertical,
    /// Trend-derived growth percentage, one decimal place.
    pub predicted_growth: f64,
}

/// Effect of a reason factor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Impact {
    /// Drives activity up.
    Positive,
    /// Drives activity down.
    Negative,
    /// No clear direction.
    Neutral,
}

/// A heuristic driver of observed activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonFactor {
    /// Short factor name.
    pub factor: String,
    /// Direction of the effect.
    pub impact: Impact,
    /// Human-readable explanation.
    pub explanation: String,
    /// Confidence percentage.
    pub confidence: u32,
    /// State the factor applies to, if state-specific.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Category of a generated insight.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InsightKind {
    Trend,
    Anomaly,
    Prediction,
    Recommendation,
}

/// Display priority of a generated insight.
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
pub enum InsightPriority {
    High,
    Medium,
    Low,
}

/// A rule-generated observation about the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Category.
    pub kind: InsightKind,
    /// Headline.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Display priority.
    pub priority: InsightPriority,
}

/// Which value a choropleth colours by.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MapMetric {
    /// Combined total.
    #[default]
    All,
    Enrollment,
    Demographic,
    Biometric,
}

impl MapMetric {
    /// Extracts this metric from a set of totals.
    #[must_use]
    pub const fn value(self, totals: &VerticalTotals) -> u64 {
        match self {
            Self::All => totals.total(),
            Self::Enrollment => totals.enrollment,
            Self::Demographic => totals.demographic,
            Self::Biometric => totals.biometric,
        }
    }
}

/// Relative intensity of a state against the busiest state.
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
pub enum IntensityBand {
    /// No activity.
    None,
    /// Up to a quarter of the maximum.
    Low,
    /// Over a quarter.
    Medium,
    /// Over half.
    High,
    /// Over three quarters.
    VeryHigh,
}

/// A state's map value and band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateIntensity {
    /// Canonical state name.
    pub state: String,
    /// Metric value.
    pub value: u64,
    /// Intensity band.
    pub band: IntensityBand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_accumulate_per_vertical() {
        let mut totals = VerticalTotals::default();
        totals.add(Vertical::Enrollment, 10);
        totals.add(Vertical::Biometric, 4);
        totals.add(Vertical::Enrollment, 5);
        assert_eq!(totals.get(Vertical::Enrollment), 15);
        assert_eq!(totals.get(Vertical::Demographic), 0);
        assert_eq!(totals.total(), 19);
    }

    #[test]
    fn dominant_prefers_earlier_vertical_on_tie() {
        let totals = VerticalTotals {
            enrollment: 5,
            demographic: 9,
            biometric: 9,
        };
        assert_eq!(totals.dominant(), Vertical::Demographic);
        assert_eq!(VerticalTotals::default().dominant(), Vertical::Enrollment);
    }

    #[test]
    fn month_abbreviations() {
        assert_eq!(month_abbreviation(1), Some("Jan"));
        assert_eq!(month_abbreviation(12), Some("Dec"));
        assert_eq!(month_abbreviation(0), None);
        assert_eq!(month_abbreviation(13), None);
    }

    #[test]
    fn map_metric_selects_value() {
        let totals = VerticalTotals {
            enrollment: 1,
            demographic: 2,
            biometric: 3,
        };
        assert_eq!(MapMetric::All.value(&totals), 6);
        assert_eq!(MapMetric::Demographic.value(&totals), 2);
        assert_eq!("biometric".parse::<MapMetric>().ok(), Some(MapMetric::Biometric));
    }

    #[test]
    fn empty_date_range_is_not_available() {
        let report = DataQualityReport::default();
        assert_eq!(report.date_range.start, "N/A");
        assert_eq!(report.date_range.end, "N/A");
    }

    #[test]
    fn severity_labels() {
        assert_eq!(AnomalySeverity::High.to_string(), "high");
        assert_eq!(IntensityBand::VeryHigh.as_ref(), "very_high");
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let mut totals = VerticalTotals::default();
        totals.add(Vertical::Enrollment, u64::MAX);
        totals.add(Vertical::Enrollment, 1);
        totals.add(Vertical::Biometric, 5);
        assert_eq!(totals.enrollment, u64::MAX);
        assert_eq!(totals.total(), u64::MAX);

        let mut merged = VerticalTotals::default();
        merged.merge(&totals);
        merged.merge(&totals);
        assert_eq!(merged.enrollment, u64::MAX);
        assert_eq!(merged.biometric, 10);
    }
}
