//! Rollups of raw records by state, month, date, district and pincode.

use std::collections::{BTreeMap, HashMap};

use aadhaar_insights_analytics_models::{
    AgeBreakdown, AreaTotals, DailyTrendPoint, IntensityBand, MapMetric, MonthlyTrendPoint,
    StateAggregate, StateIntensity, VerticalTotals,
};
use aadhaar_insights_record_models::{Dataset, Record, Vertical};
use aadhaar_insights_region::{is_canonical, normalize_state_name};

use crate::dates::{format_month_label, month_key, parse_date};

/// Accumulates totals keyed by name, preserving first-seen order.
struct OrderedTotals {
    entries: Vec<(String, VerticalTotals)>,
    index: HashMap<String, usize>,
}

impl OrderedTotals {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, key: &str, vertical: Vertical, value: u64) {
        let idx = if let Some(&idx) = self.index.get(key) {
            idx
        } else {
            self.entries.push((key.to_string(), VerticalTotals::default()));
            self.index.insert(key.to_string(), self.entries.len() - 1);
            self.entries.len() - 1
        };
        self.entries[idx].1.add(vertical, value);
    }

    fn into_areas(self) -> Vec<AreaTotals> {
        self.entries
            .into_iter()
            .map(|(name, totals)| AreaTotals { name, totals })
            .collect()
    }
}

/// Sums every record into its canonical state.
///
/// Records whose state does not normalize to one of the canonical names are
/// skipped. Output is in first-contribution order.
#[must_use]
pub fn state_rollup(dataset: &Dataset) -> Vec<StateAggregate> {
    let mut acc = OrderedTotals::new();
    let mut skipped = 0_usize;

    for record in dataset.records() {
        let state = normalize_state_name(record.state());
        if !is_canonical(&state) {
            skipped += 1;
            continue;
        }
        acc.add(&state, record.vertical(), record.total());
    }

    if skipped > 0 {
        log::debug!("state_rollup: skipped {skipped} records without a canonical state");
    }

    acc.entries
        .into_iter()
        .map(|(state, totals)| StateAggregate { state, totals })
        .collect()
}

/// Sorts states by combined total, highest first.
///
/// The sort is stable, so ties keep their rollup order.
#[must_use]
pub fn rank_states(mut states: Vec<StateAggregate>) -> Vec<StateAggregate> {
    states.sort_by(|a, b| b.total().cmp(&a.total()));
    states
}

/// Sorts states by combined total, lowest first. Stable like [`rank_states`].
#[must_use]
pub fn rank_states_ascending(mut states: Vec<StateAggregate>) -> Vec<StateAggregate> {
    states.sort_by_key(StateAggregate::total);
    states
}

/// Sums records by calendar month, ascending by `YYYY-MM` key.
///
/// Records without a parseable date are excluded.
#[must_use]
pub fn monthly_rollup(dataset: &Dataset) -> Vec<MonthlyTrendPoint> {
    let mut months: BTreeMap<String, VerticalTotals> = BTreeMap::new();
    let mut undated = 0_usize;

    for record in dataset.records() {
        let Some(date) = parse_date(record.date()) else {
            undated += 1;
            continue;
        };
        months
            .entry(month_key(date))
            .or_default()
            .add(record.vertical(), record.total());
    }

    if undated > 0 {
        log::debug!("monthly_rollup: {undated} records without a parseable date");
    }

    months
        .into_iter()
        .map(|(month_key, totals)| MonthlyTrendPoint {
            label: format_month_label(&month_key).unwrap_or_else(|| month_key.clone()),
            month_key,
            totals,
        })
        .collect()
}

/// Sums records by their raw date text, ordered chronologically.
///
/// Distinct spellings of the same day stay separate points; among those,
/// first-seen order is kept.
#[must_use]
pub fn daily_trend(dataset: &Dataset) -> Vec<DailyTrendPoint> {
    let mut acc = OrderedTotals::new();
    let mut parsed = HashMap::new();

    for record in dataset.records() {
        let raw = record.date();
        let Some(date) = parse_date(raw) else {
            continue;
        };
        parsed.entry(raw.to_string()).or_insert(date);
        acc.add(raw, record.vertical(), record.total());
    }

    let mut points: Vec<DailyTrendPoint> = acc
        .entries
        .into_iter()
        .map(|(date, totals)| DailyTrendPoint { date, totals })
        .collect();
    points.sort_by_key(|p| parsed.get(&p.date).copied());
    points
}

/// Per-district totals within one state, highest combined total first.
///
/// Both `state` and each record's state are normalized before comparison.
#[must_use]
pub fn district_rollup(dataset: &Dataset, state: &str) -> Vec<AreaTotals> {
    let target = normalize_state_name(state).to_lowercase();
    let mut acc = OrderedTotals::new();

    for record in dataset.records() {
        if normalize_state_name(record.state()).to_lowercase() == target {
            acc.add(record.district(), record.vertical(), record.total());
        }
    }

    let mut districts = acc.into_areas();
    districts.sort_by(|a, b| b.totals.total().cmp(&a.totals.total()));
    districts
}

/// Per-pincode totals within one state and district, highest first.
///
/// The district must match exactly.
#[must_use]
pub fn pincode_rollup(dataset: &Dataset, state: &str, district: &str) -> Vec<AreaTotals> {
    let target = normalize_state_name(state).to_lowercase();
    let mut acc = OrderedTotals::new();

    for record in dataset.records() {
        if record.district() == district
            && normalize_state_name(record.state()).to_lowercase() == target
        {
            acc.add(record.pincode(), record.vertical(), record.total());
        }
    }

    let mut pincodes = acc.into_areas();
    pincodes.sort_by(|a, b| b.totals.total().cmp(&a.totals.total()));
    pincodes
}

/// Raw age-bucket sums over every record, regardless of state.
#[must_use]
pub fn age_breakdown(dataset: &Dataset) -> AgeBreakdown {
    let mut ages = AgeBreakdown::default();
    for r in &dataset.enrollment {
        ages.enrollment_0_5 = ages.enrollment_0_5.saturating_add(r.age_0_5);
        ages.enrollment_5_17 = ages.enrollment_5_17.saturating_add(r.age_5_17);
        ages.enrollment_18_plus = ages.enrollment_18_plus.saturating_add(r.age_18_greater);
    }
    for r in &dataset.demographic {
        ages.demographic_5_17 = ages.demographic_5_17.saturating_add(r.demo_age_5_17);
        ages.demographic_17_plus = ages.demographic_17_plus.saturating_add(r.demo_age_17_plus);
    }
    for r in &dataset.biometric {
        ages.biometric_5_17 = ages.biometric_5_17.saturating_add(r.bio_age_5_17);
        ages.biometric_17_plus = ages.biometric_17_plus.saturating_add(r.bio_age_17_plus);
    }
    ages
}

/// Raw per-vertical totals over every record, regardless of state.
#[must_use]
pub fn vertical_totals(dataset: &Dataset) -> VerticalTotals {
    let mut totals = VerticalTotals::default();
    for record in dataset.records() {
        totals.add(record.vertical(), record.total());
    }
    totals
}

/// Classifies a value against the largest value on the map.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn intensity_band(value: u64, max: u64) -> IntensityBand {
    if value == 0 {
        return IntensityBand::None;
    }
    let ratio = value as f64 / max.max(1) as f64;
    if ratio > 0.75 {
        IntensityBand::VeryHigh
    } else if ratio > 0.5 {
        IntensityBand::High
    } else if ratio > 0.25 {
        IntensityBand::Medium
    } else {
        IntensityBand::Low
    }
}

/// Map values and bands for each state in a rollup.
#[must_use]
pub fn state_intensities(states: &[StateAggregate], metric: MapMetric) -> Vec<StateIntensity> {
    let max = states
        .iter()
        .map(|s| metric.value(&s.totals))
        .max()
        .unwrap_or(0);

    states
        .iter()
        .map(|s| {
            let value = metric.value(&s.totals);
            StateIntensity {
                state: s.state.clone(),
                value,
                band: intensity_band(value, max),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use aadhaar_insights_record_models::{BiometricRecord, DemographicRecord, EnrollmentRecord};

    use super::*;

    fn enrollment(date: &str, state: &str, district: &str, counts: [u64; 3]) -> EnrollmentRecord {
        EnrollmentRecord {
            date: date.to_string(),
            state: state.to_string(),
            district: district.to_string(),
            pincode: "000000".to_string(),
            age_0_5: counts[0],
            age_5_17: counts[1],
            age_18_greater: counts[2],
        }
    }

    fn demographic(date: &str, state: &str, total: u64) -> DemographicRecord {
        DemographicRecord {
            date: date.to_string(),
            state: state.to_string(),
            district: "Central".to_string(),
            pincode: "000000".to_string(),
            demo_age_5_17: total,
            demo_age_17_plus: 0,
        }
    }

    fn biometric(date: &str, state: &str, total: u64) -> BiometricRecord {
        BiometricRecord {
            date: date.to_string(),
            state: state.to_string(),
            district: "Central".to_string(),
            pincode: "000000".to_string(),
            bio_age_5_17: 0,
            bio_age_17_plus: total,
        }
    }

    fn sample() -> Dataset {
        Dataset {
            enrollment: vec![
                enrollment("2024-06-01", "Kerala", "Ernakulam", [1, 2, 3]),
                enrollment("2024-07-15", "Tamil Nadu", "Chennai", [10, 0, 0]),
                enrollment("2024-06-20", "Xyzzy", "Nowhere", [100, 100, 100]),
                enrollment("garbage", "KL", "Kochi", [4, 0, 0]),
            ],
            demographic: vec![demographic("2024-05-03", "Kerala", 7)],
            biometric: vec![biometric("2024-07-01", "TN", 50)],
        }
    }

    #[test]
    fn state_rollup_excludes_unknown_states() {
        let states = state_rollup(&sample());
        let names: Vec<&str> = states.iter().map(|s| s.state.as_str()).collect();
        assert_eq!(names, vec!["Kerala", "Tamil Nadu"]);

        let kerala = &states[0];
        assert_eq!(kerala.totals.enrollment, 10);
        assert_eq!(kerala.totals.demographic, 7);

        let enrollment_sum: u64 = states.iter().map(|s| s.totals.enrollment).sum();
        assert_eq!(enrollment_sum, 20);
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let mk = |state: &str, enrollment: u64| StateAggregate {
            state: state.to_string(),
            totals: VerticalTotals {
                enrollment,
                ..Default::default()
            },
        };
        let ranked = rank_states(vec![mk("Goa", 5), mk("Bihar", 9), mk("Assam", 5)]);
        let names: Vec<&str> = ranked.iter().map(|s| s.state.as_str()).collect();
        assert_eq!(names, vec!["Bihar", "Goa", "Assam"]);

        let lowest = rank_states_ascending(vec![mk("Goa", 5), mk("Bihar", 9), mk("Assam", 5)]);
        let names: Vec<&str> = lowest.iter().map(|s| s.state.as_str()).collect();
        assert_eq!(names, vec!["Goa", "Assam", "Bihar"]);
    }

    #[test]
    fn monthly_rollup_is_sorted_and_skips_bad_dates() {
        let months = monthly_rollup(&sample());
        let keys: Vec<&str> = months.iter().map(|m| m.month_key.as_str()).collect();
        assert_eq!(keys, vec!["2024-05", "2024-06", "2024-07"]);
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));

        let june = &months[1];
        assert_eq!(june.label, "Jun 24");
        assert_eq!(june.totals.enrollment, 306);

        let total: u64 = months.iter().map(|m| m.totals.total()).sum();
        assert_eq!(total, 6 + 10 + 300 + 7 + 50);
    }

    #[test]
    fn daily_trend_orders_chronologically() {
        let days = daily_trend(&sample());
        let dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2024-05-03", "2024-06-01", "2024-06-20", "2024-07-01", "2024-07-15"]
        );
    }

    #[test]
    fn district_drill_down_normalizes_state() {
        let dataset = Dataset {
            enrollment: vec![
                enrollment("2024-06-01", "Kerala", "Ernakulam", [1, 0, 0]),
                enrollment("2024-06-01", "kerala", "Kozhikode", [5, 0, 0]),
                enrollment("2024-06-01", "KL", "Ernakulam", [1, 0, 0]),
                enrollment("2024-06-01", "Goa", "North Goa", [9, 0, 0]),
            ],
            ..Default::default()
        };
        let districts = district_rollup(&dataset, "KERALA");
        let names: Vec<(&str, u64)> = districts
            .iter()
            .map(|d| (d.name.as_str(), d.totals.total()))
            .collect();
        assert_eq!(names, vec![("Kozhikode", 5), ("Ernakulam", 2)]);
    }

    #[test]
    fn pincode_drill_down_requires_exact_district() {
        let mut a = enrollment("2024-06-01", "Kerala", "Ernakulam", [3, 0, 0]);
        a.pincode = "682001".to_string();
        let mut b = enrollment("2024-06-01", "Kerala", "Ernakulam", [8, 0, 0]);
        b.pincode = "682002".to_string();
        let mut c = enrollment("2024-06-01", "Kerala", "ernakulam", [50, 0, 0]);
        c.pincode = "682003".to_string();
        let dataset = Dataset {
            enrollment: vec![a, b, c],
            ..Default::default()
        };
        let pincodes = pincode_rollup(&dataset, "Kerala", "Ernakulam");
        let names: Vec<&str> = pincodes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["682002", "682001"]);
    }

    #[test]
    fn age_and_vertical_totals_are_unfiltered() {
        let dataset = sample();
        let ages = age_breakdown(&dataset);
        assert_eq!(ages.enrollment_0_5, 115);
        assert_eq!(ages.enrollment_total(), 320);
        assert_eq!(ages.demographic_5_17, 7);
        assert_eq!(ages.biometric_17_plus, 50);

        let totals = vertical_totals(&dataset);
        assert_eq!(totals.enrollment, 320);
        assert_eq!(totals.total(), 377);
    }

    #[test]
    fn intensity_bands() {
        assert_eq!(intensity_band(0, 100), IntensityBand::None);
        assert_eq!(intensity_band(100, 100), IntensityBand::VeryHigh);
        assert_eq!(intensity_band(75, 100), IntensityBand::High);
        assert_eq!(intensity_band(26, 100), IntensityBand::Medium);
        assert_eq!(intensity_band(25, 100), IntensityBand::Low);
        assert_eq!(intensity_band(1, 0), IntensityBand::VeryHigh);

        let states = state_rollup(&sample());
        let bands = state_intensities(&states, MapMetric::Biometric);
        assert_eq!(bands[0].band, IntensityBand::None);
        assert_eq!(bands[1].band, IntensityBand::VeryHigh);
    }
}
