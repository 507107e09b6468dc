//! Precomputed views the rules answer from.

use std::collections::HashSet;

use aadhaar_insights_analytics::aggregate::{age_breakdown, state_rollup};
use aadhaar_insights_analytics::dates::is_placeholder;
use aadhaar_insights_analytics_models::{AgeBreakdown, StateAggregate, VerticalTotals};
use aadhaar_insights_record_models::{Dataset, Record};

/// Distinct values in first-seen order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

/// Everything a rule may need, derived once per question.
///
/// `totals` come from the canonical-state rollup, while the name lists are
/// the raw distinct values as stored on the records.
pub struct QueryContext<'a> {
    dataset: &'a Dataset,
    /// Canonical-state rollup in first-contribution order.
    pub states: Vec<StateAggregate>,
    /// Sum of the rollup.
    pub totals: VerticalTotals,
    /// Distinct stored state names (enrollment, demographic, biometric order).
    pub all_states: Vec<&'a str>,
    /// Distinct stored district names.
    pub all_districts: Vec<&'a str>,
    /// Distinct stored pincodes.
    pub all_pincodes: Vec<&'a str>,
    /// Distinct non-placeholder dates, string-sorted.
    pub all_dates: Vec<&'a str>,
}

impl<'a> QueryContext<'a> {
    /// Builds the context for a dataset.
    #[must_use]
    pub fn new(dataset: &'a Dataset) -> Self {
        let states = state_rollup(dataset);
        let mut totals = VerticalTotals::default();
        for state in &states {
            totals.merge(&state.totals);
        }

        let mut all_dates = distinct(dataset.records().map(Record::date));
        all_dates.retain(|d| !is_placeholder(d));
        all_dates.sort_unstable();

        Self {
            dataset,
            states,
            totals,
            all_states: distinct(dataset.records().map(Record::state)),
            all_districts: distinct(dataset.records().map(Record::district)),
            all_pincodes: distinct(dataset.records().map(Record::pincode)),
            all_dates,
        }
    }

    /// The underlying records.
    #[must_use]
    pub const fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Raw age-bucket sums.
    #[must_use]
    pub fn ages(&self) -> AgeBreakdown {
        age_breakdown(self.dataset)
    }

    /// Rollup sorted by combined total, highest first (stable).
    #[must_use]
    pub fn ranked(&self) -> Vec<&StateAggregate> {
        let mut ranked: Vec<&StateAggregate> = self.states.iter().collect();
        ranked.sort_by(|a, b| b.total().cmp(&a.total()));
        ranked
    }

    /// Rollup sorted by combined total, lowest first (stable).
    #[must_use]
    pub fn ascending(&self) -> Vec<&StateAggregate> {
        let mut ranked: Vec<&StateAggregate> = self.states.iter().collect();
        ranked.sort_by_key(|s| s.total());
        ranked
    }

    /// 1-based rank of a state in [`Self::ranked`], case-insensitive.
    #[must_use]
    pub fn rank_of(&self, state: &str) -> Option<usize> {
        let lower = state.to_lowercase();
        self.ranked()
            .iter()
            .position(|s| s.state.to_lowercase() == lower)
            .map(|idx| idx + 1)
    }

    fn totals_where(&self, predicate: impl Fn(&dyn Record) -> bool) -> VerticalTotals {
        let mut totals = VerticalTotals::default();
        for record in self.dataset.records().filter(|r| predicate(*r)) {
            totals.add(record.vertical(), record.total());
        }
        totals
    }

    /// Totals for records whose stored state equals `state`, ignoring case.
    #[must_use]
    pub fn state_totals(&self, state: &str) -> VerticalTotals {
        let lower = state.to_lowercase();
        self.totals_where(|r| r.state().to_lowercase() == lower)
    }

    /// Distinct districts recorded under `state`, ignoring case.
    #[must_use]
    pub fn districts_of(&self, state: &str) -> Vec<&'a str> {
        let lower = state.to_lowercase();
        distinct(
            self.dataset
                .records()
                .filter(|r| r.state().to_lowercase() == lower)
                .map(Record::district),
        )
    }

    /// Totals for records whose district equals `district`, ignoring case.
    #[must_use]
    pub fn district_totals(&self, district: &str) -> VerticalTotals {
        let lower = district.to_lowercase();
        self.totals_where(|r| r.district().to_lowercase() == lower)
    }

    /// Stored state of the first record in `district`, if non-empty.
    #[must_use]
    pub fn parent_state(&self, district: &str) -> Option<&'a str> {
        let lower = district.to_lowercase();
        self.dataset
            .records()
            .find(|r| r.district().to_lowercase() == lower)
            .map(Record::state)
            .filter(|s| !s.is_empty())
    }

    /// Totals for records dated exactly `date`.
    #[must_use]
    pub fn date_totals(&self, date: &str) -> VerticalTotals {
        self.totals_where(|r| r.date() == date)
    }

    /// Stored state names mentioned in `question` (already lower-cased).
    #[must_use]
    pub fn states_in(&self, question: &str) -> Vec<&'a str> {
        mentioned(&self.all_states, question)
    }

    /// First stored district mentioned in `question`.
    #[must_use]
    pub fn district_in(&self, question: &str) -> Option<&'a str> {
        mentioned(&self.all_districts, question).into_iter().next()
    }

    /// First known date mentioned in `question`.
    #[must_use]
    pub fn date_in(&self, question: &str) -> Option<&'a str> {
        mentioned(&self.all_dates, question).into_iter().next()
    }
}

/// Non-empty names whose lower-cased form occurs in `question`.
fn mentioned<'a>(names: &[&'a str], question: &str) -> Vec<&'a str> {
    names
        .iter()
        .filter(|name| !name.is_empty() && question.contains(&name.to_lowercase()))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use aadhaar_insights_record_models::{DemographicRecord, EnrollmentRecord};

    use super::*;

    fn enrollment(date: &str, state: &str, district: &str, total: u64) -> EnrollmentRecord {
        EnrollmentRecord {
            date: date.to_string(),
            state: state.to_string(),
            district: district.to_string(),
            pincode: format!("{total}"),
            age_0_5: total,
            age_5_17: 0,
            age_18_greater: 0,
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            enrollment: vec![
                enrollment("2024-06-02", "Kerala", "Kochi", 5),
                enrollment("2024-06-01", "Punjab", "Ludhiana", 9),
                enrollment("undefined", "Kerala", "Thrissur", 1),
                enrollment("2024-06-01", "Mystery", "Kochi", 100),
            ],
            demographic: vec![DemographicRecord {
                date: "2024-06-02".to_string(),
                state: "Punjab".to_string(),
                district: "Amritsar".to_string(),
                pincode: "143001".to_string(),
                demo_age_5_17: 2,
                demo_age_17_plus: 0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn totals_come_from_canonical_rollup() {
        let dataset = dataset();
        let ctx = QueryContext::new(&dataset);
        assert_eq!(ctx.totals.enrollment, 15);
        assert_eq!(ctx.totals.demographic, 2);
    }

    #[test]
    fn names_are_raw_and_distinct() {
        let dataset = dataset();
        let ctx = QueryContext::new(&dataset);
        assert_eq!(ctx.all_states, vec!["Kerala", "Punjab", "Mystery"]);
        assert_eq!(
            ctx.all_districts,
            vec!["Kochi", "Ludhiana", "Thrissur", "Amritsar"]
        );
        assert_eq!(ctx.all_dates, vec!["2024-06-01", "2024-06-02"]);
    }

    #[test]
    fn ranking_and_lookup() {
        let dataset = dataset();
        let ctx = QueryContext::new(&dataset);
        assert_eq!(ctx.rank_of("punjab"), Some(1));
        assert_eq!(ctx.rank_of("Kerala"), Some(2));
        assert_eq!(ctx.rank_of("Mystery"), None);
        assert_eq!(ctx.ascending()[0].state, "Kerala");

        assert_eq!(ctx.district_totals("KOCHI").total(), 105);
        assert_eq!(ctx.parent_state("kochi"), Some("Kerala"));
        assert_eq!(ctx.date_totals("2024-06-02").total(), 7);
        assert_eq!(ctx.districts_of("kerala"), vec!["Kochi", "Thrissur"]);
        assert_eq!(ctx.states_in("compare punjab and kerala"), vec!["Kerala", "Punjab"]);
    }
}
