//! State outlooks, reason factors and headline insights.
//!
//! These are rule-based summaries layered on the rollups: nothing here is
//! learned, and every output is reproducible from the same records.

use std::collections::{BTreeMap, HashMap};

use aadhaar_insights_analytics_models::{
    Anomaly, AnomalySeverity, Impact, Insight, InsightKind, InsightPriority, ReasonFactor,
    StatePrediction, VerticalTotals, month_abbreviation,
};
use aadhaar_insights_record_models::{Dataset, Record};
use aadhaar_insights_region::{is_canonical, normalize_state_name};
use chrono::Datelike;

use crate::anomaly::state_events;
use crate::dates::{month_key, parse_date};

/// Number of states kept by [`state_predictions`].
pub const MAX_STATE_PREDICTIONS: usize = 10;

/// Number of factors kept by [`reason_analysis`].
pub const MAX_REASON_FACTORS: usize = 10;

#[derive(Default)]
struct StateActivity {
    totals: VerticalTotals,
    /// Calendar month (1-12) sums in first-seen order.
    by_month: Vec<(u32, u64)>,
    /// Year-month sums for growth estimation.
    by_year_month: BTreeMap<String, u64>,
}

impl StateActivity {
    fn record(&mut self, record: &dyn Record) {
        let value = record.total();
        self.totals.add(record.vertical(), value);

        let Some(date) = parse_date(record.date()) else {
            return;
        };
        if let Some(entry) = self.by_month.iter_mut().find(|(m, _)| *m == date.month()) {
            entry.1 = entry.1.saturating_add(value);
        } else {
            self.by_month.push((date.month(), value));
        }
        let sum = self.by_year_month.entry(month_key(date)).or_default();
        *sum = sum.saturating_add(value);
    }

    fn peak_month(&self) -> &'static str {
        let mut peak = 1;
        let mut max = 0;
        for &(month, value) in &self.by_month {
            if value > max {
                max = value;
                peak = month;
            }
        }
        month_abbreviation(peak).unwrap_or("Jan")
    }
}

/// Average month-over-month change as a percentage of the monthly mean,
/// rounded to one decimal. `0.0` with fewer than two months.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn growth_rate(series: &[u64]) -> f64 {
    let (Some(&first), Some(&last)) = (series.first(), series.last()) else {
        return 0.0;
    };
    if series.len() < 2 {
        return 0.0;
    }
    let n = series.len() as f64;
    let mean = series.iter().map(|&v| v as f64).sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }
    let trend = (last as f64 - first as f64) / n;
    (trend / mean * 1000.0).round() / 10.0
}

/// Per-state outlook for the busiest canonical states.
///
/// Sorted by combined total (highest first, stable) and capped at
/// [`MAX_STATE_PREDICTIONS`].
#[must_use]
pub fn state_predictions(dataset: &Dataset) -> Vec<StatePrediction> {
    let mut order: Vec<String> = Vec::new();
    let mut states: HashMap<String, StateActivity> = HashMap::new();

    for record in dataset.records() {
        let state = normalize_state_name(record.state());
        if !is_canonical(&state) {
            continue;
        }
        states
            .entry(state)
            .or_insert_with_key(|key| {
                order.push(key.clone());
                StateActivity::default()
            })
            .record(record);
    }

    let mut predictions: Vec<StatePrediction> = order
        .into_iter()
        .filter_map(|state| {
            let activity = states.remove(&state)?;
            let series: Vec<u64> = activity.by_year_month.values().copied().collect();
            Some(StatePrediction {
                peak_month: activity.peak_month().to_string(),
                dominant: activity.totals.dominant(),
                predicted_growth: growth_rate(&series),
                totals: activity.totals,
                state,
            })
        })
        .collect();

    predictions.sort_by(|a, b| b.totals.total().cmp(&a.totals.total()));
    predictions.truncate(MAX_STATE_PREDICTIONS);
    predictions
}

/// Likely drivers of the observed activity.
///
/// Two nationwide factors come first, then one factor per event-calendar
/// entry for each predicted state that has one. Capped at
/// [`MAX_REASON_FACTORS`].
#[must_use]
pub fn reason_analysis(predictions: &[StatePrediction]) -> Vec<ReasonFactor> {
    let mut reasons = vec![
        ReasonFactor {
            factor: "Academic Cycle".to_string(),
            impact: Impact::Positive,
            explanation: "School admissions across India drive a 25-30% increase in child \
                          enrollment and biometric updates during June-July."
                .to_string(),
            confidence: 92,
            state: None,
        },
        ReasonFactor {
            factor: "Digital India Initiatives".to_string(),
            impact: Impact::Positive,
            explanation: "New government welfare schemes often mandate latest Aadhaar updates, \
                          causing localized spikes."
                .to_string(),
            confidence: 80,
            state: None,
        },
    ];

    for prediction in predictions {
        for (_, event) in state_events(&prediction.state) {
            reasons.push(ReasonFactor {
                factor: format!("{} Specific Event", prediction.state),
                impact: Impact::Positive,
                explanation: (*event).to_string(),
                confidence: 85,
                state: Some(prediction.state.clone()),
            });
        }
    }

    reasons.truncate(MAX_REASON_FACTORS);
    reasons
}

/// Headline insights for the dashboard.
#[must_use]
pub fn generate_insights(predictions: &[StatePrediction], anomalies: &[Anomaly]) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(top) = predictions.first() {
        let dominant = top.dominant.title();
        insights.push(Insight {
            kind: InsightKind::Trend,
            title: format!("Dominant Activity in {}", top.state),
            description: format!(
                "{} shows {dominant} as the primary activity. This suggests high {} demand in \
                 the region.",
                top.state,
                dominant.to_lowercase()
            ),
            priority: InsightPriority::High,
        });
    }

    let high: Vec<&Anomaly> = anomalies
        .iter()
        .filter(|a| a.severity == AnomalySeverity::High)
        .collect();
    if let Some(first) = high.first() {
        insights.push(Insight {
            kind: InsightKind::Anomaly,
            title: "Critical Spikes Detected".to_string(),
            description: format!(
                "Found {} high-severity spikes. Primary cause likely {}.",
                high.len(),
                first.reason
            ),
            priority: InsightPriority::High,
        });
    }

    insights.push(Insight {
        kind: InsightKind::Recommendation,
        title: "Operational Optimization".to_string(),
        description: "Based on peak month analysis, consider increasing staff capacity in \
                      Maharashtra and UP during July-August."
            .to_string(),
        priority: InsightPriority::Medium,
    });

    insights
}

#[cfg(test)]
mod tests {
    use aadhaar_insights_analytics_models::AnomalyDirection;
    use aadhaar_insights_record_models::{BiometricRecord, EnrollmentRecord, Vertical};

    use super::*;

    fn enrollment(date: &str, state: &str, total: u64) -> EnrollmentRecord {
        EnrollmentRecord {
            date: date.to_string(),
            state: state.to_string(),
            district: "Central".to_string(),
            pincode: "000000".to_string(),
            age_0_5: total,
            age_5_17: 0,
            age_18_greater: 0,
        }
    }

    fn biometric(date: &str, state: &str, total: u64) -> BiometricRecord {
        BiometricRecord {
            date: date.to_string(),
            state: state.to_string(),
            district: "Central".to_string(),
            pincode: "000000".to_string(),
            bio_age_5_17: total,
            bio_age_17_plus: 0,
        }
    }

    fn prediction(state: &str) -> StatePrediction {
        StatePrediction {
            state: state.to_string(),
            totals: VerticalTotals::default(),
            peak_month: "Jan".to_string(),
            dominant: Vertical::Enrollment,
            predicted_growth: 0.0,
        }
    }

    #[test]
    fn predictions_rank_states_and_find_peaks() {
        let dataset = Dataset {
            enrollment: vec![
                enrollment("2024-06-01", "Bihar", 10),
                enrollment("2024-07-01", "Bihar", 30),
                enrollment("2023-06-01", "Bihar", 25),
                enrollment("2024-07-01", "Goa", 5),
                enrollment("bad", "Goa", 500),
                enrollment("2024-07-01", "Xyzzy", 9_999),
            ],
            biometric: vec![biometric("2024-06-01", "Goa", 600)],
            ..Default::default()
        };
        let predictions = state_predictions(&dataset);
        let names: Vec<&str> = predictions.iter().map(|p| p.state.as_str()).collect();
        assert_eq!(names, vec!["Goa", "Bihar"]);

        let goa = &predictions[0];
        assert_eq!(goa.totals.enrollment, 505);
        assert_eq!(goa.dominant, Vertical::Biometric);
        assert_eq!(goa.peak_month, "Jun");

        let bihar = &predictions[1];
        // June (10 + 25) beats July (30).
        assert_eq!(bihar.peak_month, "Jun");
        assert_eq!(bihar.dominant, Vertical::Enrollment);
    }

    #[test]
    fn peak_defaults_to_january_without_dates() {
        let dataset = Dataset {
            enrollment: vec![enrollment("", "Kerala", 10)],
            ..Default::default()
        };
        let predictions = state_predictions(&dataset);
        assert_eq!(predictions[0].peak_month, "Jan");
        assert!(predictions[0].predicted_growth.abs() < f64::EPSILON);
    }

    #[test]
    fn growth_is_deterministic_and_trend_derived() {
        assert!(growth_rate(&[]).abs() < f64::EPSILON);
        assert!(growth_rate(&[100]).abs() < f64::EPSILON);
        assert!(growth_rate(&[0, 0]).abs() < f64::EPSILON);
        // trend (200 - 100) / 2 = 50, mean 150: 33.3%.
        assert!((growth_rate(&[100, 200]) - 33.3).abs() < 1e-9);
        assert!((growth_rate(&[200, 100]) + 33.3).abs() < 1e-9);
    }

    #[test]
    fn predictions_are_capped() {
        let states = [
            "Assam", "Bihar", "Goa", "Gujarat", "Haryana", "Kerala", "Punjab", "Sikkim",
            "Tripura", "Odisha", "Nagaland", "Mizoram",
        ];
        let dataset = Dataset {
            enrollment: states
                .iter()
                .zip(1..)
                .map(|(s, v)| enrollment("2024-01-01", s, v))
                .collect(),
            ..Default::default()
        };
        let predictions = state_predictions(&dataset);
        assert_eq!(predictions.len(), MAX_STATE_PREDICTIONS);
        assert_eq!(predictions[0].state, "Mizoram");
    }

    #[test]
    fn reasons_start_with_global_factors() {
        let reasons = reason_analysis(&[prediction("Goa")]);
        assert_eq!(reasons.len(), 2);
        assert_eq!(reasons[0].factor, "Academic Cycle");
        assert_eq!(reasons[0].confidence, 92);
        assert_eq!(reasons[1].confidence, 80);
    }

    #[test]
    fn reasons_include_state_events_and_cap() {
        let reasons = reason_analysis(&[
            prediction("Maharashtra"),
            prediction("Uttar Pradesh"),
            prediction("Karnataka"),
        ]);
        assert_eq!(reasons.len(), 10);
        assert_eq!(reasons[2].factor, "Maharashtra Specific Event");
        assert_eq!(
            reasons[2].explanation,
            "SSC/HSC Results - High demographic updates expected"
        );
        assert_eq!(reasons[2].state.as_deref(), Some("Maharashtra"));
        assert_eq!(reasons[9].factor, "Karnataka Specific Event");
        assert_eq!(reasons[8].explanation, "Election Verification - Update surge");
        assert_eq!(
            reasons[9].explanation,
            "IT Sector Joining - Demographic update peak"
        );
    }

    #[test]
    fn insights_cover_dominance_spikes_and_staffing() {
        let mut top = prediction("Bihar");
        top.dominant = Vertical::Demographic;
        let anomaly = Anomaly {
            date: "2024-07-01".to_string(),
            state: "Bihar".to_string(),
            district: "Patna".to_string(),
            vertical: Vertical::Enrollment,
            value: 900,
            direction: AnomalyDirection::Spike,
            severity: AnomalySeverity::High,
            z_score: 5.2,
            reason: "Scholarship Season - Surge in children enrollment".to_string(),
        };

        let insights = generate_insights(&[top], &[anomaly]);
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].title, "Dominant Activity in Bihar");
        assert_eq!(
            insights[0].description,
            "Bihar shows Demographic as the primary activity. This suggests high demographic \
             demand in the region."
        );
        assert_eq!(
            insights[1].description,
            "Found 1 high-severity spikes. Primary cause likely Scholarship Season - Surge in \
             children enrollment."
        );
        assert_eq!(insights[2].priority, InsightPriority::Medium);

        let only_staffing = generate_insights(&[], &[]);
        assert_eq!(only_staffing.len(), 1);
        assert_eq!(only_staffing[0].kind, InsightKind::Recommendation);
    }
}
