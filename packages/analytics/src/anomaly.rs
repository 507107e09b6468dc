//! Z-score outlier detection per (state, district, vertical) series.

use std::collections::HashMap;

use aadhaar_insights_analytics_models::{
    AnalyticsConfig, Anomaly, AnomalyDirection, AnomalySeverity,
};
use aadhaar_insights_record_models::{Dataset, Record, Vertical};
use aadhaar_insights_region::normalize_state_name;
use chrono::Datelike;

use crate::dates::parse_date;

/// Reason attached when the event calendar has no entry.
pub const GENERIC_REASON: &str = "Data synchronization spike";

/// Known regional events by state and 1-indexed calendar month.
pub const STATE_EVENTS: &[(&str, &[(u32, &str)])] = &[
    (
        "Maharashtra",
        &[
            (6, "SSC/HSC Results - High demographic updates expected"),
            (7, "Academic Admissions - Spike in new enrollments"),
            (10, "Diwali Festive Period - Slowdown in biometric updates"),
        ],
    ),
    (
        "Uttar Pradesh",
        &[
            (3, "Board Exams - Verification peak"),
            (7, "New Welfare Scheme Launch - Mass enrollment drives"),
            (12, "Year-end Audit - Data cleanup activity"),
        ],
    ),
    (
        "Karnataka",
        &[
            (5, "Election Verification - Update surge"),
            (6, "IT Sector Joining - Demographic update peak"),
            (9, "Dasara Holidays - Operational dip"),
        ],
    ),
    (
        "Bihar",
        &[
            (7, "Scholarship Season - Surge in children enrollment"),
            (8, "Monsoon Impact - Regional accessibility drops"),
        ],
    ),
];

/// All calendar entries for a state, in month order.
#[must_use]
pub fn state_events(state: &str) -> &'static [(u32, &'static str)] {
    STATE_EVENTS
        .iter()
        .find(|(name, _)| *name == state)
        .map_or(&[] as &[_], |(_, events)| *events)
}

/// The calendar entry for a state in a given month, if any.
#[must_use]
pub fn state_event(state: &str, month: u32) -> Option<&'static str> {
    state_events(state)
        .iter()
        .find(|(m, _)| *m == month)
        .map(|(_, event)| *event)
}

struct Group<'a> {
    state: String,
    district: String,
    records: Vec<&'a dyn Record>,
}

fn group_records(dataset: &Dataset, vertical: Vertical) -> Vec<Group<'_>> {
    let mut groups: Vec<Group<'_>> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for record in dataset.records_of(vertical) {
        let state = normalize_state_name(record.state());
        if state.is_empty() {
            continue;
        }
        let key = (state, record.district().to_string());
        let idx = if let Some(&idx) = index.get(&key) {
            idx
        } else {
            groups.push(Group {
                state: key.0.clone(),
                district: key.1.clone(),
                records: Vec::new(),
            });
            index.insert(key, groups.len() - 1);
            groups.len() - 1
        };
        groups[idx].records.push(record);
    }

    groups
}

/// Population mean and standard deviation (divisor `n`).
#[allow(clippy::cast_precision_loss)]
fn mean_and_std_dev(values: &[u64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

#[allow(clippy::cast_precision_loss)]
fn scan_group(group: &Group<'_>, vertical: Vertical, config: &AnalyticsConfig) -> Vec<Anomaly> {
    let values: Vec<u64> = group.records.iter().map(|r| r.total()).collect();
    let (mean, std_dev) = mean_and_std_dev(&values);

    let mut found = Vec::new();
    for (idx, (record, &value)) in group.records.iter().zip(&values).enumerate() {
        let z_score = if std_dev > 0.0 {
            (value as f64 - mean) / std_dev
        } else {
            0.0
        };
        if z_score.abs() <= config.z_score_threshold {
            continue;
        }

        let parsed = parse_date(record.date());
        let date = if parsed.is_some() {
            record.date().to_string()
        } else {
            format!("Entry {}", idx + 1)
        };
        let reason = parsed
            .and_then(|d| state_event(&group.state, d.month()))
            .unwrap_or(GENERIC_REASON);

        found.push(Anomaly {
            date,
            state: group.state.clone(),
            district: group.district.clone(),
            vertical,
            value,
            direction: if z_score > 0.0 {
                AnomalyDirection::Spike
            } else {
                AnomalyDirection::Drop
            },
            severity: if z_score.abs() > config.high_severity_threshold {
                AnomalySeverity::High
            } else {
                AnomalySeverity::Medium
            },
            z_score,
            reason: reason.to_string(),
        });
    }
    found
}

/// Flags outlying records across all three verticals.
///
/// Records are grouped by (normalized state, district); records whose state
/// normalizes to nothing are skipped. Groups smaller than
/// `config.min_group_size` are never scored. Results are ordered high
/// severity first (stable otherwise) and truncated to
/// `config.max_anomalies`.
#[must_use]
pub fn detect_anomalies(dataset: &Dataset, config: &AnalyticsConfig) -> Vec<Anomaly> {
    let mut detected = Vec::new();

    for vertical in Vertical::ALL {
        let groups = group_records(dataset, vertical);
        let mut scored = 0_usize;
        for group in &groups {
            if group.records.len() < config.min_group_size {
                continue;
            }
            scored += 1;
            detected.extend(scan_group(group, vertical, config));
        }
        log::debug!(
            "detect_anomalies: {vertical}: scored {scored} of {} groups",
            groups.len()
        );
    }

    detected.sort_by_key(|a| a.severity);
    detected.truncate(config.max_anomalies);
    detected
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
            pincode: "400001".to_string(),
            age_0_5: total,
            age_5_17: 0,
            age_18_greater: 0,
        }
    }

    fn series(
        state: &str,
        district: &str,
        baseline: usize,
        outlier_date: &str,
        outlier: u64,
    ) -> Vec<EnrollmentRecord> {
        let mut records: Vec<EnrollmentRecord> = (0..baseline)
            .map(|_| enrollment("2024-01-15", state, district, 10))
            .collect();
        records.push(enrollment(outlier_date, state, district, outlier));
        records
    }

    #[test]
    fn large_group_outlier_is_high_severity() {
        let dataset = Dataset {
            enrollment: series("Maharashtra", "Pune", 29, "2024-07-10", 100),
            ..Default::default()
        };
        let anomalies = detect_anomalies(&dataset, &AnalyticsConfig::default());
        assert_eq!(anomalies.len(), 1);

        let a = &anomalies[0];
        assert_eq!(a.severity, AnomalySeverity::High);
        assert_eq!(a.direction, AnomalyDirection::Spike);
        assert_eq!(a.value, 100);
        assert_eq!(a.state, "Maharashtra");
        assert_eq!(a.district, "Pune");
        assert_eq!(a.vertical, Vertical::Enrollment);
        assert_eq!(a.reason, "Academic Admissions - Spike in new enrollments");
        assert!(a.z_score > 5.0);
    }

    #[test]
    fn small_group_outlier_is_medium_severity() {
        // With one outlier among n points |z| is at most sqrt(n - 1).
        let dataset = Dataset {
            enrollment: series("Goa", "North Goa", 10, "2024-03-01", 1_000),
            ..Default::default()
        };
        let anomalies = detect_anomalies(&dataset, &AnalyticsConfig::default());
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].severity, AnomalySeverity::Medium);
        assert_eq!(anomalies[0].reason, GENERIC_REASON);
    }

    #[test]
    fn drops_are_flagged() {
        let mut records: Vec<EnrollmentRecord> = (0..29)
            .map(|_| enrollment("2024-01-15", "Kerala", "Kochi", 100))
            .collect();
        records.push(enrollment("2024-01-16", "Kerala", "Kochi", 0));
        let dataset = Dataset {
            enrollment: records,
            ..Default::default()
        };
        let anomalies = detect_anomalies(&dataset, &AnalyticsConfig::default());
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].direction, AnomalyDirection::Drop);
    }

    #[test]
    fn groups_under_three_are_never_flagged() {
        let dataset = Dataset {
            enrollment: vec![
                enrollment("2024-01-01", "Bihar", "Patna", 1),
                enrollment("2024-01-02", "Bihar", "Patna", 1_000_000),
            ],
            ..Default::default()
        };
        assert!(detect_anomalies(&dataset, &AnalyticsConfig::default()).is_empty());
    }

    #[test]
    fn constant_series_is_never_flagged() {
        let dataset = Dataset {
            enrollment: series("Bihar", "Patna", 20, "2024-01-15", 10),
            ..Default::default()
        };
        assert!(detect_anomalies(&dataset, &AnalyticsConfig::default()).is_empty());
    }

    #[test]
    fn undated_outlier_uses_entry_placeholder() {
        let dataset = Dataset {
            enrollment: series("Maharashtra", "Pune", 29, "", 100),
            ..Default::default()
        };
        let anomalies = detect_anomalies(&dataset, &AnalyticsConfig::default());
        assert_eq!(anomalies[0].date, "Entry 30");
        assert_eq!(anomalies[0].reason, GENERIC_REASON);
    }

    #[test]
    fn high_severity_sorts_first_and_list_is_capped() {
        let mut enrollment_records = Vec::new();
        for i in 0..20 {
            enrollment_records.extend(series("Goa", &format!("D{i}"), 10, "2024-03-01", 1_000));
        }
        let demographic = series("Karnataka", "Mysuru", 29, "2024-06-03", 500)
            .into_iter()
            .map(|r| DemographicRecord {
                date: r.date,
                state: r.state,
                district: r.district,
                pincode: r.pincode,
                demo_age_5_17: r.age_0_5,
                demo_age_17_plus: 0,
            })
            .collect();
        let dataset = Dataset {
            enrollment: enrollment_records,
            demographic,
            ..Default::default()
        };

        let anomalies = detect_anomalies(&dataset, &AnalyticsConfig::default());
        assert_eq!(anomalies.len(), 15);
        assert_eq!(anomalies[0].severity, AnomalySeverity::High);
        assert_eq!(anomalies[0].vertical, Vertical::Demographic);
        assert_eq!(anomalies[0].reason, "IT Sector Joining - Demographic update peak");
        assert!(anomalies[1..].iter().all(|a| a.severity == AnomalySeverity::Medium));
        assert_eq!(anomalies[1].district, "D0");
    }

    #[test]
    fn event_calendar_lookup() {
        assert_eq!(
            state_event("Bihar", 8),
            Some("Monsoon Impact - Regional accessibility drops")
        );
        assert_eq!(state_event("Bihar", 1), None);
        assert_eq!(state_event("Goa", 7), None);
        assert_eq!(state_events("Uttar Pradesh").len(), 3);
    }
}
