//! Data-quality diagnostics.

use std::collections::{BTreeSet, HashSet};

use aadhaar_insights_analytics_models::{DataQualityReport, DateRange};
use aadhaar_insights_record_models::{Dataset, FIELDS_PER_RECORD, Record};
use aadhaar_insights_region::{is_canonical, normalize_state_name};

/// Summarizes coverage, missing fields and duplicate keys.
///
/// The date range is a string-order min/max over non-empty date text, not a
/// chronological one. Duplicates count every record whose
/// (date, normalized state, district, pincode) key was already seen.
#[must_use]
pub fn data_quality(dataset: &Dataset) -> DataQualityReport {
    let mut states = HashSet::new();
    let mut districts = HashSet::new();
    let mut dates = BTreeSet::new();
    let mut seen = HashSet::new();
    let mut missing_values = 0;
    let mut duplicates = 0;

    for record in dataset.records() {
        let state = normalize_state_name(record.state());

        if !record.district().is_empty() {
            districts.insert(record.district());
        }
        if !record.date().is_empty() {
            dates.insert(record.date());
        }
        missing_values += record.missing_fields();

        let key = (
            record.date(),
            state.clone(),
            record.district(),
            record.pincode(),
        );
        if !seen.insert(key) {
            duplicates += 1;
        }

        if is_canonical(&state) {
            states.insert(state);
        }
    }

    let total_records = dataset.len();
    let date_range = match (dates.first(), dates.last()) {
        (Some(start), Some(end)) => DateRange {
            start: (*start).to_string(),
            end: (*end).to_string(),
        },
        _ => DateRange::default(),
    };

    log::debug!(
        "data_quality: {total_records} records, {missing_values} missing fields, {duplicates} duplicates"
    );

    DataQualityReport {
        total_records,
        unique_states: states.len(),
        unique_districts: districts.len(),
        date_range,
        missing_values,
        duplicates,
        completeness: completeness(total_records * FIELDS_PER_RECORD, missing_values),
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn completeness(total_fields: usize, missing: usize) -> u32 {
    if total_fields == 0 {
        return 0;
    }
    let present = total_fields.saturating_sub(missing) as f64;
    (present / total_fields as f64 * 100.0).round() as u32
}
