//! CSV → record conversion.
//!
//! Headers are trimmed, lower-cased and have whitespace runs replaced by
//! `_`. Missing cells read as empty strings and numeric cells follow
//! leading-integer semantics (see [`parse_count`]). State text is
//! normalized on the way in.

use std::io::Read;

use aadhaar_insights_record_models::{
    BiometricRecord, DemographicRecord, EnrollmentRecord, Vertical,
};
use aadhaar_insights_region::normalize_state_name;
use csv::StringRecord;

use crate::IngestError;

/// Records parsed from a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordBatch {
    Enrollment(Vec<EnrollmentRecord>),
    Demographic(Vec<DemographicRecord>),
    Biometric(Vec<BiometricRecord>),
}

impl RecordBatch {
    #[must_use]
    pub const fn vertical(&self) -> Vertical {
        match self {
            Self::Enrollment(_) => Vertical::Enrollment,
            Self::Demographic(_) => Vertical::Demographic,
            Self::Biometric(_) => Vertical::Biometric,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Enrollment(records) => records.len(),
            Self::Demographic(records) => records.len(),
            Self::Biometric(records) => records.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored (normalized) state of every record, in order.
    #[must_use]
    pub fn states(&self) -> Vec<&str> {
        match self {
            Self::Enrollment(records) => records.iter().map(|r| r.state.as_str()).collect(),
            Self::Demographic(records) => records.iter().map(|r| r.state.as_str()).collect(),
            Self::Biometric(records) => records.iter().map(|r| r.state.as_str()).collect(),
        }
    }
}

/// Canonical form of a header cell.
#[must_use]
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Leading integer of a cell.
///
/// Leading whitespace and an optional sign are accepted, then as many
/// digits as follow. Cells without digits and negative values read as `0`;
/// values too large for `u64` saturate.
#[must_use]
pub fn parse_count(cell: &str) -> u64 {
    let cell = cell.trim_start();
    let (negative, rest) = match cell.as_bytes().first() {
        Some(b'-') => (true, &cell[1..]),
        Some(b'+') => (false, &cell[1..]),
        _ => (false, cell),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() || negative {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// One data row viewed through the normalized header names.
struct Row<'a> {
    headers: &'a [String],
    record: &'a StringRecord,
}

impl Row<'_> {
    fn get(&self, name: &str) -> &str {
        self.headers
            .iter()
            .position(|h| h == name)
            .and_then(|idx| self.record.get(idx))
            .map_or("", str::trim)
    }

    /// First non-empty cell among `names`.
    fn first_of(&self, names: &[&str]) -> &str {
        names
            .iter()
            .map(|name| self.get(name))
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }

    fn count(&self, name: &str) -> u64 {
        parse_count(self.get(name))
    }

    fn state(&self) -> String {
        normalize_state_name(self.get("state"))
    }
}

/// Guesses the vertical from the age columns a header row carries.
///
/// # Errors
///
/// * If none of the known age columns are present
pub fn detect_vertical(headers: &[String]) -> Result<Vertical, IngestError> {
    let has = |prefix: &str| headers.iter().any(|h| h.starts_with(prefix));
    if has("age_0_5") || has("age_18") {
        Ok(Vertical::Enrollment)
    } else if has("demo_age") {
        Ok(Vertical::Demographic)
    } else if has("bio_age") {
        Ok(Vertical::Biometric)
    } else {
        Err(IngestError::UnknownVertical {
            name: headers.join(","),
        })
    }
}

fn read_rows<R: Read>(input: R) -> Result<(Vec<String>, Vec<StringRecord>), IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
    Ok((headers, rows))
}

fn convert(vertical: Vertical, headers: &[String], rows: &[StringRecord]) -> RecordBatch {
    let rows = rows.iter().map(|record| Row { headers, record });
    match vertical {
        Vertical::Enrollment => RecordBatch::Enrollment(
            rows.map(|row| EnrollmentRecord {
                date: row.get("date").to_string(),
                state: row.state(),
                district: row.get("district").to_string(),
                pincode: row.get("pincode").to_string(),
                age_0_5: row.count("age_0_5"),
                age_5_17: row.count("age_5_17"),
                age_18_greater: row.count("age_18_greater"),
            })
            .collect(),
        ),
        Vertical::Demographic => RecordBatch::Demographic(
            rows.map(|row| DemographicRecord {
                date: row.get("date").to_string(),
                state: row.state(),
                district: row.get("district").to_string(),
                pincode: row.get("pincode").to_string(),
                demo_age_5_17: row.count("demo_age_5_17"),
                demo_age_17_plus: parse_count(
                    row.first_of(&["demo_age_17_", "demo_age_17_plus"]),
                ),
            })
            .collect(),
        ),
        Vertical::Biometric => RecordBatch::Biometric(
            rows.map(|row| BiometricRecord {
                date: row.get("date").to_string(),
                state: row.state(),
                district: row.get("district").to_string(),
                pincode: row.get("pincode").to_string(),
                bio_age_5_17: row.count("bio_age_5_17"),
                bio_age_17_plus: parse_count(row.first_of(&["bio_age_17_", "bio_age_17_plus"])),
            })
            .collect(),
        ),
    }
}

/// Parses CSV text as records of the given vertical.
///
/// # Errors
///
/// * If the header row cannot be read
/// * If a data row is not valid CSV
pub fn read_batch<R: Read>(vertical: Vertical, input: R) -> Result<RecordBatch, IngestError> {
    let (headers, rows) = read_rows(input)?;
    Ok(convert(vertical, &headers, &rows))
}

/// Parses CSV text, choosing the vertical with [`detect_vertical`].
///
/// # Errors
///
/// * If the CSV cannot be read
/// * If the header row matches no vertical
pub fn read_detected<R: Read>(input: R) -> Result<RecordBatch, IngestError> {
    let (headers, rows) = read_rows(input)?;
    let vertical = detect_vertical(&headers)?;
    Ok(convert(vertical, &headers, &rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_normalized() {
        assert_eq!(normalize_header("  Age 0 5 "), "age_0_5");
        assert_eq!(normalize_header("Demo\tAge  17"), "demo_age_17");
        assert_eq!(normalize_header("STATE"), "state");
    }

    #[test]
    fn leading_integer_semantics() {
        assert_eq!(parse_count("42"), 42);
        assert_eq!(parse_count("  17abc"), 17);
        assert_eq!(parse_count("3.9"), 3);
        assert_eq!(parse_count("+8"), 8);
        assert_eq!(parse_count("-5"), 0);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn enrollment_rows() {
        let csv = "Date, State ,District,Pincode,Age 0 5,age_5_17,age_18_greater\n\
                   2024-06-01,maharashtra,Pune,411001,10,20,5\n\
                   2024-06-02,MH,Mumbai,400001,x,-3\n";
        let RecordBatch::Enrollment(records) =
            read_batch(Vertical::Enrollment, csv.as_bytes()).unwrap()
        else {
            panic!("expected enrollment batch");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].state, "Maharashtra");
        assert_eq!(records[0].district, "Pune");
        assert_eq!(records[0].age_0_5, 10);
        assert_eq!(records[0].age_18_greater, 5);
        assert_eq!(records[1].state, "Maharashtra");
        assert_eq!(records[1].age_0_5, 0);
        assert_eq!(records[1].age_5_17, 0);
        assert_eq!(records[1].age_18_greater, 0);
    }

    #[test]
    fn alternate_adult_headers() {
        let csv = "date,state,district,pincode,demo_age_5_17,demo_age_17_\n\
                   2024-06-01,Kerala,Kochi,682001,4,9\n";
        let RecordBatch::Demographic(records) =
            read_batch(Vertical::Demographic, csv.as_bytes()).unwrap()
        else {
            panic!("expected demographic batch");
        };
        assert_eq!(records[0].demo_age_17_plus, 9);

        let csv = "date,state,district,pincode,bio_age_5_17,bio_age_17_plus\n\
                   2024-06-01,Kerala,Kochi,682001,1,2\n";
        let RecordBatch::Biometric(records) =
            read_batch(Vertical::Biometric, csv.as_bytes()).unwrap()
        else {
            panic!("expected biometric batch");
        };
        assert_eq!(records[0].bio_age_17_plus, 2);
    }

    #[test]
    fn vertical_is_detected_from_headers() {
        let batch = read_detected(
            "date,state,district,pincode,bio_age_5_17,bio_age_17_\n2024-01-01,Goa,North Goa,403001,1,1\n"
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(batch.vertical(), Vertical::Biometric);
        assert_eq!(batch.len(), 1);

        let err = read_detected("date,state,count\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::UnknownVertical { .. }));
    }
}
