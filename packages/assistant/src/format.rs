//! Number formatting for answers.

use num_format::{Locale, ToFormattedString};

/// Formats a count with comma thousands separators (`1234567` becomes
/// `"1,234,567"`).
#[must_use]
pub fn format_count(value: u64) -> String {
    value.to_formatted_string(&Locale::en)
}

/// `part` as a percentage of `whole` with one decimal place, `"0.0"` when
/// `whole` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", part as f64 / whole as f64 * 100.0)
}

/// `total / count` rounded to the nearest integer, `0` when `count` is zero.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn rounded_average(total: u64, count: usize) -> u64 {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(70), "70");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_count(100_000), "100,000");
    }

    #[test]
    fn percentages() {
        assert_eq!(percent(1, 3), "33.3");
        assert_eq!(percent(5, 0), "0.0");
        assert_eq!(percent(10, 10), "100.0");
    }

    #[test]
    fn averages() {
        assert_eq!(rounded_average(10, 4), 3);
        assert_eq!(rounded_average(10, 0), 0);
    }
}
