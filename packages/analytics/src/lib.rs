#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory analytics over Aadhaar enrollment and update records.
//!
//! Every public function is a pure derivation of a [`Dataset`]: nothing is
//! cached and every call recomputes from the current records. Malformed
//! input never produces an error here. Unparseable dates, unknown states
//! and short series are filtered or defaulted instead.
//!
//! [`Dataset`]: aadhaar_insights_record_models::Dataset

pub mod aggregate;
pub mod anomaly;
pub mod dates;
pub mod forecast;
pub mod outlook;
pub mod quality;

pub use aadhaar_insights_analytics_models::AnalyticsConfig;

use thiserror::Error;

/// Errors that can occur while configuring the analytics engine.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Configuration text could not be parsed.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration values are out of range.
    #[error("Config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// Parses an [`AnalyticsConfig`] from TOML text and validates it.
///
/// Keys absent from the text keep their defaults.
///
/// # Errors
///
/// * If the text is not valid TOML or a key has the wrong type
/// * If a value fails [`validate_config`]
pub fn parse_config(text: &str) -> Result<AnalyticsConfig, AnalyticsError> {
    let config: AnalyticsConfig = toml::from_str(text)?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that thresholds are positive and ordered.
///
/// # Errors
///
/// * If the z-score threshold is not a positive number
/// * If the high-severity threshold is below the z-score threshold
/// * If the minimum group size is below 2 (a single point has no spread)
/// * If the confidence floor exceeds the starting confidence
/// * If the trend band is negative
pub fn validate_config(config: &AnalyticsConfig) -> Result<(), AnalyticsError> {
    if !(config.z_score_threshold.is_finite() && config.z_score_threshold > 0.0) {
        return Err(config_error("z_score_threshold must be a positive number"));
    }
    if !config.high_severity_threshold.is_finite()
        || config.high_severity_threshold < config.z_score_threshold
    {
        return Err(config_error("high_severity_threshold must be at least z_score_threshold"));
    }
    if config.min_group_size < 2 {
        return Err(config_error("min_group_size must be at least 2"));
    }
    if config.confidence_floor > config.confidence_start {
        return Err(config_error("confidence_floor must not exceed confidence_start"));
    }
    if !(config.trend_band.is_finite() && config.trend_band >= 0.0) {
        return Err(config_error("trend_band must be a non-negative number"));
    }

    Ok(())
}

fn config_error(message: &str) -> AnalyticsError {
    AnalyticsError::Config {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn partial_config_overrides_named_keys() {
        let config = parse_config("z_score_threshold = 3.0\nforecast_horizon = 12\n").unwrap();
        assert!((config.z_score_threshold - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.forecast_horizon, 12);
        assert_eq!(config.max_anomalies, 15);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let err = parse_config("z_score_threshold = 5.0\nhigh_severity_threshold = 4.0\n")
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::Config { .. }));
    }

    #[test]
    fn rejects_wrong_types() {
        let err = parse_config("min_group_size = \"three\"").unwrap_err();
        assert!(matches!(err, AnalyticsError::Toml(_)));
    }
}
