//! Tuning knobs for anomaly detection and forecasting.

use serde::{Deserialize, Serialize};

/// Thresholds and horizons used by the analytic derivations.
///
/// Every field has a default, so a partial `[analysis]` table only
/// overrides the keys it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Observations with |z| strictly above this are flagged.
    pub z_score_threshold: f64,
    /// Flagged observations with |z| strictly above this are `High`.
    pub high_severity_threshold: f64,
    /// Groups smaller than this are never scored.
    pub min_group_size: usize,
    /// Maximum anomalies returned after ranking.
    pub max_anomalies: usize,
    /// Months projected per vertical.
    pub forecast_horizon: u32,
    /// Confidence at step zero.
    pub confidence_start: u32,
    /// Confidence lost per projected month.
    pub confidence_step: u32,
    /// Confidence never drops below this.
    pub confidence_floor: u32,
    /// Fraction of the mean a trend must exceed to count as up or down.
    pub trend_band: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            z_score_threshold: 2.5,
            high_severity_threshold: 4.0,
            min_group_size: 3,
            max_anomalies: 15,
            forecast_horizon: 6,
            confidence_start: 95,
            confidence_step: 5,
            confidence_floor: 60,
            trend_band: 0.05,
        }
    }
}

impl AnalyticsConfig {
    /// Confidence percentage for the `step`-th projected month (1-indexed).
    #[must_use]
    pub const fn confidence_at(&self, step: u32) -> u32 {
        let decayed = self
            .confidence_start
            .saturating_sub(self.confidence_step.saturating_mul(step));
        if decayed > self.confidence_floor {
            decayed
        } else {
            self.confidence_floor
        }
    }
}
