//! Linear-trend plus seasonal-multiplier projection of monthly totals.

use aadhaar_insights_analytics_models::{
    AnalyticsConfig, ForecastPoint, MonthlyTrendPoint, TrendDirection,
};
use aadhaar_insights_record_models::Vertical;

use crate::dates::format_long_month;

/// Seasonal multipliers for January through December.
///
/// Reflect the academic admission cycle (Jul-Sep peaks) and the monsoon and
/// festive slowdowns.
pub const SEASONAL_FACTORS: [f64; 12] = [
    0.95, 0.90, 1.15, 1.05, 0.85, 0.80, 1.10, 1.20, 1.15, 1.05, 0.95, 0.85,
];

/// Multiplier for a 1-indexed calendar month, `1.0` if out of range.
#[must_use]
pub fn seasonal_factor(month: u32) -> f64 {
    month
        .checked_sub(1)
        .and_then(|idx| usize::try_from(idx).ok())
        .and_then(|idx| SEASONAL_FACTORS.get(idx))
        .copied()
        .unwrap_or(1.0)
}

fn parse_month_key(key: &str) -> Option<(i32, u32)> {
    let (year, month) = key.split_once('-')?;
    let year = year.parse().ok()?;
    let month = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

/// Classifies a per-step trend against a band around the mean.
#[must_use]
pub fn trend_direction(trend: f64, mean: f64, band: f64) -> TrendDirection {
    if trend > mean * band {
        TrendDirection::Up
    } else if trend < -mean * band {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn project_vertical(
    history: &[MonthlyTrendPoint],
    vertical: Vertical,
    (year, month): (i32, u32),
    config: &AnalyticsConfig,
) -> Vec<ForecastPoint> {
    let values: Vec<f64> = history
        .iter()
        .map(|p| p.totals.get(vertical) as f64)
        .collect();
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let trend = match (values.first(), values.last()) {
        (Some(first), Some(last)) => (last - first) / n,
        _ => 0.0,
    };
    let direction = trend_direction(trend, mean, config.trend_band);

    (1..=config.forecast_horizon)
        .map(|step| {
            let offset = (month - 1).saturating_add(step);
            let future_month = offset % 12 + 1;
            let future_year = year.saturating_add(i32::try_from(offset / 12).unwrap_or(i32::MAX));
            let raw = (mean + trend * (n + f64::from(step))) * seasonal_factor(future_month);

            ForecastPoint {
                label: format_long_month(future_year, future_month),
                year: future_year,
                month: future_month,
                vertical,
                predicted: raw.round().max(0.0) as u64,
                confidence: config.confidence_at(step),
                trend: direction,
            }
        })
        .collect()
}

/// Projects each vertical `config.forecast_horizon` months past the last
/// historical month.
///
/// Needs at least two historical points; returns an empty list otherwise.
/// Output is grouped by vertical (enrollment, demographic, biometric), each
/// in chronological order.
#[must_use]
pub fn forecast(history: &[MonthlyTrendPoint], config: &AnalyticsConfig) -> Vec<ForecastPoint> {
    if history.len() < 2 {
        log::debug!(
            "forecast: {} monthly points, need at least 2",
            history.len()
        );
        return Vec::new();
    }

    let Some(anchor) = history.last().and_then(|p| parse_month_key(&p.month_key)) else {
        log::warn!("forecast: unparseable month key in history");
        return Vec::new();
    };

    Vertical::ALL
        .into_iter()
        .flat_map(|vertical| project_vertical(history, vertical, anchor, config))
        .collect()
}
