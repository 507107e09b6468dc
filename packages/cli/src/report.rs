//! Text and JSON rendering of command results.

use aadhaar_insights_analytics::aggregate::{age_breakdown, state_rollup, vertical_totals};
use aadhaar_insights_analytics::quality::data_quality;
use aadhaar_insights_analytics_models::{
    AgeBreakdown, Anomaly, DataQualityReport, DateRange, ForecastPoint, Insight, MapMetric,
    ReasonFactor, StateIntensity, StatePrediction, VerticalTotals,
};
use aadhaar_insights_assistant::{Resolution, format_count};
use aadhaar_insights_record_models::{Dataset, Vertical};
use serde::Serialize;

/// Headline numbers for the whole dataset.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Overview {
    enrollment_records: usize,
    demographic_records: usize,
    biometric_records: usize,
    totals: VerticalTotals,
    states: usize,
    date_range: DateRange,
    ages: AgeBreakdown,
}

/// Where results go.
pub struct Output {
    pub json: bool,
}

fn total_row(name: &str, totals: &VerticalTotals) -> String {
    format!(
        "{name:<32} {:>14} {:>14} {:>14} {:>14}",
        format_count(totals.enrollment),
        format_count(totals.demographic),
        format_count(totals.biometric),
        format_count(totals.total()),
    )
}

impl Output {
    fn emit<T: Serialize + ?Sized>(
        &self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }

    pub fn summary(&self, dataset: &Dataset) -> Result<(), serde_json::Error> {
        let overview = Overview {
            enrollment_records: dataset.count(Vertical::Enrollment),
            demographic_records: dataset.count(Vertical::Demographic),
            biometric_records: dataset.count(Vertical::Biometric),
            totals: vertical_totals(dataset),
            states: state_rollup(dataset).len(),
            date_range: data_quality(dataset).date_range,
            ages: age_breakdown(dataset),
        };
        self.emit(&overview, || {
            let mut lines = vec![
                format!(
                    "Records: {} enrollment, {} demographic, {} biometric",
                    format_count(overview.enrollment_records as u64),
                    format_count(overview.demographic_records as u64),
                    format_count(overview.biometric_records as u64),
                ),
                format!("States: {}", overview.states),
                format!(
                    "Dates: {} to {}",
                    overview.date_range.start, overview.date_range.end
                ),
                String::new(),
            ];
            for vertical in Vertical::ALL {
                lines.push(format!(
                    "{:<14} {:>14}",
                    vertical.plural(),
                    format_count(overview.totals.get(vertical))
                ));
            }
            lines.push(format!(
                "{:<14} {:>14}",
                "Total",
                format_count(overview.totals.total())
            ));
            lines.join("\n")
        })
    }

    pub fn quality(&self, report: &DataQualityReport) -> Result<(), serde_json::Error> {
        self.emit(report, || {
            format!(
                "Records:        {}\n\
                 States:         {}\n\
                 Districts:      {}\n\
                 Date range:     {} to {}\n\
                 Missing values: {}\n\
                 Duplicates:     {}\n\
                 Completeness:   {}%",
                format_count(report.total_records as u64),
                report.unique_states,
                report.unique_districts,
                report.date_range.start,
                report.date_range.end,
                format_count(report.missing_values as u64),
                format_count(report.duplicates as u64),
                report.completeness,
            )
        })
    }

    /// A table of named per-vertical totals.
    pub fn areas<'a, T: Serialize + ?Sized>(
        &self,
        label: &str,
        rows: impl Iterator<Item = (&'a str, &'a VerticalTotals)>,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        self.emit(value, || {
            let mut lines = vec![
                format!(
                    "{label:<32} {:>14} {:>14} {:>14} {:>14}",
                    "Enrollment", "Demographic", "Biometric", "Total"
                ),
                "-".repeat(92),
            ];
            lines.extend(rows.map(|(name, totals)| total_row(name, totals)));
            if lines.len() == 2 {
                lines.push("(no matching records)".to_string());
            }
            lines.join("\n")
        })
    }

    pub fn ages(&self, ages: &AgeBreakdown) -> Result<(), serde_json::Error> {
        self.emit(ages, || {
            [
                ("Enrollment 0-5", ages.enrollment_0_5),
                ("Enrollment 5-17", ages.enrollment_5_17),
                ("Enrollment 18+", ages.enrollment_18_plus),
                ("Demographic 5-17", ages.demographic_5_17),
                ("Demographic 17+", ages.demographic_17_plus),
                ("Biometric 5-17", ages.biometric_5_17),
                ("Biometric 17+", ages.biometric_17_plus),
            ]
            .iter()
            .map(|(name, value)| format!("{name:<18} {:>14}", format_count(*value)))
            .collect::<Vec<_>>()
            .join("\n")
        })
    }

    pub fn map(&self, metric: MapMetric, states: &[StateIntensity]) -> Result<(), serde_json::Error> {
        self.emit(states, || {
            let mut lines = vec![format!("Metric: {metric}")];
            lines.extend(states.iter().map(|s| {
                format!(
                    "{:<40} {:>14}  {}",
                    s.state,
                    format_count(s.value),
                    s.band.as_ref()
                )
            }));
            lines.join("\n")
        })
    }

    pub fn anomalies(&self, anomalies: &[Anomaly]) -> Result<(), serde_json::Error> {
        self.emit(anomalies, || {
            if anomalies.is_empty() {
                return "No anomalies detected".to_string();
            }
            anomalies
                .iter()
                .map(|a| {
                    format!(
                        "[{}] {} {} / {} {} {} {} (z = {:.2})\n    {}",
                        a.severity,
                        a.date,
                        a.state,
                        a.district,
                        a.vertical,
                        a.direction,
                        format_count(a.value),
                        a.z_score,
                        a.reason,
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    pub fn forecast(&self, points: &[ForecastPoint]) -> Result<(), serde_json::Error> {
        self.emit(points, || {
            if points.is_empty() {
                return "Not enough monthly history to forecast (need at least 2 months)"
                    .to_string();
            }
            points
                .iter()
                .map(|p| {
                    format!(
                        "{:<10} {:<12} {:>14} {:>4}% {}",
                        p.label,
                        p.vertical.as_ref(),
                        format_count(p.predicted),
                        p.confidence,
                        p.trend,
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    pub fn predictions(&self, predictions: &[StatePrediction]) -> Result<(), serde_json::Error> {
        self.emit(predictions, || {
            predictions
                .iter()
                .map(|p| {
                    format!(
                        "{:<40} {:>14}  peak {}  {:<12} {:+.1}%",
                        p.state,
                        format_count(p.totals.total()),
                        p.peak_month,
                        p.dominant.as_ref(),
                        p.predicted_growth,
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    pub fn reasons(&self, reasons: &[ReasonFactor]) -> Result<(), serde_json::Error> {
        self.emit(reasons, || {
            reasons
                .iter()
                .map(|r| {
                    let scope = r.state.as_deref().unwrap_or("All India");
                    format!(
                        "{} [{scope}] ({}, {}%)\n    {}",
                        r.factor, r.impact, r.confidence, r.explanation
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    pub fn insights(&self, insights: &[Insight]) -> Result<(), serde_json::Error> {
        self.emit(insights, || {
            insights
                .iter()
                .map(|i| format!("[{}] {}\n    {}", i.priority, i.title, i.description))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    pub fn answer(&self, resolution: &Resolution) -> Result<(), serde_json::Error> {
        self.emit(resolution, || resolution.text.clone())
    }
}
