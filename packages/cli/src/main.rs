#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the Aadhaar insights toolchain.
//!
//! Loads the CSV files named by a manifest and/or per-vertical flags, then
//! runs one analytic command. Without a subcommand it opens an interactive
//! `dialoguer` menu instead.
//!
//! Uses `indicatif-log-bridge` (via [`aadhaar_insights_cli_utils::init_logger`])
//! so log lines and the file-loading progress bar share the terminal.

mod interactive;
mod report;

use std::path::PathBuf;

use aadhaar_insights_analytics::aggregate::{
    age_breakdown, daily_trend, district_rollup, monthly_rollup, pincode_rollup, rank_states,
    rank_states_ascending, state_intensities, state_rollup,
};
use aadhaar_insights_analytics::anomaly::detect_anomalies;
use aadhaar_insights_analytics::forecast::forecast;
use aadhaar_insights_analytics::outlook::{generate_insights, reason_analysis, state_predictions};
use aadhaar_insights_analytics::quality::data_quality;
use aadhaar_insights_analytics::{AnalyticsConfig, validate_config};
use aadhaar_insights_analytics_models::MapMetric;
use aadhaar_insights_cli_utils::{IndicatifProgress, MultiProgress};
use aadhaar_insights_ingest::{DatasetManifest, RecordStore, load_manifest, load_manifest_files};
use aadhaar_insights_record_models::Dataset;
use clap::{Parser, Subcommand};

use crate::report::Output;

#[derive(Parser)]
#[command(
    name = "aadhaar_insights_cli",
    about = "Aadhaar enrollment, demographic and biometric analytics"
)]
struct Cli {
    /// TOML manifest listing CSV files and analysis settings
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// Enrollment CSV files (repeatable or comma-separated)
    #[arg(long, value_delimiter = ',')]
    enrollment: Vec<PathBuf>,
    /// Demographic update CSV files
    #[arg(long, value_delimiter = ',')]
    demographic: Vec<PathBuf>,
    /// Biometric update CSV files
    #[arg(long, value_delimiter = ',')]
    biometric: Vec<PathBuf>,
    /// Override the anomaly z-score threshold
    #[arg(long)]
    z_threshold: Option<f64>,
    /// Override the number of forecast months
    #[arg(long)]
    horizon: Option<u32>,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Coverage, totals and age groups
    Summary,
    /// Missing values, duplicates and completeness
    Quality,
    /// State rollup ranked by combined total
    States {
        /// Only show this many states
        #[arg(long)]
        limit: Option<usize>,
        /// Lowest totals first
        #[arg(long)]
        ascending: bool,
    },
    /// District rollup within a state
    Districts {
        /// State name (aliases accepted)
        state: String,
    },
    /// Pincode rollup within a district
    Pincodes {
        /// State name (aliases accepted)
        state: String,
        /// District name as uploaded
        district: String,
    },
    /// Monthly (or daily) activity series
    Trends {
        /// Per raw date instead of per month
        #[arg(long)]
        daily: bool,
    },
    /// Age-bucket sums for every vertical
    Ages,
    /// Per-state map intensity bands
    Map {
        /// Metric to shade by (all, enrollment, demographic, biometric)
        #[arg(long, default_value = "all", value_parser = parse_metric)]
        metric: MapMetric,
    },
    /// Z-score outliers per district series
    Anomalies,
    /// Seasonal projection of monthly totals
    Forecast,
    /// Per-state peak month, dominant vertical and growth
    Predictions,
    /// Known drivers of activity
    Reasons,
    /// Headline insights
    Insights,
    /// Answer a free-text question
    Ask {
        /// The question, e.g. "top 5 states"
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive question-and-answer session
    Chat,
}

fn parse_metric(value: &str) -> Result<MapMetric, String> {
    value
        .parse()
        .map_err(|_| format!("unknown metric {value:?} (all, enrollment, demographic, biometric)"))
}

fn build_manifest(cli: &mut Cli) -> Result<DatasetManifest, Box<dyn std::error::Error>> {
    let mut manifest = match &cli.manifest {
        Some(path) => load_manifest(path)?,
        None => DatasetManifest::default(),
    };
    manifest.enrollment.append(&mut cli.enrollment);
    manifest.demographic.append(&mut cli.demographic);
    manifest.biometric.append(&mut cli.biometric);

    if let Some(threshold) = cli.z_threshold {
        manifest.analysis.z_score_threshold = threshold;
        manifest.analysis.high_severity_threshold =
            manifest.analysis.high_severity_threshold.max(threshold);
    }
    if let Some(horizon) = cli.horizon {
        manifest.analysis.forecast_horizon = horizon;
    }
    validate_config(&manifest.analysis)?;
    Ok(manifest)
}

/// Loads every file the manifest lists behind a progress bar.
fn load(multi: &MultiProgress, manifest: &DatasetManifest) -> RecordStore {
    let mut store = RecordStore::new();
    if manifest.file_count() == 0 {
        return store;
    }
    let progress = IndicatifProgress::files_bar(multi, "Loading CSV files");
    let report = load_manifest_files(&mut store, manifest, progress.as_ref());
    if report.failed() > 0 {
        log::warn!(
            "{} of {} files failed to load",
            report.failed(),
            report.outcomes.len()
        );
    }
    store
}

fn run_command(
    command: Commands,
    dataset: &Dataset,
    config: &AnalyticsConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = Output { json };
    match command {
        Commands::Summary => output.summary(dataset)?,
        Commands::Quality => output.quality(&data_quality(dataset))?,
        Commands::States { limit, ascending } => {
            let mut states = if ascending {
                rank_states_ascending(state_rollup(dataset))
            } else {
                rank_states(state_rollup(dataset))
            };
            if let Some(limit) = limit {
                states.truncate(limit);
            }
            output.areas("State", states.iter().map(|s| (s.state.as_str(), &s.totals)), &states)?;
        }
        Commands::Districts { state } => {
            let districts = district_rollup(dataset, &state);
            output.areas(
                "District",
                districts.iter().map(|d| (d.name.as_str(), &d.totals)),
                &districts,
            )?;
        }
        Commands::Pincodes { state, district } => {
            let pincodes = pincode_rollup(dataset, &state, &district);
            output.areas(
                "Pincode",
                pincodes.iter().map(|p| (p.name.as_str(), &p.totals)),
                &pincodes,
            )?;
        }
        Commands::Trends { daily } => {
            if daily {
                let points = daily_trend(dataset);
                output.areas(
                    "Date",
                    points.iter().map(|p| (p.date.as_str(), &p.totals)),
                    &points,
                )?;
            } else {
                let points = monthly_rollup(dataset);
                output.areas(
                    "Month",
                    points.iter().map(|p| (p.label.as_str(), &p.totals)),
                    &points,
                )?;
            }
        }
        Commands::Ages => output.ages(&age_breakdown(dataset))?,
        Commands::Map { metric } => {
            output.map(metric, &state_intensities(&state_rollup(dataset), metric))?;
        }
        Commands::Anomalies => output.anomalies(&detect_anomalies(dataset, config))?,
        Commands::Forecast => output.forecast(&forecast(&monthly_rollup(dataset), config))?,
        Commands::Predictions => output.predictions(&state_predictions(dataset))?,
        Commands::Reasons => output.reasons(&reason_analysis(&state_predictions(dataset)))?,
        Commands::Insights => {
            let predictions = state_predictions(dataset);
            let anomalies = detect_anomalies(dataset, config);
            output.insights(&generate_insights(&predictions, &anomalies))?;
        }
        Commands::Ask { question } => {
            output.answer(&aadhaar_insights_assistant::resolve(dataset, &question.join(" ")))?;
        }
        Commands::Chat => interactive::chat(dataset)?,
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = aadhaar_insights_cli_utils::init_logger();
    let mut cli = Cli::parse();
    let manifest = build_manifest(&mut cli)?;
    let mut store = load(&multi, &manifest);

    let Some(command) = cli.command.take() else {
        return interactive::run(&multi, &mut store, &manifest.analysis);
    };

    run_command(command, store.dataset(), &manifest.analysis, cli.json)
}
