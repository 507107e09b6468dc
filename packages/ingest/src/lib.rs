#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading Aadhaar CSV exports into an in-memory [`RecordStore`].
//!
//! Files are parsed with the [`reader`] module, appended to the store and
//! logged to its activity feed. [`load_files`] processes a batch one file
//! at a time, recording a per-file outcome and carrying on past failures.

pub mod manifest;
pub mod progress;
pub mod reader;
pub mod store;

use std::path::{Path, PathBuf};

use aadhaar_insights_analytics::AnalyticsError;
use aadhaar_insights_record_models::Vertical;
use serde::Serialize;
use thiserror::Error;

pub use manifest::{DatasetManifest, load_manifest, parse_manifest};
pub use progress::{NullProgress, ProgressCallback};
pub use store::RecordStore;

/// Errors that can occur while loading records.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A file could not be opened or read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV structure was invalid.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The manifest was not valid TOML.
    #[error("Manifest error: {0}")]
    Manifest(#[from] toml::de::Error),

    /// The manifest's analysis settings were rejected.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// A file's header row matched no known vertical.
    #[error("Unknown vertical for columns: {name}")]
    UnknownVertical {
        /// The columns that were inspected.
        name: String,
    },
}

/// Result of loading one file in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    pub file: String,
    pub vertical: Vertical,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-file outcomes of a batch load, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Records appended across all successful files.
    #[must_use]
    pub fn records(&self) -> usize {
        self.outcomes.iter().map(|o| o.records).sum()
    }

    fn absorb(&mut self, other: Self) {
        self.outcomes.extend(other.outcomes);
    }
}

/// Loads each file as `vertical` records, continuing past failures.
///
/// Failed files leave the store untouched and are reported with their
/// error text.
pub fn load_files(
    store: &mut RecordStore,
    vertical: Vertical,
    paths: &[PathBuf],
    progress: &dyn ProgressCallback,
) -> BatchReport {
    progress.set_total(paths.len() as u64);
    load_batch(store, vertical, paths, progress)
}

/// Loads `paths` without touching the progress total, so several verticals
/// can share one bar.
fn load_batch(
    store: &mut RecordStore,
    vertical: Vertical,
    paths: &[PathBuf],
    progress: &dyn ProgressCallback,
) -> BatchReport {
    let mut report = BatchReport::default();

    for path in paths {
        let file = store::file_name(path);
        progress.set_message(format!("{vertical}: {file}"));

        let outcome = match store.load_path(vertical, path) {
            Ok(records) => FileOutcome {
                file,
                vertical,
                records,
                error: None,
            },
            Err(e) => {
                log::warn!("Failed to load {}: {e}", path.display());
                FileOutcome {
                    file,
                    vertical,
                    records: 0,
                    error: Some(e.to_string()),
                }
            }
        };
        report.outcomes.push(outcome);
        progress.inc(1);
    }

    if paths.len() > 1 {
        log::info!(
            "Finished processing {} {vertical} files ({} failed)",
            paths.len(),
            report.failed()
        );
    }
    report
}

/// Loads every file a manifest lists, in vertical order.
pub fn load_manifest_files(
    store: &mut RecordStore,
    manifest: &DatasetManifest,
    progress: &dyn ProgressCallback,
) -> BatchReport {
    let mut report = BatchReport::default();
    progress.set_total(manifest.file_count() as u64);
    for vertical in Vertical::ALL {
        let files = manifest.files(vertical);
        if !files.is_empty() {
            report.absorb(load_batch(store, vertical, files, progress));
        }
    }
    progress.finish(format!(
        "Loaded {} records from {} files",
        report.records(),
        report.succeeded()
    ));
    report
}

/// Loads a single file whose vertical is inferred from its headers.
///
/// # Errors
///
/// * If the file cannot be read or parsed
/// * If the header row matches no vertical
pub fn load_any(store: &mut RecordStore, path: &Path) -> Result<(Vertical, usize), IngestError> {
    store.load_detected(path)
}
