//! The in-memory record store.

use std::collections::{BTreeSet, VecDeque};
use std::io::Read;
use std::path::Path;

use aadhaar_insights_record_models::{Dataset, Vertical};

use crate::IngestError;
use crate::reader::{RecordBatch, read_batch, read_detected};

/// Number of activity messages kept.
pub const ACTIVITY_LIMIT: usize = 10;

/// Accumulates records across loads.
///
/// Loads append: loading the same file twice doubles its records. The
/// activity log keeps the most recent [`ACTIVITY_LIMIT`] messages, newest
/// first.
#[derive(Debug, Default)]
pub struct RecordStore {
    dataset: Dataset,
    activity: VecDeque<String>,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything loaded so far.
    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Consumes the store, keeping only its records.
    #[must_use]
    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    /// Activity messages, newest first.
    pub fn activity(&self) -> impl Iterator<Item = &str> {
        self.activity.iter().map(String::as_str)
    }

    /// Drops every record and activity message.
    pub fn clear(&mut self) {
        self.dataset = Dataset::default();
        self.activity.clear();
    }

    fn record_activity(&mut self, message: String) {
        self.activity.push_front(message);
        self.activity.truncate(ACTIVITY_LIMIT);
    }

    /// Appends a parsed batch and logs it as coming from `source`.
    ///
    /// Returns the number of records appended.
    pub fn append(&mut self, batch: RecordBatch, source: &str) -> usize {
        let count = batch.len();
        let vertical = batch.vertical();
        let states = batch.states().into_iter().collect::<BTreeSet<_>>().len();
        let message = format!(
            "Loaded {count} {vertical} records covering {states} states from {source}"
        );

        match batch {
            RecordBatch::Enrollment(records) => self.dataset.enrollment.extend(records),
            RecordBatch::Demographic(records) => self.dataset.demographic.extend(records),
            RecordBatch::Biometric(records) => self.dataset.biometric.extend(records),
        }

        log::info!("{message}");
        self.record_activity(message);
        count
    }

    /// Parses CSV from `input` as `vertical` records and appends them.
    ///
    /// # Errors
    ///
    /// * If the CSV cannot be read
    pub fn load_reader<R: Read>(
        &mut self,
        vertical: Vertical,
        input: R,
        source: &str,
    ) -> Result<usize, IngestError> {
        let batch = read_batch(vertical, input)?;
        Ok(self.append(batch, source))
    }

    /// Loads a CSV file as `vertical` records.
    ///
    /// # Errors
    ///
    /// * If the file cannot be opened or is not valid CSV
    pub fn load_path(&mut self, vertical: Vertical, path: &Path) -> Result<usize, IngestError> {
        let file = std::fs::File::open(path)?;
        self.load_reader(vertical, file, &file_name(path))
    }

    /// Loads a CSV file, inferring the vertical from its header row.
    ///
    /// # Errors
    ///
    /// * If the file cannot be opened or is not valid CSV
    /// * If the header row matches no vertical
    pub fn load_detected(&mut self, path: &Path) -> Result<(Vertical, usize), IngestError> {
        let file = std::fs::File::open(path)?;
        let batch = read_detected(file)?;
        let vertical = batch.vertical();
        Ok((vertical, self.append(batch, &file_name(path))))
    }
}

/// Final path component for display, falling back to the whole path.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
