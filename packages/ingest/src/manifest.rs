//! TOML dataset manifests.
//!
//! ```toml
//! enrollment = ["data/enrolment_2024.csv"]
//! demographic = ["data/demographic.csv"]
//! biometric = []
//!
//! [analysis]
//! z_score_threshold = 3.0
//! forecast_horizon = 12
//! ```
//!
//! Relative paths are resolved against the manifest's own directory.

use std::path::{Path, PathBuf};

use aadhaar_insights_analytics::{AnalyticsConfig, validate_config};
use aadhaar_insights_record_models::Vertical;
use serde::{Deserialize, Serialize};

use crate::IngestError;

/// Files to load per vertical plus analysis overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetManifest {
    pub enrollment: Vec<PathBuf>,
    pub demographic: Vec<PathBuf>,
    pub biometric: Vec<PathBuf>,
    pub analysis: AnalyticsConfig,
}

impl DatasetManifest {
    /// Files listed for one vertical.
    #[must_use]
    pub fn files(&self, vertical: Vertical) -> &[PathBuf] {
        match vertical {
            Vertical::Enrollment => &self.enrollment,
            Vertical::Demographic => &self.demographic,
            Vertical::Biometric => &self.biometric,
        }
    }

    /// Mutable file list for one vertical.
    pub const fn files_mut(&mut self, vertical: Vertical) -> &mut Vec<PathBuf> {
        match vertical {
            Vertical::Enrollment => &mut self.enrollment,
            Vertical::Demographic => &mut self.demographic,
            Vertical::Biometric => &mut self.biometric,
        }
    }

    /// Total number of listed files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        Vertical::ALL.iter().map(|v| self.files(*v).len()).sum()
    }

    /// Rewrites relative paths to be relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for vertical in Vertical::ALL {
            for path in self.files_mut(vertical) {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }
}

/// Parses a manifest from TOML text and validates its `[analysis]` table.
///
/// # Errors
///
/// * If the TOML is malformed or a key has the wrong type
/// * If the analysis settings are out of range
pub fn parse_manifest(text: &str) -> Result<DatasetManifest, IngestError> {
    let manifest: DatasetManifest = toml::from_str(text)?;
    validate_config(&manifest.analysis)?;
    Ok(manifest)
}

/// Reads a manifest file and resolves its paths against its directory.
///
/// # Errors
///
/// * If the file cannot be read
/// * If [`parse_manifest`] fails
pub fn load_manifest(path: &Path) -> Result<DatasetManifest, IngestError> {
    let text = std::fs::read_to_string(path)?;
    let mut manifest = parse_manifest(&text)?;
    if let Some(base) = path.parent() {
        manifest.resolve_paths(base);
    }
    log::debug!(
        "Loaded manifest {} listing {} files",
        path.display(),
        manifest.file_count()
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_manifest_keeps_defaults() {
        let manifest = parse_manifest(
            r#"
            enrollment = ["a.csv", "/abs/b.csv"]

            [analysis]
            forecast_horizon = 12
            "#,
        )
        .unwrap();
        assert_eq!(manifest.enrollment.len(), 2);
        assert!(manifest.demographic.is_empty());
        assert_eq!(manifest.analysis.forecast_horizon, 12);
        assert!((manifest.analysis.z_score_threshold - 2.5).abs() < f64::EPSILON);
        assert_eq!(manifest.file_count(), 2);
    }

    #[test]
    fn relative_paths_are_resolved() {
        let mut manifest = parse_manifest(r#"biometric = ["bio.csv", "/abs/bio.csv"]"#).unwrap();
        manifest.resolve_paths(Path::new("/data/run"));
        assert_eq!(
            manifest.files(Vertical::Biometric),
            &[PathBuf::from("/data/run/bio.csv"), PathBuf::from("/abs/bio.csv")]
        );
    }

    #[test]
    fn invalid_analysis_is_rejected() {
        let err = parse_manifest("[analysis]\nmin_group_size = 1\n").unwrap_err();
        assert!(matches!(err, IngestError::Analytics(_)));

        let err = parse_manifest("enrollment = 5\n").unwrap_err();
        assert!(matches!(err, IngestError::Manifest(_)));
    }
}
