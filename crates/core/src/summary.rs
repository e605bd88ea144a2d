//! Aggregate statistics over a run's result list.

use serde::{Deserialize, Serialize};

use crate::types::{RotationAction, RotationResult};

/// Totals derived from a slice of [`RotationResult`] records.
///
/// Dry-run results are counted the same as live ones so a preview shows the
/// effect a real run would have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files rotated (with or without compression).
    pub rotated: u64,
    /// Files skipped because no trigger fired.
    pub skipped: u64,
    /// Archive entries deleted by the retention sweep.
    pub deleted_expired: u64,
    /// Failed operations.
    pub failed: u64,
    /// Total bytes of rotated content before compression.
    pub original_bytes: u64,
    /// Total bytes after compression. Uncompressed rotations contribute
    /// their original size, matching what remains on disk.
    pub stored_bytes: u64,
}

impl RunSummary {
    /// Fold a result list into totals.
    pub fn from_results(results: &[RotationResult]) -> Self {
        let mut summary = RunSummary::default();
        for result in results {
            match result.action {
                RotationAction::Rotated | RotationAction::RotatedCompressed => {
                    summary.rotated += 1;
                    let original = result.original_size.unwrap_or(0);
                    summary.original_bytes += original;
                    summary.stored_bytes += result.compressed_size.unwrap_or(original);
                }
                RotationAction::Skipped => summary.skipped += 1,
                RotationAction::DeletedExpired => summary.deleted_expired += 1,
                RotationAction::Failed => summary.failed += 1,
            }
        }
        summary
    }

    /// Percentage of space saved by compression, 0.0 when nothing rotated.
    pub fn space_saved_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        (1.0 - self.stored_bytes as f64 / self.original_bytes as f64) * 100.0
    }

    /// Whether any result in the run failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const MB: f64 = 1024.0 * 1024.0;
        writeln!(f, "Rotated {} file(s)", self.rotated)?;
        if self.deleted_expired > 0 {
            writeln!(f, "Deleted {} expired archive(s)", self.deleted_expired)?;
        }
        if self.failed > 0 {
            writeln!(f, "Failed {} operation(s)", self.failed)?;
        }
        writeln!(f, "Original total: {:.2} MB", self.original_bytes as f64 / MB)?;
        writeln!(f, "Stored total: {:.2} MB", self.stored_bytes as f64 / MB)?;
        write!(f, "Space saved: {:.1}%", self.space_saved_percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::policy::Compression;
    use crate::types::ArchiveEntry;
    use chrono::Utc;
    use std::path::PathBuf;

    fn rotated_result(original: u64, compressed: Option<u64>) -> RotationResult {
        let entry = ArchiveEntry {
            archive_path: PathBuf::from("/var/log/app.log.1"),
            created_at: Utc::now(),
            compressed: compressed.is_some(),
            algorithm: if compressed.is_some() {
                Compression::Gzip
            } else {
                Compression::None
            },
            original_size: original,
            compressed_size: compressed,
        };
        if compressed.is_some() {
            RotationResult::rotated_compressed("/var/log/app.log", &entry, false)
        } else {
            RotationResult::rotated("/var/log/app.log", &entry, false)
        }
    }

    #[test]
    fn totals_and_ratio() {
        let results = vec![
            rotated_result(1000, Some(250)),
            rotated_result(1000, None),
            RotationResult::skipped("/var/log/other.log", "below threshold"),
            RotationResult::deleted_expired("/var/log/app.log.9.gz", "older than 30d", false),
        ];
        let summary = RunSummary::from_results(&results);
        assert_eq!(summary.rotated, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.deleted_expired, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.original_bytes, 2000);
        assert_eq!(summary.stored_bytes, 1250);
        assert!((summary.space_saved_percent() - 37.5).abs() < f64::EPSILON);
        assert!(!summary.has_failures());
    }

    #[test]
    fn empty_run_saves_nothing() {
        let summary = RunSummary::from_results(&[]);
        assert_eq!(summary.space_saved_percent(), 0.0);
        assert!(!summary.has_failures());
    }

    #[test]
    fn failures_are_counted() {
        let err = Error::RotationFailed {
            path: PathBuf::from("/var/log/gone.log"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let results = vec![RotationResult::failed("/var/log/gone.log", &err)];
        let summary = RunSummary::from_results(&results);
        assert_eq!(summary.failed, 1);
        assert!(summary.has_failures());
    }

    #[test]
    fn display_formats_megabytes() {
        let results = vec![rotated_result(2 * 1024 * 1024, Some(1024 * 1024))];
        let text = RunSummary::from_results(&results).to_string();
        assert!(text.contains("Rotated 1 file(s)"));
        assert!(text.contains("Original total: 2.00 MB"));
        assert!(text.contains("Space saved: 50.0%"));
    }
}
