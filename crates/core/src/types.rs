//! Core types for the rotation pipeline.
//!
//! This module defines the records that flow through a run:
//! - [`LogFile`]: read-only metadata snapshot of a live log file
//! - [`ArchiveEntry`]: a rotated (and possibly compressed) archive
//! - [`RotationAction`] / [`RotationResult`]: per-path outcome records
//!
//! Archive state is never persisted by the process; it is reconstructed
//! each run by listing sibling files matching the naming convention.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::policy::Compression;

/// Metadata snapshot of a live, currently-written log file.
///
/// Identity is the path. The snapshot is taken once per run; a concurrent
/// writer may grow the file afterwards, which is tolerated (the rotation
/// rename is atomic regardless of the file's size at rename time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// Absolute path of the live file.
    pub path: PathBuf,
    /// Size in bytes at probe time.
    pub size_bytes: u64,
    /// When this file was last rotated, if known.
    ///
    /// Reconstructed by the pipeline from the newest archive sibling; `None`
    /// when no archive exists yet.
    pub last_rotated_at: Option<DateTime<Utc>>,
    /// Last modification time at probe time.
    pub modified_at: DateTime<Utc>,
}

impl LogFile {
    /// Probe a path's metadata.
    ///
    /// A missing or unreadable file maps to [`Error::RotationFailed`]: the
    /// pipeline records it as a failed path and moves on.
    pub fn probe(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path).map_err(|e| Error::RotationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let modified = meta.modified().map_err(|e| Error::RotationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(LogFile {
            path: path.to_path_buf(),
            size_bytes: meta.len(),
            last_rotated_at: None,
            modified_at: DateTime::<Utc>::from(modified),
        })
    }

    /// Attach a reconstructed last-rotation timestamp.
    pub fn with_last_rotated_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_rotated_at = at;
        self
    }

    /// The instant the time triggers measure from: the last rotation if one
    /// is known, otherwise the file's own modification time.
    pub fn rotation_epoch(&self) -> DateTime<Utc> {
        self.last_rotated_at.unwrap_or(self.modified_at)
    }
}

/// A rotated archive file, tracked transiently during a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Path of the archive (base path plus index or timestamp suffix, plus
    /// a compression extension once compressed).
    pub archive_path: PathBuf,
    /// When this archive was created.
    pub created_at: DateTime<Utc>,
    /// Whether the archive has been compressed.
    pub compressed: bool,
    /// Algorithm used, `Compression::None` while uncompressed.
    pub algorithm: Compression,
    /// Size of the content before compression.
    pub original_size: u64,
    /// Size after compression, once compressed.
    pub compressed_size: Option<u64>,
}

/// What the pipeline did (or would do, under dry-run) for one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationAction {
    /// No trigger fired; the file was left alone.
    Skipped,
    /// The file was rotated into an archive slot.
    Rotated,
    /// The file was rotated and the archive compressed.
    RotatedCompressed,
    /// An expired archive sibling was deleted by the retention sweep.
    DeletedExpired,
    /// The operation failed; see the attached error kind.
    Failed,
}

impl std::fmt::Display for RotationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RotationAction::Skipped => "skipped",
            RotationAction::Rotated => "rotated",
            RotationAction::RotatedCompressed => "rotated+compressed",
            RotationAction::DeletedExpired => "deleted_expired",
            RotationAction::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Per-path outcome record.
///
/// Produced by the pipeline, consumed by the reporting layer. The aggregate
/// result list is the sole way a caller learns of partial failure; no error
/// escapes the batch except pre-flight policy validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationResult {
    /// The file this record is about (live path, or archive path for sweep
    /// results).
    pub path: PathBuf,
    /// What happened.
    pub action: RotationAction,
    /// Human-readable explanation.
    pub reason: String,
    /// True when the action was classified but not performed.
    pub dry_run: bool,
    /// Error classification, when something went wrong.
    ///
    /// A `Rotated` action with `error = Some(CompressionFailed)` means the
    /// rotation succeeded but the follow-up compression did not.
    pub error: Option<ErrorKind>,
    /// Bytes before compression, for rotated files.
    pub original_size: Option<u64>,
    /// Bytes after compression, when compression ran.
    pub compressed_size: Option<u64>,
}

impl RotationResult {
    /// A path whose triggers did not fire.
    pub fn skipped(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        RotationResult {
            path: path.into(),
            action: RotationAction::Skipped,
            reason: reason.into(),
            dry_run: false,
            error: None,
            original_size: None,
            compressed_size: None,
        }
    }

    /// A successful (or dry-run) rotation without compression.
    pub fn rotated(path: impl Into<PathBuf>, entry: &ArchiveEntry, dry_run: bool) -> Self {
        RotationResult {
            path: path.into(),
            action: RotationAction::Rotated,
            reason: format!("rotated to {}", entry.archive_path.display()),
            dry_run,
            error: None,
            original_size: Some(entry.original_size),
            compressed_size: None,
        }
    }

    /// A successful (or dry-run) rotation plus compression.
    pub fn rotated_compressed(
        path: impl Into<PathBuf>,
        entry: &ArchiveEntry,
        dry_run: bool,
    ) -> Self {
        RotationResult {
            path: path.into(),
            action: RotationAction::RotatedCompressed,
            reason: format!("rotated to {}", entry.archive_path.display()),
            dry_run,
            error: None,
            original_size: Some(entry.original_size),
            compressed_size: entry.compressed_size,
        }
    }

    /// An archive deleted (or classified for deletion) by the sweep.
    pub fn deleted_expired(
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
        dry_run: bool,
    ) -> Self {
        RotationResult {
            path: path.into(),
            action: RotationAction::DeletedExpired,
            reason: reason.into(),
            dry_run,
            error: None,
            original_size: None,
            compressed_size: None,
        }
    }

    /// A failed operation, classified from the error.
    pub fn failed(path: impl Into<PathBuf>, error: &Error) -> Self {
        RotationResult {
            path: path.into(),
            action: RotationAction::Failed,
            reason: error.to_string(),
            dry_run: false,
            error: Some(error.kind()),
            original_size: None,
            compressed_size: None,
        }
    }

    /// Attach a sub-error without changing the action.
    ///
    /// Used when compression fails after a successful rotation.
    pub fn with_error(mut self, error: &Error) -> Self {
        self.error = Some(error.kind());
        self.reason = format!("{}; {}", self.reason, error);
        self
    }

    /// Whether this record counts as a failure for exit-status purposes.
    pub fn is_failed(&self) -> bool {
        self.action == RotationAction::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn entry(path: &str, size: u64) -> ArchiveEntry {
        ArchiveEntry {
            archive_path: PathBuf::from(path),
            created_at: Utc::now(),
            compressed: false,
            algorithm: Compression::None,
            original_size: size,
            compressed_size: None,
        }
    }

    #[test]
    fn probe_reads_size_and_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(b"hello rotation").unwrap();
        drop(f);

        let file = LogFile::probe(&path).unwrap();
        assert_eq!(file.size_bytes, 14);
        assert_eq!(file.path, path);
        assert!(file.last_rotated_at.is_none());
    }

    #[test]
    fn probe_missing_file_is_rotation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = LogFile::probe(&dir.path().join("missing.log")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RotationFailed);
    }

    #[test]
    fn rotation_epoch_prefers_last_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, b"x").unwrap();

        let file = LogFile::probe(&path).unwrap();
        assert_eq!(file.rotation_epoch(), file.modified_at);

        let rotated_at = Utc::now() - chrono::Duration::hours(3);
        let file = file.with_last_rotated_at(Some(rotated_at));
        assert_eq!(file.rotation_epoch(), rotated_at);
    }

    #[test]
    fn compression_sub_error_keeps_rotated_action() {
        let e = entry("/var/log/app.log.1", 100);
        let err = Error::CompressionFailed {
            path: e.archive_path.clone(),
            reason: "disk full".into(),
        };
        let result = RotationResult::rotated("/var/log/app.log", &e, false).with_error(&err);
        assert_eq!(result.action, RotationAction::Rotated);
        assert_eq!(result.error, Some(ErrorKind::CompressionFailed));
        assert!(!result.is_failed());
        assert!(result.reason.contains("disk full"));
    }

    #[test]
    fn failed_result_carries_kind_and_reason() {
        let err = Error::SweepFailed {
            path: PathBuf::from("/var/log/app.log.3.gz"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let result = RotationResult::failed("/var/log/app.log.3.gz", &err);
        assert!(result.is_failed());
        assert_eq!(result.error, Some(ErrorKind::SweepFailed));
    }

    #[test]
    fn action_display_matches_report_format() {
        assert_eq!(
            RotationAction::RotatedCompressed.to_string(),
            "rotated+compressed"
        );
        assert_eq!(RotationAction::DeletedExpired.to_string(), "deleted_expired");
    }

    #[test]
    fn result_serializes_to_json() {
        let e = entry("/var/log/app.log.1", 42);
        let result = RotationResult::rotated("/var/log/app.log", &e, true);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["action"], "rotated");
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["original_size"], 42);
    }
}
