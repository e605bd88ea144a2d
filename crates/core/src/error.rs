//! Unified error types for rollover.
//!
//! Per-file failures are captured into [`RotationResult`] records rather
//! than propagated across path boundaries; the only error that aborts a
//! whole run is [`Error::PolicyInvalid`], raised by the pre-flight check
//! before any file is touched.
//!
//! [`RotationResult`]: crate::types::RotationResult

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All rollover errors.
///
/// Variants carry the failing path and the underlying cause so the CLI can
/// render a useful message without re-deriving context.
#[derive(Debug, Error)]
pub enum Error {
    /// The policy cannot trigger or is internally inconsistent.
    ///
    /// Raised once, before any file is processed. Indicates a configuration
    /// bug, not a runtime condition.
    #[error("invalid policy: {0}")]
    PolicyInvalid(String),

    /// Rename/recreate failure during rotation (missing source, permission
    /// denied, cross-device rename).
    #[error("rotation failed for {path}: {source}")]
    RotationFailed {
        /// The live file that failed to rotate.
        path: PathBuf,
        /// Underlying I/O cause.
        #[source]
        source: io::Error,
    },

    /// Read/write/encode failure while compressing a rotated archive.
    ///
    /// The uncompressed archive is left intact when this is returned.
    #[error("compression failed for {path}: {reason}")]
    CompressionFailed {
        /// The archive that failed to compress.
        path: PathBuf,
        /// What went wrong (encoder error, verification mismatch, ...).
        reason: String,
    },

    /// Deletion failure during the retention sweep.
    #[error("sweep failed for {path}: {source}")]
    SweepFailed {
        /// The archive entry that could not be deleted.
        path: PathBuf,
        /// Underlying I/O cause.
        #[source]
        source: io::Error,
    },
}

/// Result type for rollover operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error classification carried inside [`RotationResult`] records.
///
/// Serializable so the CLI's JSON output can report it verbatim.
///
/// [`RotationResult`]: crate::types::RotationResult
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`Error::RotationFailed`].
    RotationFailed,
    /// See [`Error::CompressionFailed`].
    CompressionFailed,
    /// See [`Error::SweepFailed`].
    SweepFailed,
    /// See [`Error::PolicyInvalid`].
    PolicyInvalid,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::RotationFailed => "rotation_failed",
            ErrorKind::CompressionFailed => "compression_failed",
            ErrorKind::SweepFailed => "sweep_failed",
            ErrorKind::PolicyInvalid => "policy_invalid",
        };
        write!(f, "{}", s)
    }
}

impl Error {
    /// Classify this error for result records.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::PolicyInvalid(_) => ErrorKind::PolicyInvalid,
            Error::RotationFailed { .. } => ErrorKind::RotationFailed,
            Error::CompressionFailed { .. } => ErrorKind::CompressionFailed,
            Error::SweepFailed { .. } => ErrorKind::SweepFailed,
        }
    }

    /// Check if this is a pre-flight configuration error.
    pub fn is_policy_invalid(&self) -> bool {
        matches!(self, Error::PolicyInvalid(_))
    }

    /// Check if this error left an uncompressed archive behind.
    ///
    /// Compression failures are best-effort relative to rotation: the
    /// rotation itself is still considered successful.
    pub fn is_compression_failure(&self) -> bool {
        matches!(self, Error::CompressionFailed { .. })
    }
}
