//! Rotation policy: the validated, immutable configuration driving a run.
//!
//! A [`RotationPolicy`] is built once via [`RotationPolicy::builder`],
//! validated up front, and then shared read-only by every pipeline stage.
//! The engine never parses strings; size and duration parsing belongs to
//! the CLI layer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Time-based rotation schedule.
///
/// Semantics are elapsed-interval, not calendar-boundary: a file on a
/// `Daily` schedule rotates once at least 24 hours have passed since its
/// last rotation (or since its last modification, if it has never been
/// rotated). This keeps the decision a pure function of the injected clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    /// Rotate when at least one hour has elapsed.
    Hourly,
    /// Rotate when at least 24 hours have elapsed.
    Daily,
    /// Rotate when at least 7 days have elapsed.
    Weekly,
}

impl Schedule {
    /// The minimum interval between rotations for this schedule.
    pub fn period(&self) -> Duration {
        match self {
            Schedule::Hourly => Duration::from_secs(60 * 60),
            Schedule::Daily => Duration::from_secs(24 * 60 * 60),
            Schedule::Weekly => Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Schedule::Hourly => "hourly",
            Schedule::Daily => "daily",
            Schedule::Weekly => "weekly",
        };
        write!(f, "{}", s)
    }
}

/// Compression algorithm applied to rotated archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Leave the archive uncompressed.
    None,
    /// gzip (DEFLATE) via flate2.
    Gzip,
    /// bzip2.
    Bz2,
    /// Zstandard.
    Zstd,
}

impl Compression {
    /// File extension appended to compressed archives, without the dot.
    ///
    /// `None` has no extension; an uncompressed archive keeps its bare
    /// archive path.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Gzip => Some("gz"),
            Compression::Bz2 => Some("bz2"),
            Compression::Zstd => Some("zst"),
        }
    }

    /// Recognize a compression algorithm from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "gz" => Some(Compression::Gzip),
            "bz2" => Some(Compression::Bz2),
            "zst" => Some(Compression::Zstd),
            _ => None,
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
            Compression::Bz2 => "bz2",
            Compression::Zstd => "zstd",
        };
        write!(f, "{}", s)
    }
}

/// Archive naming scheme.
///
/// The two schemes have different collision and retention semantics, so the
/// policy must declare which one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingScheme {
    /// Classic logrotate-style numbered slots, 1-based with the most recent
    /// archive at `name.1`. Each rotation shifts existing indices up by one;
    /// indices that would exceed `max_kept` are pruned before the shift.
    Shifting {
        /// Maximum number of numbered archives kept per base path. Must be
        /// at least 1.
        max_kept: u32,
    },
    /// Timestamp-suffixed archives (`name.20260807T120000Z`), no shifting.
    /// Collision-free within a run since each path rotates at most once.
    Timestamp,
}

impl Default for NamingScheme {
    fn default() -> Self {
        NamingScheme::Shifting { max_kept: 10 }
    }
}

/// Immutable configuration for log rotation behavior.
///
/// Invariant (enforced by [`RotationPolicy::validate`]): at least one of
/// `max_size_bytes`, `schedule`, `max_age` is set, otherwise rotation never
/// triggers and the whole run is a misconfiguration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPolicy {
    /// Rotate when the live file strictly exceeds this many bytes.
    pub max_size_bytes: Option<u64>,
    /// Rotate when the live file's content is older than this.
    pub max_age: Option<Duration>,
    /// Rotate on an elapsed-interval schedule.
    pub schedule: Option<Schedule>,
    /// Compression applied to archives after rotation.
    pub compression: Compression,
    /// Delete archive siblings strictly older than this.
    pub retention_age: Option<Duration>,
    /// Active archive naming scheme.
    pub naming: NamingScheme,
    /// Classify and report actions without mutating the filesystem.
    pub dry_run: bool,
}

impl RotationPolicy {
    /// Start building a policy.
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// Pre-flight validation.
    ///
    /// Returns [`Error::PolicyInvalid`] when no trigger is configured or
    /// when the shifting scheme is configured to keep zero archives (which
    /// would make every rotation delete its own output).
    pub fn validate(&self) -> Result<()> {
        if self.max_size_bytes.is_none() && self.schedule.is_none() && self.max_age.is_none() {
            return Err(Error::PolicyInvalid(
                "no rotation trigger configured: set max_size_bytes, schedule, or max_age".into(),
            ));
        }
        if let NamingScheme::Shifting { max_kept } = self.naming {
            if max_kept == 0 {
                return Err(Error::PolicyInvalid(
                    "shifting scheme requires max_kept >= 1".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Builder for [`RotationPolicy`].
///
/// `build()` runs the pre-flight validation, so an invalid combination
/// surfaces at construction rather than mid-run.
#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
    max_size_bytes: Option<u64>,
    max_age: Option<Duration>,
    schedule: Option<Schedule>,
    compression: Option<Compression>,
    retention_age: Option<Duration>,
    naming: Option<NamingScheme>,
    dry_run: bool,
}

impl PolicyBuilder {
    /// Rotate files strictly larger than `bytes`.
    pub fn max_size_bytes(mut self, bytes: u64) -> Self {
        self.max_size_bytes = Some(bytes);
        self
    }

    /// Rotate files whose content is older than `age`.
    pub fn max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    /// Rotate on a fixed schedule.
    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Compress archives with the given algorithm.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Delete archives strictly older than `age` during the sweep.
    pub fn retention_age(mut self, age: Duration) -> Self {
        self.retention_age = Some(age);
        self
    }

    /// Select the archive naming scheme.
    pub fn naming(mut self, naming: NamingScheme) -> Self {
        self.naming = Some(naming);
        self
    }

    /// Report what would happen without touching the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Finalize and validate the policy.
    pub fn build(self) -> Result<RotationPolicy> {
        let policy = RotationPolicy {
            max_size_bytes: self.max_size_bytes,
            max_age: self.max_age,
            schedule: self.schedule,
            compression: self.compression.unwrap_or(Compression::None),
            retention_age: self.retention_age,
            naming: self.naming.unwrap_or_default(),
            dry_run: self.dry_run,
        };
        policy.validate()?;
        Ok(policy)
    }
}
