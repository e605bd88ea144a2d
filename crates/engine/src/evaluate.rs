//! Rotation and expiry decisions.
//!
//! Pure functions of their inputs and the injected clock; nothing here
//! reads the wall clock or touches the filesystem. Triggers combine with
//! OR: a file rotates if any configured condition fires independently.
//!
//! Boundary semantics are strictly-exceeds for size and retention (a file
//! exactly at the threshold does not rotate; an archive exactly at the
//! retention age is not expired). Schedules use at-least-elapsed, so a
//! rotation lands exactly on the period boundary rather than one tick
//! after it.

use chrono::{DateTime, Duration as TimeDelta, Utc};
use std::time::Duration;
use tracing::debug;

use rollover_core::{ArchiveEntry, LogFile, RotationPolicy};

/// `elapsed > limit`, saturating: a limit too large for the calendar type
/// can never be exceeded.
fn strictly_exceeds(elapsed: TimeDelta, limit: Duration) -> bool {
    match TimeDelta::from_std(limit) {
        Ok(limit) => elapsed > limit,
        Err(_) => false,
    }
}

/// `elapsed >= limit`, saturating like [`strictly_exceeds`].
fn has_elapsed(elapsed: TimeDelta, limit: Duration) -> bool {
    match TimeDelta::from_std(limit) {
        Ok(limit) => elapsed >= limit,
        Err(_) => false,
    }
}

/// Decide whether a live file is due for rotation.
///
/// - Size trigger: the file strictly exceeds `max_size_bytes`.
/// - Schedule trigger: at least one schedule period has elapsed since the
///   last rotation (or the file's own mtime when it was never rotated).
/// - Age trigger: the file's content is strictly older than `max_age`.
pub fn should_rotate(file: &LogFile, policy: &RotationPolicy, now: DateTime<Utc>) -> bool {
    if let Some(max) = policy.max_size_bytes {
        if file.size_bytes > max {
            debug!(
                path = %file.path.display(),
                size = file.size_bytes,
                max,
                "size trigger fired"
            );
            return true;
        }
    }

    if let Some(schedule) = policy.schedule {
        let elapsed = now - file.rotation_epoch();
        if has_elapsed(elapsed, schedule.period()) {
            debug!(
                path = %file.path.display(),
                %schedule,
                elapsed_secs = elapsed.num_seconds(),
                "schedule trigger fired"
            );
            return true;
        }
    }

    if let Some(max_age) = policy.max_age {
        let age = now - file.modified_at;
        if strictly_exceeds(age, max_age) {
            debug!(
                path = %file.path.display(),
                age_secs = age.num_seconds(),
                "age trigger fired"
            );
            return true;
        }
    }

    false
}

/// Decide whether an archive entry has outlived the retention age.
///
/// Always false when the policy has no `retention_age`.
pub fn is_expired(entry: &ArchiveEntry, policy: &RotationPolicy, now: DateTime<Utc>) -> bool {
    match policy.retention_age {
        Some(retention) => strictly_exceeds(now - entry.created_at, retention),
        None => false,
    }
}
