//! Retention sweep: age-based deletion of archive siblings.
//!
//! The sweep is a best-effort pass, not all-or-nothing: every archive
//! sibling is evaluated, deletion failures are recorded per entry, and one
//! bad entry never stops the rest. Archive age comes from filesystem mtime
//! since nothing is persisted between runs.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use rollover_core::{ArchiveEntry, Compression, Error, RotationPolicy, RotationResult};

use crate::evaluate;
use crate::naming;

/// Delete archive siblings of `base` that exceed the retention age.
///
/// Returns one `DeletedExpired` result per deletion (or per would-be
/// deletion under dry-run) and one `Failed` result per entry that could
/// not be statted or deleted. Empty when the policy has no retention age.
pub fn sweep(base: &Path, policy: &RotationPolicy, now: DateTime<Utc>) -> Vec<RotationResult> {
    if policy.retention_age.is_none() {
        return Vec::new();
    }

    let siblings = match naming::list_archives(base) {
        Ok(siblings) => siblings,
        Err(e) => {
            let err = Error::SweepFailed {
                path: base.to_path_buf(),
                source: e,
            };
            warn!(base = %base.display(), error = %err, "sweep could not list archives");
            return vec![RotationResult::failed(base, &err)];
        }
    };

    let mut results = Vec::new();
    for sibling in siblings {
        let (created_at, size) = match fs::metadata(&sibling.path)
            .and_then(|m| m.modified().map(|t| (t, m.len())))
        {
            Ok((modified, len)) => (DateTime::<Utc>::from(modified), len),
            Err(e) => {
                let err = Error::SweepFailed {
                    path: sibling.path.clone(),
                    source: e,
                };
                warn!(path = %sibling.path.display(), error = %err, "sweep could not stat archive");
                results.push(RotationResult::failed(&sibling.path, &err));
                continue;
            }
        };

        let compressed = sibling.compression != Compression::None;
        let entry = ArchiveEntry {
            archive_path: sibling.path.clone(),
            created_at,
            compressed,
            algorithm: sibling.compression,
            original_size: size,
            compressed_size: compressed.then_some(size),
        };
        if !evaluate::is_expired(&entry, policy, now) {
            continue;
        }

        let reason = format!("expired: created {}", created_at.to_rfc3339());
        if policy.dry_run {
            results.push(RotationResult::deleted_expired(&sibling.path, reason, true));
            continue;
        }

        match fs::remove_file(&sibling.path) {
            Ok(()) => {
                info!(path = %sibling.path.display(), "deleted expired archive");
                results.push(RotationResult::deleted_expired(&sibling.path, reason, false));
            }
            Err(e) => {
                let err = Error::SweepFailed {
                    path: sibling.path.clone(),
                    source: e,
                };
                warn!(path = %sibling.path.display(), error = %err, "sweep deletion failed");
                results.push(RotationResult::failed(&sibling.path, &err));
            }
        }
    }
    results
}
