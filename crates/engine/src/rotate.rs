//! Rotation executor: the rename-and-recreate sequence.
//!
//! The dangerous part of the whole system lives here. Safety against a
//! concurrent writer appending to the live path rests on two facts:
//!
//! 1. `fs::rename` is atomic on a single filesystem, and the archive slot
//!    is always in the same directory as the live file, so the rename never
//!    crosses volumes. A cross-device error is propagated loudly rather
//!    than degraded to a copy.
//! 2. There is no intermediate state: until the rename the writer appends
//!    to the live file; after it, to the archive (if it holds the
//!    descriptor open) or to the recreated empty file (if it reopens by
//!    path). Either way no byte is lost.
//!
//! If a writer reopens the path between the rename and the recreate, a
//! transiently duplicate file can exist. Callers must tolerate this; the
//! executor does not signal writer processes.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use rollover_core::{
    ArchiveEntry, Compression, Error, LogFile, NamingScheme, Result, RotationPolicy,
};

use crate::naming::{self, ArchiveSibling};

/// Rotate a live file into an archive slot.
///
/// Shifting scheme: prunes slots at or above `max_kept`, shifts the rest up
/// by one (highest first, compressed variants move with their slot), then
/// renames the live file to `name.1` and recreates an empty live file with
/// the original permissions.
///
/// Timestamp scheme: renames the live file to `name.<timestamp>` directly;
/// nothing shifts.
///
/// Dry-run performs the slot computation only and returns the entry that a
/// live run would produce, mutating nothing.
pub fn rotate(file: &LogFile, policy: &RotationPolicy, now: DateTime<Utc>) -> Result<ArchiveEntry> {
    let target = match policy.naming {
        NamingScheme::Shifting { .. } => naming::indexed_path(&file.path, 1),
        NamingScheme::Timestamp => naming::timestamped_path(&file.path, now),
    };

    let entry = ArchiveEntry {
        archive_path: target.clone(),
        created_at: now,
        compressed: false,
        algorithm: Compression::None,
        original_size: file.size_bytes,
        compressed_size: None,
    };

    if policy.dry_run {
        debug!(
            path = %file.path.display(),
            target = %target.display(),
            "dry-run: would rotate"
        );
        return Ok(entry);
    }

    let rot_err = |source: io::Error| Error::RotationFailed {
        path: file.path.clone(),
        source,
    };

    // Capture permissions before any mutation: a missing or unreadable
    // source fails here, before archives have been shifted.
    let permissions = fs::metadata(&file.path).map_err(rot_err)?.permissions();

    if let NamingScheme::Shifting { max_kept } = policy.naming {
        shift_archives(&file.path, max_kept)?;
    }

    fs::rename(&file.path, &target).map_err(rot_err)?;
    info!(
        path = %file.path.display(),
        target = %target.display(),
        size = file.size_bytes,
        "rotated"
    );

    // Recreate an empty file at the original path for writers that reopen
    // by path. Writers holding the old descriptor keep appending to the
    // archive until they reopen, which callers must tolerate.
    fs::File::create(&file.path).map_err(rot_err)?;
    fs::set_permissions(&file.path, permissions).map_err(rot_err)?;

    Ok(entry)
}

/// Prune slots at or above `max_kept`, then shift survivors up by one.
///
/// Walks indices from highest to lowest so a shift never overwrites a slot
/// that has not moved yet. Timestamp-scheme siblings are untouched.
fn shift_archives(base: &Path, max_kept: u32) -> Result<()> {
    let rot_err = |source: io::Error| Error::RotationFailed {
        path: base.to_path_buf(),
        source,
    };

    let mut indexed: Vec<ArchiveSibling> = naming::list_archives(base)
        .map_err(rot_err)?
        .into_iter()
        .filter(|s| s.index().is_some())
        .collect();

    // Pre-retention pruning: slots that would exceed max_kept after the
    // shift are deleted before it, independent of the age-based sweep.
    for sibling in indexed.iter().filter(|s| s.index().unwrap_or(0) >= max_kept) {
        fs::remove_file(&sibling.path).map_err(rot_err)?;
        debug!(path = %sibling.path.display(), max_kept, "pruned archive slot");
    }
    indexed.retain(|s| s.index().unwrap_or(0) < max_kept);

    indexed.sort_by_key(|s| std::cmp::Reverse(s.index().unwrap_or(0)));
    for sibling in &indexed {
        let index = sibling.index().unwrap_or(0);
        let next = naming::slot_path(base, index + 1, sibling.compression);
        fs::rename(&sibling.path, &next).map_err(rot_err)?;
        debug!(
            from = %sibling.path.display(),
            to = %next.display(),
            "shifted archive slot"
        );
    }
    Ok(())
}
