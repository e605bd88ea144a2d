//! Archive naming conventions.
//!
//! Two schemes are supported:
//!
//! ```text
//! shifting:   app.log, app.log.1, app.log.2, ... app.log.N[.gz|.bz2|.zst]
//! timestamp:  app.log, app.log.20260807T120000Z[.gz|.bz2|.zst]
//! ```
//!
//! Shifting is 1-based with the most recent archive at index 1. Archive
//! state is reconstructed each run by listing sibling files that match one
//! of these patterns; nothing is persisted between runs.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rollover_core::Compression;

/// Timestamp suffix format: compact UTC ISO8601, filesystem-safe (no `:`).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// The archive suffix of a discovered sibling file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSuffix {
    /// Numbered slot from the shifting scheme (`app.log.3`).
    Index(u32),
    /// Raw timestamp token from the timestamp scheme
    /// (`app.log.20260807T120000Z`).
    Timestamp(String),
}

/// A sibling file of a base path that matches the archive convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSibling {
    /// Full path of the sibling file.
    pub path: PathBuf,
    /// Parsed suffix.
    pub suffix: ArchiveSuffix,
    /// Compression recognized from the trailing extension.
    pub compression: Compression,
}

impl ArchiveSibling {
    /// Numbered slot, when this sibling belongs to the shifting scheme.
    pub fn index(&self) -> Option<u32> {
        match self.suffix {
            ArchiveSuffix::Index(i) => Some(i),
            ArchiveSuffix::Timestamp(_) => None,
        }
    }
}

/// Append a suffix to a path's file name (`app.log` + `1` → `app.log.1`).
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = base.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Path of a numbered archive slot, without compression extension.
pub fn indexed_path(base: &Path, index: u32) -> PathBuf {
    with_suffix(base, &index.to_string())
}

/// Path of a numbered archive slot with an optional compression extension.
pub fn slot_path(base: &Path, index: u32, compression: Compression) -> PathBuf {
    let path = indexed_path(base, index);
    match compression.extension() {
        Some(ext) => with_suffix(&path, ext),
        None => path,
    }
}

/// Path of a timestamp-scheme archive for a rotation happening at `now`.
pub fn timestamped_path(base: &Path, now: DateTime<Utc>) -> PathBuf {
    with_suffix(base, &now.format(TIMESTAMP_FORMAT).to_string())
}

/// Path of a compressed sibling (`app.log.1` → `app.log.1.gz`).
///
/// Returns the input unchanged for `Compression::None`.
pub fn compressed_path(path: &Path, compression: Compression) -> PathBuf {
    match compression.extension() {
        Some(ext) => with_suffix(path, ext),
        None => path.to_path_buf(),
    }
}

/// Check whether a token looks like a `TIMESTAMP_FORMAT` suffix.
fn is_timestamp_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.len() != 16 {
        return false;
    }
    bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[8] == b'T'
        && bytes[9..15].iter().all(u8::is_ascii_digit)
        && bytes[15] == b'Z'
}

/// Parse a directory entry name against the archive convention for
/// `base_name`.
///
/// Returns `None` for the live file itself and for anything that does not
/// match either scheme (so unrelated files like `app.log.old` are never
/// touched by pruning or the retention sweep).
pub fn parse_sibling(file_name: &str, base_name: &str) -> Option<(ArchiveSuffix, Compression)> {
    let rest = file_name.strip_prefix(base_name)?.strip_prefix('.')?;

    let (token, compression) = match rest.rsplit_once('.') {
        Some((head, ext)) => match Compression::from_extension(ext) {
            Some(algo) => (head, algo),
            None => (rest, Compression::None),
        },
        None => (rest, Compression::None),
    };

    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        let index = token.parse().ok()?;
        return Some((ArchiveSuffix::Index(index), compression));
    }
    if is_timestamp_token(token) {
        return Some((ArchiveSuffix::Timestamp(token.to_string()), compression));
    }
    None
}

/// List all archive siblings of a base path.
///
/// Reads the base path's parent directory once and matches entry names
/// against both schemes. Shifting-scheme entries are returned sorted by
/// index ascending; timestamp entries follow in name order.
pub fn list_archives(base: &Path) -> io::Result<Vec<ArchiveSibling>> {
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    let base_name = match base.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return Ok(Vec::new()),
    };

    let mut siblings = Vec::new();
    for entry in fs::read_dir(parent)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some((suffix, compression)) = parse_sibling(name, base_name) {
            siblings.push(ArchiveSibling {
                path: entry.path(),
                suffix,
                compression,
            });
        }
    }

    siblings.sort_by(|a, b| match (&a.suffix, &b.suffix) {
        (ArchiveSuffix::Index(x), ArchiveSuffix::Index(y)) => x.cmp(y),
        (ArchiveSuffix::Index(_), ArchiveSuffix::Timestamp(_)) => std::cmp::Ordering::Less,
        (ArchiveSuffix::Timestamp(_), ArchiveSuffix::Index(_)) => std::cmp::Ordering::Greater,
        (ArchiveSuffix::Timestamp(x), ArchiveSuffix::Timestamp(y)) => x.cmp(y),
    });
    Ok(siblings)
}

/// Modification time of the newest archive sibling, if any.
///
/// Used to reconstruct `last_rotated_at` for the time triggers. I/O errors
/// degrade to `None`: a file we cannot stat simply contributes no evidence
/// of a prior rotation.
pub fn newest_archive_mtime(base: &Path) -> Option<DateTime<Utc>> {
    let siblings = list_archives(base).ok()?;
    siblings
        .iter()
        .filter_map(|s| fs::metadata(&s.path).ok()?.modified().ok())
        .map(DateTime::<Utc>::from)
        .max()
}
