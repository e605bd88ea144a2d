//! Per-path orchestration: evaluate → rotate → compress → sweep.
//!
//! The batch is best-effort end to end. A failure in one path's pipeline
//! never aborts processing of subsequent paths, and the aggregate result
//! list is the sole way a caller learns of partial failure. The one
//! exception is pre-flight policy validation, which aborts the whole run
//! before any file is touched, since a policy that can never trigger is a
//! configuration bug, not a runtime condition.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

use rollover_core::{Compression, LogFile, Result, RotationPolicy, RotationResult};

use crate::{compress, evaluate, naming, rotate, sweep};

/// Run the rotation pipeline over a batch of paths, in input order.
///
/// Produces the per-path rotation outcome followed by that path's sweep
/// results. The sweep runs for every path (skipped, rotated, or failed)
/// since archive expiry is independent of today's rotation.
pub fn run_at(
    paths: &[PathBuf],
    policy: &RotationPolicy,
    now: DateTime<Utc>,
) -> Result<Vec<RotationResult>> {
    policy.validate()?;
    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        results.extend(process_path(path, policy, now));
    }
    Ok(results)
}

/// Run the pipeline with a pool of worker threads, results unordered
/// across paths.
///
/// Each path's own rotate → compress → sweep sequence stays strictly
/// sequential on one thread; only the scheduling across paths changes.
/// Callers must not pass two paths from the same basename family: the
/// no-shared-state argument between paths holds only for distinct
/// families (the CLI deduplicates after glob expansion).
pub fn run_unordered_at(
    paths: &[PathBuf],
    policy: &RotationPolicy,
    now: DateTime<Utc>,
    threads: usize,
) -> Result<Vec<RotationResult>> {
    let workers = threads.max(1).min(paths.len().max(1));
    if workers <= 1 {
        return run_at(paths, policy, now);
    }
    policy.validate()?;

    let cursor = AtomicUsize::new(0);
    let results: Mutex<Vec<RotationResult>> = Mutex::new(Vec::with_capacity(paths.len()));

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let i = cursor.fetch_add(1, Ordering::Relaxed);
                if i >= paths.len() {
                    break;
                }
                let path_results = process_path(&paths[i], policy, now);
                results.lock().extend(path_results);
            });
        }
    });

    Ok(results.into_inner())
}

/// Process one path: probe → evaluate → rotate → compress, then sweep.
///
/// Never panics or returns early; every outcome becomes a result record.
fn process_path(path: &Path, policy: &RotationPolicy, now: DateTime<Utc>) -> Vec<RotationResult> {
    let mut results = Vec::new();

    match LogFile::probe(path) {
        Err(e) => results.push(RotationResult::failed(path, &e)),
        Ok(file) => {
            let file = file.with_last_rotated_at(naming::newest_archive_mtime(path));
            if !evaluate::should_rotate(&file, policy, now) {
                debug!(path = %path.display(), "no trigger fired, skipping");
                results.push(RotationResult::skipped(path, "no rotation trigger fired"));
            } else {
                results.push(rotate_and_compress(path, &file, policy, now));
            }
        }
    }

    results.extend(sweep::sweep(path, policy, now));
    results
}

/// The rotate step plus its best-effort compression follow-up.
fn rotate_and_compress(
    path: &Path,
    file: &LogFile,
    policy: &RotationPolicy,
    now: DateTime<Utc>,
) -> RotationResult {
    let entry = match rotate::rotate(file, policy, now) {
        Ok(entry) => entry,
        Err(e) => return RotationResult::failed(path, &e),
    };

    if policy.compression == Compression::None {
        return RotationResult::rotated(path, &entry, policy.dry_run);
    }

    match compress::compress(&entry, policy.compression, policy.dry_run) {
        Ok(compressed) => RotationResult::rotated_compressed(path, &compressed, policy.dry_run),
        // Compression is best-effort relative to rotation: the archive
        // exists uncompressed, so the rotation itself still succeeded.
        Err(e) => RotationResult::rotated(path, &entry, policy.dry_run).with_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollover_core::{ErrorKind, NamingScheme, RotationAction};
    use std::fs;

    fn size_policy(max: u64) -> RotationPolicy {
        RotationPolicy::builder()
            .max_size_bytes(max)
            .naming(NamingScheme::Shifting { max_kept: 5 })
            .build()
            .unwrap()
    }

    #[test]
    fn invalid_policy_aborts_before_touching_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, b"0123456789").unwrap();

        let policy = RotationPolicy {
            max_size_bytes: None,
            max_age: None,
            schedule: None,
            compression: Compression::None,
            retention_age: None,
            naming: NamingScheme::Timestamp,
            dry_run: false,
        };
        let err = run_at(&[path.clone()], &policy, Utc::now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyInvalid);
        assert_eq!(fs::read(&path).unwrap(), b"0123456789", "file untouched");
    }

    #[test]
    fn below_threshold_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, b"small").unwrap();

        let results = run_at(&[path.clone()], &size_policy(1000), Utc::now()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].action, RotationAction::Skipped);
        assert_eq!(results[0].path, path);
    }

    #[test]
    fn over_threshold_rotates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, vec![b'x'; 2000]).unwrap();

        let results = run_at(&[path.clone()], &size_policy(1000), Utc::now()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].action, RotationAction::Rotated);
        assert!(dir.path().join("app.log.1").exists());
    }

    #[test]
    fn one_failing_path_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.log");
        let good = dir.path().join("good.log");
        fs::write(&good, vec![b'x'; 2000]).unwrap();

        let results =
            run_at(&[missing.clone(), good.clone()], &size_policy(1000), Utc::now()).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].action, RotationAction::Failed);
        assert_eq!(results[0].error, Some(ErrorKind::RotationFailed));
        assert_eq!(results[1].action, RotationAction::Rotated);
        assert!(dir.path().join("good.log.1").exists());
    }

    #[test]
    fn results_follow_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for name in ["c.log", "a.log", "b.log"] {
            let path = dir.path().join(name);
            fs::write(&path, b"tiny").unwrap();
            paths.push(path);
        }

        let results = run_at(&paths, &size_policy(1000), Utc::now()).unwrap();
        let reported: Vec<_> = results.iter().map(|r| r.path.clone()).collect();
        assert_eq!(reported, paths);
    }

    #[test]
    fn sweep_runs_even_when_rotation_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, b"small").unwrap();
        fs::write(dir.path().join("app.log.1.gz"), b"ancient").unwrap();

        let policy = RotationPolicy::builder()
            .max_size_bytes(1000)
            .retention_age(std::time::Duration::from_secs(86_400))
            .build()
            .unwrap();
        let now = Utc::now() + chrono::Duration::days(2);

        let results = run_at(&[path], &policy, now).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].action, RotationAction::Skipped);
        assert_eq!(results[1].action, RotationAction::DeletedExpired);
        assert!(!dir.path().join("app.log.1.gz").exists());
    }

    #[test]
    fn compressed_rotation_reports_combined_action() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, vec![b'x'; 2000]).unwrap();

        let policy = RotationPolicy::builder()
            .max_size_bytes(1000)
            .compression(Compression::Gzip)
            .naming(NamingScheme::Shifting { max_kept: 5 })
            .build()
            .unwrap();

        let results = run_at(&[path], &policy, Utc::now()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].action, RotationAction::RotatedCompressed);
        assert!(results[0].compressed_size.is_some());
        assert!(dir.path().join("app.log.1.gz").exists());
        assert!(!dir.path().join("app.log.1").exists());
    }

    #[test]
    fn unordered_run_matches_sequential_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..8 {
            let path = dir.path().join(format!("svc-{}.log", i));
            fs::write(&path, vec![b'x'; if i % 2 == 0 { 2000 } else { 10 }]).unwrap();
            paths.push(path);
        }

        let sequential_dir = tempfile::tempdir().unwrap();
        let mut sequential_paths = Vec::new();
        for i in 0..8 {
            let path = sequential_dir.path().join(format!("svc-{}.log", i));
            fs::write(&path, vec![b'x'; if i % 2 == 0 { 2000 } else { 10 }]).unwrap();
            sequential_paths.push(path);
        }

        let now = Utc::now();
        let mut unordered: Vec<_> = run_unordered_at(&paths, &size_policy(1000), now, 4)
            .unwrap()
            .into_iter()
            .map(|r| (r.path.file_name().unwrap().to_owned(), r.action.to_string()))
            .collect();
        let mut sequential: Vec<_> = run_at(&sequential_paths, &size_policy(1000), now)
            .unwrap()
            .into_iter()
            .map(|r| (r.path.file_name().unwrap().to_owned(), r.action.to_string()))
            .collect();
        unordered.sort();
        sequential.sort();
        assert_eq!(unordered, sequential);
    }

    #[test]
    fn unordered_run_validates_policy_first() {
        let policy = RotationPolicy {
            max_size_bytes: None,
            max_age: None,
            schedule: None,
            compression: Compression::None,
            retention_age: None,
            naming: NamingScheme::Timestamp,
            dry_run: false,
        };
        let paths = vec![PathBuf::from("/tmp/a.log"), PathBuf::from("/tmp/b.log")];
        let err = run_unordered_at(&paths, &policy, Utc::now(), 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyInvalid);
    }
}
