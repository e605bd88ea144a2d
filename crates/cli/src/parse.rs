//! ArgMatches → typed policy and path list.
//!
//! The engine never sees strings: size suffixes, humantime durations, and
//! day counts are all resolved here into the validated `RotationPolicy`.

use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;
use tracing::warn;

use rollover_core::{Compression, NamingScheme, RotationPolicy, Schedule};

/// Parse a size string with an optional decimal multiplier suffix.
///
/// `50M` means 50_000_000: decimal multiples, matching the policy's byte
/// thresholds, not binary ones.
pub fn parse_size(input: &str) -> Result<u64, String> {
    let trimmed = input.trim();
    let (digits, multiplier) = match trimmed.chars().last() {
        Some('k') | Some('K') => (&trimmed[..trimmed.len() - 1], 1_000),
        Some('m') | Some('M') => (&trimmed[..trimmed.len() - 1], 1_000_000),
        Some('g') | Some('G') => (&trimmed[..trimmed.len() - 1], 1_000_000_000),
        _ => (trimmed, 1),
    };
    let value: u64 = digits
        .parse()
        .map_err(|_| format!("invalid size '{}': expected digits with optional K/M/G", input))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size '{}' overflows", input))
}

/// Convert parsed arguments into a rotation policy.
///
/// Validation of the resulting policy (trigger presence, slot count) is
/// left to `RotationPolicy::build`.
pub fn matches_to_policy(matches: &ArgMatches) -> Result<RotationPolicy, String> {
    let mut builder = RotationPolicy::builder();

    if let Some(size) = matches.get_one::<String>("max-size") {
        builder = builder.max_size_bytes(parse_size(size)?);
    }
    if let Some(schedule) = matches.get_one::<String>("schedule") {
        let schedule = match schedule.as_str() {
            "hourly" => Schedule::Hourly,
            "daily" => Schedule::Daily,
            "weekly" => Schedule::Weekly,
            other => return Err(format!("unknown schedule '{}'", other)),
        };
        builder = builder.schedule(schedule);
    }
    if let Some(age) = matches.get_one::<String>("max-age") {
        let age: Duration = humantime::parse_duration(age)
            .map_err(|e| format!("invalid --max-age '{}': {}", age, e))?;
        builder = builder.max_age(age);
    }
    if let Some(days) = matches.get_one::<u64>("retain") {
        builder = builder.retention_age(Duration::from_secs(days * 86_400));
    }

    let compression = match matches
        .get_one::<String>("compress")
        .map(String::as_str)
        .unwrap_or("none")
    {
        "gzip" => Compression::Gzip,
        "bz2" => Compression::Bz2,
        "zstd" => Compression::Zstd,
        _ => Compression::None,
    };
    builder = builder.compression(compression);

    let naming = if matches.get_flag("timestamp") {
        NamingScheme::Timestamp
    } else {
        let max_kept = *matches.get_one::<u32>("keep").unwrap_or(&10);
        NamingScheme::Shifting { max_kept }
    };
    builder = builder.naming(naming);
    builder = builder.dry_run(matches.get_flag("dry-run"));

    builder.build().map_err(|e| e.to_string())
}

/// Expand glob patterns into a sorted, deduplicated list of paths.
///
/// A pattern that matches nothing is reported but does not fail the run,
/// mirroring how cron-driven invocations behave between log creations.
pub fn expand_patterns(patterns: impl Iterator<Item = String>) -> Result<Vec<PathBuf>, String> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let entries =
            glob::glob(&pattern).map_err(|e| format!("invalid pattern '{}': {}", pattern, e))?;
        let mut matched = false;
        for entry in entries {
            match entry {
                Ok(path) => {
                    matched = true;
                    paths.push(path);
                }
                Err(e) => warn!(pattern = %pattern, error = %e, "unreadable glob entry"),
            }
        }
        if !matched {
            warn!(pattern = %pattern, "pattern matched no files");
        }
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}
