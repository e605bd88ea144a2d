//! rollover: rotate, compress, and expire log files.
//!
//! The CLI is a thin wrapper: it expands globs to concrete paths, parses
//! flag strings into a typed policy, hands both to the engine, and renders
//! the result list. Exit status: 0 when no result failed, 1 when any did,
//! 2 for usage or configuration errors.

mod commands;
mod format;
mod parse;

use std::process;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use rollover_engine::pipeline;

use commands::build_cli;
use format::{render, OutputMode};

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let policy = match parse::matches_to_policy(&matches) {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("rollover: {}", e);
            return 2;
        }
    };

    let patterns = matches
        .get_many::<String>("pattern")
        .map(|values| values.cloned().collect::<Vec<_>>())
        .unwrap_or_default();
    let paths = match parse::expand_patterns(patterns.into_iter()) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("rollover: {}", e);
            return 2;
        }
    };

    let threads = *matches.get_one::<usize>("threads").unwrap_or(&1);
    let now = Utc::now();
    let outcome = if threads > 1 {
        pipeline::run_unordered_at(&paths, &policy, now, threads)
    } else {
        pipeline::run_at(&paths, &policy, now)
    };

    // The only error the pipeline returns is pre-flight policy validation.
    let results = match outcome {
        Ok(results) => results,
        Err(e) => {
            eprintln!("rollover: {}", e);
            return 2;
        }
    };

    println!("{}", render(&results, output_mode));
    if results.iter().any(|r| r.is_failed()) {
        1
    } else {
        0
    }
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
