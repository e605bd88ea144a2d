//! clap command definition.

use clap::{Arg, ArgAction, Command};

/// Build the `rollover` command line.
pub fn build_cli() -> Command {
    Command::new("rollover")
        .about("Rotate, compress, and expire log files")
        .arg(
            Arg::new("pattern")
                .required(true)
                .num_args(1..)
                .value_name("PATTERN")
                .help("Glob pattern(s) or file paths of live log files"),
        )
        .arg(
            Arg::new("max-size")
                .long("max-size")
                .value_name("SIZE")
                .help("Rotate files strictly larger than SIZE (e.g. 500K, 50M, 2G)"),
        )
        .arg(
            Arg::new("schedule")
                .long("schedule")
                .value_name("WHEN")
                .value_parser(["hourly", "daily", "weekly"])
                .help("Rotate on an elapsed-interval schedule"),
        )
        .arg(
            Arg::new("max-age")
                .long("max-age")
                .value_name("DURATION")
                .help("Rotate files whose content is older than DURATION (e.g. 36h, 7d)"),
        )
        .arg(
            Arg::new("compress")
                .long("compress")
                .value_name("ALGO")
                .value_parser(["none", "gzip", "bz2", "zstd"])
                .default_value("none")
                .help("Compress rotated archives"),
        )
        .arg(
            Arg::new("retain")
                .long("retain")
                .value_name("DAYS")
                .value_parser(clap::value_parser!(u64))
                .help("Delete archives strictly older than DAYS days"),
        )
        .arg(
            Arg::new("keep")
                .long("keep")
                .value_name("N")
                .value_parser(clap::value_parser!(u32))
                .default_value("10")
                .help("Numbered archive slots kept per file (shifting scheme)"),
        )
        .arg(
            Arg::new("timestamp")
                .long("timestamp")
                .action(ArgAction::SetTrue)
                .help("Use timestamp-suffixed archives instead of numbered slots"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .default_value("1")
                .help("Worker threads; above 1 the output order across files is unspecified"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Preview actions without touching the filesystem"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Emit results and summary as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug)"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn pattern_is_required() {
        assert!(build_cli().try_get_matches_from(["rollover"]).is_err());
        assert!(build_cli()
            .try_get_matches_from(["rollover", "/var/log/*.log"])
            .is_ok());
    }

    #[test]
    fn compress_rejects_unknown_algorithms() {
        let result =
            build_cli().try_get_matches_from(["rollover", "a.log", "--compress", "lzma"]);
        assert!(result.is_err());
    }
}
