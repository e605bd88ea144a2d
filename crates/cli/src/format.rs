//! Result rendering: human lines or JSON.

use rollover_core::{RotationAction, RotationResult, RunSummary};

/// Output mode selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One line per non-skipped result plus a summary block.
    Human,
    /// A JSON object with `results` and `summary`.
    Json,
}

/// Render a completed run.
pub fn render(results: &[RotationResult], mode: OutputMode) -> String {
    let summary = RunSummary::from_results(results);
    match mode {
        OutputMode::Human => render_human(results, &summary),
        OutputMode::Json => render_json(results, &summary),
    }
}

fn render_human(results: &[RotationResult], summary: &RunSummary) -> String {
    let mut out = String::new();
    for result in results {
        if result.action == RotationAction::Skipped {
            continue;
        }
        let prefix = if result.dry_run { "[dry-run] " } else { "" };
        out.push_str(&format!(
            "{}{}: {} ({})\n",
            prefix,
            result.action,
            result.path.display(),
            result.reason
        ));
    }
    if results.iter().any(|r| r.action != RotationAction::Skipped) {
        out.push_str(&summary.to_string());
    } else {
        out.push_str("No files needed rotation.");
    }
    out
}

fn render_json(results: &[RotationResult], summary: &RunSummary) -> String {
    let value = serde_json::json!({
        "results": results,
        "summary": summary,
    });
    // Results and summary are plain serializable structs; this cannot fail.
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rollover_core::{ArchiveEntry, Compression};
    use std::path::PathBuf;

    fn rotated() -> RotationResult {
        let entry = ArchiveEntry {
            archive_path: PathBuf::from("/var/log/app.log.1.gz"),
            created_at: Utc::now(),
            compressed: true,
            algorithm: Compression::Gzip,
            original_size: 1000,
            compressed_size: Some(300),
        };
        RotationResult::rotated_compressed("/var/log/app.log", &entry, false)
    }

    #[test]
    fn human_output_lists_actions_and_summary() {
        let results = vec![
            rotated(),
            RotationResult::skipped("/var/log/quiet.log", "no rotation trigger fired"),
        ];
        let text = render(&results, OutputMode::Human);
        assert!(text.contains("rotated+compressed: /var/log/app.log"));
        assert!(!text.contains("quiet.log"), "skips are not listed");
        assert!(text.contains("Rotated 1 file(s)"));
        assert!(text.contains("Space saved: 70.0%"));
    }

    #[test]
    fn all_skipped_prints_the_quiet_message() {
        let results = vec![RotationResult::skipped("/var/log/quiet.log", "below threshold")];
        let text = render(&results, OutputMode::Human);
        assert_eq!(text, "No files needed rotation.");
    }

    #[test]
    fn dry_run_lines_are_prefixed() {
        let entry = ArchiveEntry {
            archive_path: PathBuf::from("/var/log/app.log.1"),
            created_at: Utc::now(),
            compressed: false,
            algorithm: Compression::None,
            original_size: 10,
            compressed_size: None,
        };
        let results = vec![RotationResult::rotated("/var/log/app.log", &entry, true)];
        let text = render(&results, OutputMode::Human);
        assert!(text.starts_with("[dry-run] rotated:"));
    }

    #[test]
    fn json_output_carries_results_and_summary() {
        let results = vec![rotated()];
        let text = render(&results, OutputMode::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["results"][0]["action"], "rotated_compressed");
        assert_eq!(value["summary"]["rotated"], 1);
    }
}
