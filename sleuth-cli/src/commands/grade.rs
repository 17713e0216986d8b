//! `sleuth grade`: score the rankings recorded in a results file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use sleuth_evals::{GradeOptions, GradeReport, RankingMode, ScanScope, grade_results};

use crate::config::SleuthConfig;

#[derive(Args, Debug)]
pub struct GradeArgs {
    /// Results file to grade (default: the configured results file)
    pub results: Option<PathBuf>,

    /// How to order the players found in an answer
    #[arg(long)]
    pub mode: Option<RankingMode>,

    /// Search the whole block or only the model's answer for mentions
    #[arg(long)]
    pub scope: Option<ScanScope>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: GradeArgs, config: &SleuthConfig) -> Result<()> {
    let path = args.results.unwrap_or_else(|| config.paths.results_path());
    let options = GradeOptions {
        mode: args.mode.unwrap_or(config.grading.mode),
        scope: args.scope.unwrap_or(config.grading.scope),
    };

    let report = grade_results(&path, options)
        .with_context(|| format!("failed to grade {}", path.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary_json(&report))?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn summary_json(report: &GradeReport) -> serde_json::Value {
    serde_json::json!({
        "mode": report.options.mode,
        "scope": report.options.scope,
        "sessions": report.scored(),
        "failures": report.failures(),
        "mean": report.mean_score(),
        "mean_plain": report.mean_by_variant(false),
        "mean_anonymized": report.mean_by_variant(true),
    })
}

fn print_report(report: &GradeReport) {
    let scored = report.scored();
    if scored.is_empty() {
        println!("No sessions could be scored.");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Session").fg(Color::Cyan),
            Cell::new("Variant").fg(Color::Cyan),
            Cell::new("Deceptive").fg(Color::Cyan),
            Cell::new("Ranking").fg(Color::Cyan),
            Cell::new("Score").fg(Color::Cyan),
        ]);
        for outcome in &scored {
            let deceptive: Vec<&str> = outcome.deceptive_set.iter().map(String::as_str).collect();
            table.add_row(vec![
                Cell::new(&outcome.session_id),
                Cell::new(if outcome.was_anonymized { "anonymized" } else { "plain" }),
                Cell::new(deceptive.join(", ")),
                Cell::new(outcome.ranking.join(", ")),
                Cell::new(format!("{:.2}", outcome.score)),
            ]);
        }
        println!("{table}");
    }

    let failures = report.failures();
    if !failures.is_empty() {
        println!();
        println!("Skipped {} block(s):", failures.len());
        for failure in failures {
            println!(
                "  #{} {}: {}",
                failure.index + 1,
                failure.source_file.as_deref().unwrap_or("<unknown file>"),
                failure.reason
            );
        }
    }

    println!();
    println!("Ranking mode:      {}", report.options.mode);
    println!("Scan scope:        {}", report.options.scope);
    println!("Mean score:        {}", format_mean(report.mean_score()));
    println!("  plain:           {}", format_mean(report.mean_by_variant(false)));
    println!("  anonymized:      {}", format_mean(report.mean_by_variant(true)));
}

fn format_mean(mean: Option<f64>) -> String {
    mean.map_or_else(|| "n/a".to_string(), |m| format!("{m:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleuth_evals::grade_text;

    #[test]
    fn format_mean_handles_missing_values() {
        assert_eq!(format_mean(None), "n/a");
        assert_eq!(format_mean(Some(31.25)), "31.25");
    }

    #[test]
    fn summary_json_lists_sessions_and_means() {
        let report = grade_text(
            "File: session_1.txt\nA B\nPlayers: ['A:town', 'B:mafia']\n\n\n",
            GradeOptions::default(),
        );
        let json = summary_json(&report);

        assert_eq!(json["mode"], "table-order");
        assert_eq!(json["scope"], "block");
        assert_eq!(json["sessions"][0]["session_id"], "1");
        assert_eq!(json["sessions"][0]["score"], 50.0);
        assert_eq!(json["mean"], 50.0);
        assert!(json["mean_anonymized"].is_null());
        assert!(json["failures"].as_array().unwrap().is_empty());
    }

    #[test]
    fn summary_json_reports_response_scope_failures() {
        let options = GradeOptions {
            mode: RankingMode::TableOrder,
            scope: ScanScope::Response,
        };
        let report = grade_text(
            "File: session_1.txt\nno idea\nPlayers: ['A:town', 'B:mafia']\n\n\n",
            options,
        );
        let json = summary_json(&report);

        assert_eq!(json["scope"], "response");
        assert!(json["mean"].is_null());
        assert_eq!(json["failures"][0]["kind"], "unranked_deceptive");
    }
}
