//! `sleuth build`: turn a dataset of game logs into transcripts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use sleuth_transcripts::{AliasPool, BuildOptions, TranscriptOptions, build_transcripts};

use crate::config::SleuthConfig;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Dataset directory holding one folder per session
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Output directory for transcripts
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Leave the daytime/nighttime marker lines out of transcripts
    #[arg(long)]
    pub no_phase_markers: bool,
}

pub fn run(args: BuildArgs, config: &SleuthConfig) -> Result<()> {
    let dataset = args
        .dataset
        .unwrap_or_else(|| config.paths.dataset_dir.clone());
    let out = args
        .out
        .unwrap_or_else(|| config.paths.transcripts_dir.clone());
    let options = BuildOptions {
        alias_pool: AliasPool::alphabet(config.transcripts.alias_prefix.clone()),
        transcript: TranscriptOptions {
            include_phase_markers: config.transcripts.include_phase_markers
                && !args.no_phase_markers,
        },
    };

    let report = build_transcripts(&dataset, &out, &options)
        .with_context(|| format!("failed to build transcripts from {}", dataset.display()))?;

    let written: Vec<_> = report.written().collect();
    if written.is_empty() {
        println!("No transcripts written.");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Session").fg(Color::Cyan),
            Cell::new("Players").fg(Color::Cyan),
            Cell::new("Source").fg(Color::Cyan),
        ]);
        for session in &written {
            table.add_row(vec![
                Cell::new(session.number),
                Cell::new(session.players),
                Cell::new(session.source.display()),
            ]);
        }
        println!("{table}");
    }

    let skipped: Vec<_> = report.skipped().collect();
    if !skipped.is_empty() {
        println!();
        println!("Skipped {} session(s):", skipped.len());
        for session in skipped {
            println!("  {}: {}", session.source.display(), session.reason);
        }
    }

    println!();
    println!(
        "Wrote {} session(s) to {}",
        written.len(),
        out.display()
    );
    Ok(())
}
