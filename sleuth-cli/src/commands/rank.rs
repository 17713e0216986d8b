//! `sleuth rank`: ask a model to rank the players of every transcript.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use sleuth_evals::{RankerConfig, rank_transcripts};
use sleuth_models::providers::{OllamaProvider, OllamaProviderConfig};

use crate::config::SleuthConfig;

#[derive(Args, Debug)]
pub struct RankArgs {
    /// Folder of transcripts to rank
    #[arg(long)]
    pub transcripts: Option<PathBuf>,

    /// Model name (e.g. llama3.2, mistral)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Ollama host URL
    #[arg(long)]
    pub host: Option<String>,

    /// Results file (default: ranks.txt inside the transcripts folder)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip pulling the model before ranking
    #[arg(long)]
    pub no_pull: bool,
}

pub async fn run(args: RankArgs, config: &SleuthConfig) -> Result<()> {
    let mut paths = config.paths.clone();
    if let Some(dir) = args.transcripts {
        paths.transcripts_dir = dir;
    }
    let results_path = args.output.unwrap_or_else(|| paths.results_path());

    let provider = OllamaProvider::from_config(&OllamaProviderConfig {
        base_url: args.host.unwrap_or_else(|| config.model.host.clone()),
        timeout: Duration::from_secs(config.model.timeout_secs),
    })?;
    let ranker = RankerConfig {
        model: args.model.unwrap_or_else(|| config.model.name.clone()),
        pull: config.model.pull && !args.no_pull,
        results_path,
    };

    println!(
        "Ranking transcripts in {} with {} at {}...",
        paths.transcripts_dir.display(),
        ranker.model,
        provider.base_url()
    );
    let report = rank_transcripts(&provider, &paths.transcripts_dir, &ranker)
        .await
        .with_context(|| {
            format!(
                "failed to rank transcripts in {}",
                paths.transcripts_dir.display()
            )
        })?;

    let failed = report.failed();
    if !failed.is_empty() {
        println!("Failed {} transcript(s):", failed.len());
        for (file, reason) in &failed {
            println!("  {file}: {reason}");
        }
    }
    println!(
        "Ranked {} transcript(s); results in {}",
        report.ranked(),
        report.results_path.display()
    );
    Ok(())
}
