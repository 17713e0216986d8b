//! Ranking pipeline: prompt a model with every transcript of a folder and
//! record its answers as a results file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use sleuth_models::providers::{GenerateRequest, ModelProvider};
use tracing::{debug, info, warn};

use crate::block::BLOCK_SEPARATOR;
use crate::error::{Error, Result};
use crate::prompt::{TranscriptFile, build_prompt};

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").expect("valid blank run regex"));

/// Settings for one ranking batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankerConfig {
    pub model: String,
    /// Ask the provider to fetch the model before the batch.
    pub pull: bool,
    /// Where the results file is written. Truncated at the start of a run.
    pub results_path: PathBuf,
}

/// Outcome for one transcript file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RankOutcome {
    Ranked { file: String },
    Failed { file: String, reason: String },
}

/// Per-file outcomes of a ranking batch, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankReport {
    pub results_path: PathBuf,
    pub outcomes: Vec<RankOutcome>,
}

impl RankReport {
    #[must_use]
    pub fn ranked(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RankOutcome::Ranked { .. }))
            .count()
    }

    #[must_use]
    pub fn failed(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                RankOutcome::Failed { file, reason } => Some((file.as_str(), reason.as_str())),
                RankOutcome::Ranked { .. } => None,
            })
            .collect()
    }
}

/// Transcript files of `folder` in name order, without the results file.
pub fn transcript_files(folder: &Path, results_path: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(Error::MissingDirectory(folder.to_path_buf()));
    }
    let results_name = results_path.file_name();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "txt") {
            continue;
        }
        if path.file_name() == results_name && same_parent(&path, results_path) {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Rank every transcript in `folder` with `provider`.
///
/// Each answer is appended to the results file as soon as it arrives, so
/// an interrupted run keeps the blocks written so far. A transcript that
/// cannot be read or ranked is recorded as failed and the batch goes on.
pub async fn rank_transcripts(
    provider: &dyn ModelProvider,
    folder: &Path,
    config: &RankerConfig,
) -> Result<RankReport> {
    let files = transcript_files(folder, &config.results_path)?;

    if config.pull {
        provider.prepare(&config.model).await?;
    }

    let mut output = BufWriter::new(File::create(&config.results_path)?);
    let mut report = RankReport {
        results_path: config.results_path.clone(),
        outcomes: Vec::with_capacity(files.len()),
    };

    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(file = %name, model = %config.model, "ranking transcript");

        match rank_one(provider, path, &config.model).await {
            Ok(block) => {
                output.write_all(block.as_bytes())?;
                output.flush()?;
                report.outcomes.push(RankOutcome::Ranked { file: name });
            }
            Err(e) => {
                warn!(file = %name, reason = %e, "skipping transcript");
                report.outcomes.push(RankOutcome::Failed {
                    file: name,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        results = %config.results_path.display(),
        ranked = report.ranked(),
        failed = report.failed().len(),
        "ranking complete"
    );
    Ok(report)
}

async fn rank_one(provider: &dyn ModelProvider, path: &Path, model: &str) -> Result<String> {
    let transcript = TranscriptFile::load(path)?;
    let prompt = build_prompt(&transcript);
    debug!(file = %transcript.name, prompt_len = prompt.len(), "prompting model");

    let response = provider.generate(GenerateRequest::new(model, prompt)).await?;
    debug!(
        file = %transcript.name,
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        "model answered"
    );
    Ok(format!(
        "File: {}\n{}\n{}{BLOCK_SEPARATOR}",
        transcript.name,
        sanitize_response(&response.text),
        transcript.players_line
    ))
}

/// Keep a response from breaking the block layout: blank-line runs that
/// would read as a block separator shrink to one blank line, and the
/// ends are trimmed.
#[must_use]
pub fn sanitize_response(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    BLANK_RUN
        .replace_all(normalized.trim(), "\n\n")
        .into_owned()
}

fn same_parent(a: &Path, b: &Path) -> bool {
    let parent = |p: &Path| {
        p.parent()
            .and_then(|d| d.canonicalize().ok())
            .unwrap_or_else(|| p.parent().map(Path::to_path_buf).unwrap_or_default())
    };
    parent(a) == parent(b)
}
