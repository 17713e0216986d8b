use serde::{Deserialize, Serialize};
use sleuth_evals::{RankingMode, ScanScope};
use std::path::PathBuf;

/// Default model used for ranking
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Default Ollama host
pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// Default request timeout for model calls, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default alias prefix for anonymized transcripts
pub const DEFAULT_ALIAS_PREFIX: &str = "Player_";

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSleuthConfig {
    #[serde(default)]
    pub model: RawModelConfig,

    #[serde(default)]
    pub paths: RawPathsConfig,

    #[serde(default)]
    pub transcripts: RawTranscriptsConfig,

    #[serde(default)]
    pub grading: RawGradingConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawModelConfig {
    pub name: Option<String>,
    pub host: Option<String>,
    pub timeout_secs: Option<u64>,
    pub pull: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawPathsConfig {
    pub dataset_dir: Option<PathBuf>,
    pub transcripts_dir: Option<PathBuf>,
    pub results_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawTranscriptsConfig {
    pub alias_prefix: Option<String>,
    pub include_phase_markers: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawGradingConfig {
    pub mode: Option<RankingMode>,
    pub scope: Option<ScanScope>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SleuthConfig {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub transcripts: TranscriptsConfig,

    #[serde(default)]
    pub grading: GradingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Model asked to rank the players
    pub name: String,

    /// Ollama base URL
    pub host: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Pull the model before a ranking batch
    pub pull: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            host: DEFAULT_HOST.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            pull: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    /// Root of the raw game logs
    pub dataset_dir: PathBuf,

    /// Where transcripts are written and read back for ranking
    pub transcripts_dir: PathBuf,

    /// Results file; relative paths resolve inside `transcripts_dir`
    pub results_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("./dataset"),
            transcripts_dir: PathBuf::from("./transcripts"),
            results_file: PathBuf::from("ranks.txt"),
        }
    }
}

impl PathsConfig {
    /// Results file path with relative paths resolved against `transcripts_dir`.
    pub fn results_path(&self) -> PathBuf {
        if self.results_file.is_absolute() {
            self.results_file.clone()
        } else {
            self.transcripts_dir.join(&self.results_file)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptsConfig {
    pub alias_prefix: String,
    pub include_phase_markers: bool,
}

impl Default for TranscriptsConfig {
    fn default() -> Self {
        Self {
            alias_prefix: DEFAULT_ALIAS_PREFIX.to_string(),
            include_phase_markers: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GradingConfig {
    pub mode: RankingMode,

    /// Part of each results block searched for player mentions
    #[serde(default)]
    pub scope: ScanScope,
}
