use super::types::{
    DEFAULT_ALIAS_PREFIX, DEFAULT_HOST, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, GradingConfig,
    ModelConfig, PathsConfig, RawGradingConfig, RawModelConfig, RawPathsConfig, RawSleuthConfig,
    RawTranscriptsConfig, SleuthConfig, TranscriptsConfig,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<SleuthConfig> {
        Self::load_layers(
            Self::user_config_path().as_deref(),
            &Self::project_config_path(),
        )
    }

    /// Load and merge the given layers, later layers winning
    fn load_layers(user_path: Option<&Path>, project_path: &Path) -> Result<SleuthConfig> {
        let mut raw = RawSleuthConfig::default();

        // Layer 1: User config
        if let Some(user_path) = user_path
            && let Some(user_config) = Self::read_layer(user_path)?
        {
            raw = Self::merge_raw(raw, user_config);
        }

        // Layer 2: Project config
        if let Some(project_config) = Self::read_layer(project_path)? {
            raw = Self::merge_raw(raw, project_config);
        }

        // Convert to final config with defaults applied
        Ok(Self::finalize(raw))
    }

    fn read_layer(path: &Path) -> Result<Option<RawSleuthConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        debug!(path = %path.display(), "reading config layer");
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let layer = toml::from_str(&contents)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(Some(layer))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "sleuth").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with SLEUTH_PROJECT_CONFIG_DIR env var (useful for isolated tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("SLEUTH_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".sleuth/config.toml")
        }
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawSleuthConfig, overlay: RawSleuthConfig) -> RawSleuthConfig {
        RawSleuthConfig {
            model: RawModelConfig {
                name: overlay.model.name.or(base.model.name),
                host: overlay.model.host.or(base.model.host),
                timeout_secs: overlay.model.timeout_secs.or(base.model.timeout_secs),
                pull: overlay.model.pull.or(base.model.pull),
            },
            paths: RawPathsConfig {
                dataset_dir: overlay.paths.dataset_dir.or(base.paths.dataset_dir),
                transcripts_dir: overlay.paths.transcripts_dir.or(base.paths.transcripts_dir),
                results_file: overlay.paths.results_file.or(base.paths.results_file),
            },
            transcripts: RawTranscriptsConfig {
                alias_prefix: overlay
                    .transcripts
                    .alias_prefix
                    .or(base.transcripts.alias_prefix),
                include_phase_markers: overlay
                    .transcripts
                    .include_phase_markers
                    .or(base.transcripts.include_phase_markers),
            },
            grading: RawGradingConfig {
                mode: overlay.grading.mode.or(base.grading.mode),
                scope: overlay.grading.scope.or(base.grading.scope),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawSleuthConfig) -> SleuthConfig {
        let paths = PathsConfig::default();
        SleuthConfig {
            model: ModelConfig {
                name: raw.model.name.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                host: raw.model.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
                timeout_secs: raw.model.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
                pull: raw.model.pull.unwrap_or(true),
            },
            paths: PathsConfig {
                dataset_dir: raw.paths.dataset_dir.unwrap_or(paths.dataset_dir),
                transcripts_dir: raw.paths.transcripts_dir.unwrap_or(paths.transcripts_dir),
                results_file: raw.paths.results_file.unwrap_or(paths.results_file),
            },
            transcripts: TranscriptsConfig {
                alias_prefix: raw
                    .transcripts
                    .alias_prefix
                    .unwrap_or_else(|| DEFAULT_ALIAS_PREFIX.to_string()),
                include_phase_markers: raw.transcripts.include_phase_markers.unwrap_or(true),
            },
            grading: GradingConfig {
                mode: raw.grading.mode.unwrap_or_default(),
                scope: raw.grading.scope.unwrap_or_default(),
            },
        }
    }
}
