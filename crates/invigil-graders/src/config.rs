//! Configuration loading and collaborator factories.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use invigil_core::scoring::ScoringPolicy;
use invigil_core::violations::ViolationPolicy;

use crate::questions::RemoteQuestionSource;
use crate::remote::RemoteGrader;

/// Endpoint of one remote collaborator.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure
/// in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Top-level invigil configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvigilConfig {
    /// Remote grading service, if any. Absent means simulated-only runs.
    #[serde(default)]
    pub grader: Option<ServiceConfig>,
    /// Remote question-generation service, if any.
    #[serde(default)]
    pub question_source: Option<ServiceConfig>,
    /// Bounded wait for the remote grading call, in seconds.
    #[serde(default = "default_grading_timeout")]
    pub grading_timeout_secs: u64,
    /// What happens when the violation count crosses the threshold.
    #[serde(default)]
    pub violation_policy: ViolationPolicy,
    /// Bonus and penalty formula parameters.
    #[serde(default)]
    pub scoring: ScoringPolicy,
    /// Output directory for session reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_grading_timeout() -> u64 {
    10
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./invigil-reports")
}

impl Default for InvigilConfig {
    fn default() -> Self {
        Self {
            grader: None,
            question_source: None,
            grading_timeout_secs: default_grading_timeout(),
            violation_policy: ViolationPolicy::default(),
            scoring: ScoringPolicy::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl InvigilConfig {
    /// Build the remote grader, when one is configured.
    pub fn remote_grader(&self) -> Option<RemoteGrader> {
        self.grader.as_ref().map(|s| {
            RemoteGrader::with_timeout_secs(
                &s.base_url,
                s.api_key.clone(),
                self.grading_timeout_secs,
            )
        })
    }

    /// Build the remote question source, when one is configured.
    pub fn remote_question_source(&self) -> Option<RemoteQuestionSource> {
        self.question_source
            .as_ref()
            .map(|s| RemoteQuestionSource::new(&s.base_url, s.api_key.clone()))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_service_config(config: &ServiceConfig) -> ServiceConfig {
    ServiceConfig {
        base_url: resolve_env_vars(&config.base_url),
        api_key: config.api_key.as_ref().map(|k| resolve_env_vars(k)),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `invigil.toml` in the current directory
/// 2. `~/.config/invigil/config.toml`
///
/// Environment variable override: `INVIGIL_GRADER_KEY`.
pub fn load_config() -> Result<InvigilConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<InvigilConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("invigil.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<InvigilConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => InvigilConfig::default(),
    };

    // Apply env var override for the grader key.
    if let Ok(key) = std::env::var("INVIGIL_GRADER_KEY") {
        if let Some(grader) = config.grader.as_mut() {
            grader.api_key = Some(key);
        }
    }

    config.grader = config.grader.as_ref().map(resolve_service_config);
    config.question_source = config.question_source.as_ref().map(resolve_service_config);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("invigil"))
}
