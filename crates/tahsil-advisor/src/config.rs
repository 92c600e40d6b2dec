//! Configuration loading and advisor factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tahsil_core::model::Lang;
use tahsil_core::traits::Advisor;

use crate::backend::BackendAdvisor;

/// Remote backend settings.
///
/// Note: Custom Debug impl masks the auth key to keep it out of logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the school-suggestion service.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Bearer token for the school-suggestion service.
    #[serde(default)]
    pub auth_key: Option<String>,
    /// Base URL of the grade-analysis service; defaults to `base_url`.
    #[serde(default)]
    pub analysis_url: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Retries on transient failures.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds, doubled each time.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("auth_key", &self.auth_key.as_ref().map(|_| "***"))
            .field("analysis_url", &self.analysis_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_key: None,
            analysis_url: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

/// Top-level tahsil configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TahsilConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    /// Language sent to the advisor.
    #[serde(default)]
    pub lang: Lang,
    /// Target average used when a command is given none.
    #[serde(default = "default_target")]
    pub default_target: f64,
    /// Where custom-mode templates are kept.
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,
}

fn default_timeout() -> u64 {
    30
}
fn default_retries() -> u32 {
    2
}
fn default_retry_delay() -> u64 {
    500
}
fn default_target() -> f64 {
    10.0
}
fn default_template_dir() -> PathBuf {
    PathBuf::from("./.tahsil/templates")
}

impl Default for TahsilConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            lang: Lang::default(),
            default_target: default_target(),
            template_dir: default_template_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_opt(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        *v = resolve_env_vars(v);
    }
    if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        *value = None;
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `tahsil.toml` in the current directory
/// 2. `~/.config/tahsil/config.toml`
///
/// Environment variable overrides: `TAHSIL_BACKEND_URL`, `TAHSIL_AUTH_KEY`.
pub fn load_config() -> Result<TahsilConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<TahsilConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("tahsil.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<TahsilConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => TahsilConfig::default(),
    };

    if let Ok(url) = std::env::var("TAHSIL_BACKEND_URL") {
        config.backend.base_url = Some(url);
    }
    if let Ok(key) = std::env::var("TAHSIL_AUTH_KEY") {
        config.backend.auth_key = Some(key);
    }

    resolve_opt(&mut config.backend.base_url);
    resolve_opt(&mut config.backend.auth_key);
    resolve_opt(&mut config.backend.analysis_url);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("tahsil"))
}

/// Create the advisor described by the configuration.
pub fn create_advisor(config: &BackendConfig) -> Result<Box<dyn Advisor>> {
    Ok(Box::new(BackendAdvisor::from_config(config)?))
}
