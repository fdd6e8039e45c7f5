//! Generator configuration.
//!
//! Values resolve in priority order: CLI flag, then environment variable,
//! then the built-in default.
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";
pub const DEFAULT_NUM_CTX: u32 = 4096;

pub const BASE_URL_ENV: &str = "ONTOGEN_BASE_URL";
pub const MODEL_ENV: &str = "ONTOGEN_MODEL";
pub const CACHE_DIR_ENV: &str = "ONTOGEN_CACHE_DIR";

/// Sampling options sent with enhancement requests.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub num_ctx: u32,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.9,
            num_ctx: DEFAULT_NUM_CTX,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub model: String,
    pub probe_timeout: Duration,
    pub generate_timeout: Duration,
    /// Relationships per enhancement request.
    pub batch_size: usize,
    pub enhance: EnhanceOptions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            probe_timeout: Duration::from_secs(5),
            generate_timeout: Duration::from_secs(120),
            batch_size: 2,
            enhance: EnhanceOptions::default(),
        }
    }
}

impl GeneratorConfig {
    /// Apply explicit overrides on top of environment and defaults.
    pub fn resolve(base_url: Option<&str>, model: Option<&str>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            base_url: resolve_setting(base_url, BASE_URL_ENV)
                .unwrap_or(defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            model: resolve_setting(model, MODEL_ENV).unwrap_or(defaults.model),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(anyhow!("base URL must be non-empty"));
        }
        if self.model.trim().is_empty() {
            return Err(anyhow!("model must be non-empty"));
        }
        if self.batch_size == 0 {
            return Err(anyhow!("batch_size must be at least 1"));
        }
        Ok(())
    }
}

/// Resolve the cache directory: explicit arg > env var > user cache dir.
pub fn resolve_cache_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CACHE_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
        .ok_or_else(|| anyhow!("cannot determine cache directory"))?;
    Ok(base.join("ontogen"))
}

fn resolve_setting(explicit: Option<&str>, env_key: &str) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(env_key).ok())
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win_and_trailing_slash_is_trimmed() {
        let config =
            GeneratorConfig::resolve(Some("http://gpu-box:11434/"), Some("deepseek-r1:7b"))
                .unwrap();
        assert_eq!(config.base_url, "http://gpu-box:11434");
        assert_eq!(config.model, "deepseek-r1:7b");
        assert_eq!(config.batch_size, 2);
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert_eq!(config.generate_timeout, Duration::from_secs(120));
    }

    #[test]
    fn validate_rejects_zero_batch_size() {
        let config = GeneratorConfig {
            batch_size: 0,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_cache_dir_is_used_verbatim() {
        let dir = resolve_cache_dir(Some(Path::new("/tmp/ontology-cache"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/ontology-cache"));
    }
}
