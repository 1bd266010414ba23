//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the classification service credential.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
const MODEL_ENV: &str = "OPENROUTER_MODEL";
const SITE_URL_ENV: &str = "OPENROUTER_SITE_URL";
const SITE_TITLE_ENV: &str = "OPENROUTER_SITE_TITLE";

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Classification service settings
    #[serde(default)]
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (openrouter)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// API key; empty means the normalizer passes transcripts through
    #[serde(default)]
    pub api_key: String,

    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Sent as `HTTP-Referer` when non-empty
    #[serde(default)]
    pub site_url: String,

    /// Sent as `X-Title` when non-empty
    #[serde(default)]
    pub site_title: String,

    /// Response length ceiling
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions

fn default_log_level() -> String {
    "info".to_string()
}

fn default_llm_provider() -> String {
    "openrouter".to_string()
}

fn default_llm_model() -> String {
    "meta-llama/llama-3.3-70b-instruct:free".to_string()
}

fn default_llm_endpoint() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_max_tokens() -> u32 {
    200
}

fn default_temperature() -> f32 {
    0.1
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            model: default_llm_model(),
            endpoint: default_llm_endpoint(),
            site_url: String::new(),
            site_title: String::new(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmSettings {
    /// Whether a usable credential is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::debug!("No config file found, using defaults");
            return Ok(Self::from_env());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env_overrides();
        settings
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if !self.llm.has_api_key() {
            if let Some(key) = non_empty(API_KEY_ENV) {
                self.llm.api_key = key;
            }
        }
        if let Some(model) = non_empty(MODEL_ENV) {
            self.llm.model = model;
        }
        if let Some(url) = non_empty(SITE_URL_ENV) {
            self.llm.site_url = url;
        }
        if let Some(title) = non_empty(SITE_TITLE_ENV) {
            self.llm.site_title = title;
        }
    }

    /// Copy of these settings that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut settings = self.clone();
        if settings.llm.has_api_key() {
            settings.llm.api_key = "********".to_string();
        }
        settings
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "voxnorm", "voxnorm")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}
