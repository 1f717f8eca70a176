//! Configuration management for resq.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `resq.toml` file
//! 3. User config `~/.config/resq/config.toml`
//! 4. Built-in defaults (lowest priority)
//!
//! Secrets are normally supplied through the environment only. They are
//! checked by [`Config::credentials`] before any network call is made.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("{}", format_missing(.0))]
    MissingCredentials(Vec<MissingCredential>),
}

fn format_missing(missing: &[MissingCredential]) -> String {
    missing
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A credential that was absent, blank, or still set to a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingCredential {
    LlmApiKey,
    SearchApiKey,
    SearchEngineId,
}

impl MissingCredential {
    /// The environment variable that supplies this credential.
    pub fn env_var(&self) -> &'static str {
        match self {
            MissingCredential::LlmApiKey => ENV_LLM_API_KEY,
            MissingCredential::SearchApiKey => ENV_SEARCH_API_KEY,
            MissingCredential::SearchEngineId => ENV_SEARCH_ENGINE_ID,
        }
    }
}

impl fmt::Display for MissingCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error: Please set your {} environment variable.",
            self.env_var()
        )
    }
}

/// Validated secrets required by the pipeline's external clients.
#[derive(Clone)]
pub struct Credentials {
    pub llm_api_key: String,
    pub search_api_key: String,
    pub search_engine_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("llm_api_key", &"<redacted>")
            .field("search_api_key", &"<redacted>")
            .field("search_engine_id", &self.search_engine_id)
            .finish()
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration.
    pub llm: LLMConfig,

    /// Web search configuration.
    pub search: SearchConfig,

    /// Pipeline tuning.
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./resq.toml` (project local)
    /// 2. `~/.config/resq/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(LOCAL_CONFIG_FILE).exists() {
            return Self::from_file(LOCAL_CONFIG_FILE);
        }

        if let Some(path) = Self::user_config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Path of the per-user config file, if the platform has a config dir.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE))
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse configuration from TOML text without consulting the environment.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Credentials
        if let Some(key) = lookup(ENV_LLM_API_KEY) {
            self.llm.api_key = Some(key);
        }
        if let Some(key) = lookup(ENV_SEARCH_API_KEY) {
            self.search.api_key = Some(key);
        }
        if let Some(id) = lookup(ENV_SEARCH_ENGINE_ID) {
            self.search.engine_id = Some(id);
        }

        // LLM overrides
        if let Some(provider) = lookup("RESQ_LLM_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Some(model) = lookup("RESQ_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Some(url) = lookup("RESQ_LLM_BASE_URL") {
            self.llm.base_url = Some(url);
        }

        // Search overrides
        if let Some(url) = lookup("RESQ_SEARCH_BASE_URL") {
            self.search.base_url = url;
        }

        // Pipeline overrides
        if let Some(n) = lookup("RESQ_RESULTS_PER_QUERY").and_then(|v| v.parse().ok()) {
            self.pipeline.results_per_query = n;
        }
    }

    /// Check the numeric settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.results_per_query == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.results_per_query must be at least 1".to_string(),
            ));
        }
        self.llm.decompose.validate("llm.decompose")?;
        self.llm.synthesize.validate("llm.synthesize")?;
        Ok(())
    }

    /// Collect the three secrets, reporting every one that is unusable.
    ///
    /// Providers that run locally (`ollama`) do not need an LLM key.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let mut missing = Vec::new();

        let llm_api_key = if self.llm.requires_api_key() {
            usable(self.llm.api_key.as_deref()).unwrap_or_else(|| {
                missing.push(MissingCredential::LlmApiKey);
                String::new()
            })
        } else {
            usable(self.llm.api_key.as_deref()).unwrap_or_default()
        };

        let search_api_key = usable(self.search.api_key.as_deref()).unwrap_or_else(|| {
            missing.push(MissingCredential::SearchApiKey);
            String::new()
        });

        let search_engine_id = usable(self.search.engine_id.as_deref()).unwrap_or_else(|| {
            missing.push(MissingCredential::SearchEngineId);
            String::new()
        });

        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing));
        }

        Ok(Credentials {
            llm_api_key,
            search_api_key,
            search_engine_id,
        })
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Returns the trimmed value unless it is blank or a known placeholder.
fn usable(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() || is_placeholder(value) {
        return None;
    }
    Some(value.to_string())
}

/// Whether a credential value is one of the sample placeholders.
pub fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_CREDENTIALS.contains(&value.trim())
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// Provider name: "openai", "openrouter", "ollama", or "openai-compatible".
    pub provider: String,

    /// Model name (provider-specific).
    pub model: Option<String>,

    /// Base URL for API (for openai-compatible providers).
    pub base_url: Option<String>,

    /// API key (normally set via `OPENAI_API_KEY`).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Sampling for the query decomposition call.
    #[serde(deserialize_with = "decompose_sampling")]
    pub decompose: SamplingConfig,

    /// Sampling for the answer synthesis call.
    #[serde(deserialize_with = "synthesize_sampling")]
    pub synthesize: SamplingConfig,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_LLM_PROVIDER.to_string(),
            model: None,
            base_url: None,
            api_key: None,
            decompose: SamplingConfig::decompose(),
            synthesize: SamplingConfig::synthesize(),
        }
    }
}

impl LLMConfig {
    /// Get the model name, falling back to provider defaults.
    pub fn model_or_default(&self) -> String {
        self.model.clone().unwrap_or_else(|| match self.provider.as_str() {
            "ollama" => DEFAULT_OLLAMA_MODEL.to_string(),
            _ => DEFAULT_OPENAI_MODEL.to_string(),
        })
    }

    /// Get the base URL, falling back to provider defaults.
    pub fn base_url_or_default(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| match self.provider.as_str() {
            "ollama" => DEFAULT_OLLAMA_URL.to_string(),
            "openrouter" => DEFAULT_OPENROUTER_URL.to_string(),
            _ => DEFAULT_OPENAI_URL.to_string(),
        })
    }

    /// Local providers accept unauthenticated requests.
    pub fn requires_api_key(&self) -> bool {
        self.provider != "ollama"
    }
}

/// Output budget and temperature for one kind of completion call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl SamplingConfig {
    /// Defaults for the query decomposition call.
    pub fn decompose() -> Self {
        Self {
            max_tokens: DEFAULT_DECOMPOSE_MAX_TOKENS,
            temperature: DEFAULT_DECOMPOSE_TEMPERATURE,
        }
    }

    /// Defaults for the answer synthesis call.
    pub fn synthesize() -> Self {
        Self {
            max_tokens: DEFAULT_SYNTHESIZE_MAX_TOKENS,
            temperature: DEFAULT_SYNTHESIZE_TEMPERATURE,
        }
    }

    fn validate(&self, section: &str) -> Result<(), ConfigError> {
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid(format!(
                "{section}.max_tokens must be greater than 0"
            )));
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "{section}.temperature must be between 0 and {MAX_TEMPERATURE}"
            )));
        }
        Ok(())
    }
}

/// A sampling section as written in the file; absent keys fall back to
/// the defaults of the section they appear in.
#[derive(Deserialize)]
struct PartialSampling {
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl PartialSampling {
    fn or(self, base: SamplingConfig) -> SamplingConfig {
        SamplingConfig {
            max_tokens: self.max_tokens.unwrap_or(base.max_tokens),
            temperature: self.temperature.unwrap_or(base.temperature),
        }
    }
}

fn decompose_sampling<'de, D>(deserializer: D) -> Result<SamplingConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(PartialSampling::deserialize(deserializer)?.or(SamplingConfig::decompose()))
}

fn synthesize_sampling<'de, D>(deserializer: D) -> Result<SamplingConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(PartialSampling::deserialize(deserializer)?.or(SamplingConfig::synthesize()))
}

/// Web search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search API endpoint.
    pub base_url: String,

    /// Search API key (normally set via `SEARCH_API_KEY`).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Programmable search engine identifier (`cx`).
    #[serde(skip_serializing)]
    pub engine_id: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            api_key: None,
            engine_id: None,
        }
    }
}

/// Pipeline tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Results kept from each query before aggregation.
    pub results_per_query: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            results_per_query: DEFAULT_RESULTS_PER_QUERY,
        }
    }
}
