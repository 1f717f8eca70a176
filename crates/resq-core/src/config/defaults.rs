//! Default values for resq configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// LLM Defaults
// ============================================================================

/// Default LLM provider.
pub const DEFAULT_LLM_PROVIDER: &str = "openai";

// OpenAI defaults
/// Default OpenAI API URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
/// Default OpenAI model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

// Ollama defaults
/// Default Ollama API URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/v1";
/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

// OpenRouter defaults
/// Default OpenRouter API URL.
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1";

// ============================================================================
// Sampling Defaults
// ============================================================================

/// Output budget for query decomposition. A handful of short lines.
pub const DEFAULT_DECOMPOSE_MAX_TOKENS: u32 = 100;
/// Decomposition favors consistent queries over creative ones.
pub const DEFAULT_DECOMPOSE_TEMPERATURE: f32 = 0.5;

/// Output budget for the synthesized answer.
pub const DEFAULT_SYNTHESIZE_MAX_TOKENS: u32 = 500;
/// Synthesis temperature.
pub const DEFAULT_SYNTHESIZE_TEMPERATURE: f32 = 0.7;

/// Upper bound accepted for any sampling temperature.
pub const MAX_TEMPERATURE: f32 = 2.0;

// ============================================================================
// Search Defaults
// ============================================================================

/// Google Custom Search JSON API endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Results kept from each query before aggregation.
pub const DEFAULT_RESULTS_PER_QUERY: usize = 2;

// ============================================================================
// Credentials
// ============================================================================

/// Environment variable holding the language-model API key.
pub const ENV_LLM_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the search API key.
pub const ENV_SEARCH_API_KEY: &str = "SEARCH_API_KEY";
/// Environment variable holding the search engine identifier.
pub const ENV_SEARCH_ENGINE_ID: &str = "SEARCH_ENGINE_ID";

/// Values shipped in sample configs and docs. Treated the same as unset.
pub const PLACEHOLDER_CREDENTIALS: &[&str] = &[
    "your_openai_api_key",
    "your_google_search_api_key",
    "your_google_search_engine_id",
    "Add your OPEN API KEY",
    "Add your SEARCH OPEN API KEY",
    "Add your SEARCH_ENGINE_ID",
];

// ============================================================================
// Config Files
// ============================================================================

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "resq.toml";

/// Directory under the user config dir.
pub const USER_CONFIG_DIR: &str = "resq";

/// File name inside [`USER_CONFIG_DIR`].
pub const USER_CONFIG_FILE: &str = "config.toml";
