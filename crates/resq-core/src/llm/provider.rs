use crate::config::{Credentials, LLMConfig};
use super::{OpenAIClient, LLM};

/// LLM Provider configuration.
///
/// Every supported provider speaks the OpenAI chat completions protocol;
/// they differ in endpoint and whether a key is sent.
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI or any OpenAI-compatible endpoint.
    OpenAI {
        base_url: String,
        api_key: String,
        model: String,
    },
    /// Local Ollama instance
    Ollama { base_url: String, model: String },
}

impl Provider {
    /// Creates a provider from LLMConfig and the validated credentials.
    pub fn from_config(config: &LLMConfig, credentials: &Credentials) -> Self {
        let base_url = config.base_url_or_default();
        let model = config.model_or_default();

        match config.provider.as_str() {
            "ollama" => Provider::Ollama { base_url, model },
            _ => Provider::OpenAI {
                base_url,
                api_key: credentials.llm_api_key.clone(),
                model,
            },
        }
    }

    /// Creates an LLM client from the provider configuration.
    pub fn build(self) -> Box<dyn LLM> {
        match self {
            Provider::OpenAI {
                base_url,
                api_key,
                model,
            } => Box::new(OpenAIClient::new(base_url, api_key, model)),
            Provider::Ollama { base_url, model } => {
                Box::new(OpenAIClient::new(base_url, "", model))
            }
        }
    }

    /// The model id this provider will request.
    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } | Provider::Ollama { model, .. } => model,
        }
    }
}
