mod error;
mod openai;
mod provider;

pub use error::LLMError;
pub use openai::OpenAIClient;
pub use provider::Provider;

use async_trait::async_trait;

use crate::config::SamplingConfig;

/// Output budget and sampling temperature for a single completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl SamplingParams {
    pub fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

impl From<SamplingConfig> for SamplingParams {
    fn from(config: SamplingConfig) -> Self {
        Self::new(config.max_tokens, config.temperature)
    }
}

/// Trait for chat-completion language models.
///
/// The pipeline only ever sends one system message followed by one user
/// message and reads back the text of the first choice.
///
/// # Example
///
/// ```ignore
/// use resq_core::llm::{Provider, SamplingParams, LLM};
///
/// let llm = Provider::from_config(&config.llm, &credentials).build()?;
/// let text = llm
///     .complete_with_system("You are terse.", "Hello!", SamplingParams::new(50, 0.2))
///     .await?;
/// ```
#[async_trait]
pub trait LLM: Send + Sync {
    /// Complete a prompt with a system message.
    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
        params: SamplingParams,
    ) -> Result<String, LLMError>;
}

/// Blanket implementation for boxed trait objects.
#[async_trait]
impl LLM for Box<dyn LLM> {
    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
        params: SamplingParams,
    ) -> Result<String, LLMError> {
        (**self).complete_with_system(system, prompt, params).await
    }
}

#[async_trait]
impl<'a, T: LLM + ?Sized> LLM for &'a T {
    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
        params: SamplingParams,
    ) -> Result<String, LLMError> {
        (**self).complete_with_system(system, prompt, params).await
    }
}
