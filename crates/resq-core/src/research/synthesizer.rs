use tracing::{debug, warn};

use super::document::{ResultSet, SynthesizedAnswer};
use super::prompts::{build_synthesize_prompt, SYNTHESIZE_SYSTEM_PROMPT};
use crate::llm::{SamplingParams, LLM};

/// Answer returned when the synthesis call fails.
pub const FALLBACK_ANSWER: &str = "Error synthesizing answer.";

/// Writes the final answer from the aggregated sources.
pub struct AnswerSynthesizer<'a, L: LLM> {
    llm: &'a L,
    params: SamplingParams,
}

impl<'a, L: LLM> AnswerSynthesizer<'a, L> {
    pub fn new(llm: &'a L, params: SamplingParams) -> Self {
        Self { llm, params }
    }

    /// Asks the model to answer `question` citing `sources` as `[Source N]`.
    ///
    /// On model failure the error is logged and [`FALLBACK_ANSWER`] is
    /// returned with `fallback` set.
    pub async fn synthesize(&self, question: &str, sources: &ResultSet) -> SynthesizedAnswer {
        let prompt = build_synthesize_prompt(question, sources);
        debug!(sources = sources.len(), "synthesizing answer");

        match self
            .llm
            .complete_with_system(SYNTHESIZE_SYSTEM_PROMPT, &prompt, self.params)
            .await
        {
            Ok(text) => SynthesizedAnswer::new(text.trim()),
            Err(err) => {
                warn!(error = %err, "answer synthesis failed");
                SynthesizedAnswer {
                    text: FALLBACK_ANSWER.to_string(),
                    fallback: true,
                }
            }
        }
    }
}
