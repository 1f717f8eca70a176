use tracing::{debug, warn};

use super::document::SearchQuery;
use super::prompts::{build_decompose_prompt, DECOMPOSE_SYSTEM_PROMPT};
use crate::llm::{SamplingParams, LLM};

/// Turns a research question into a handful of web search queries.
pub struct QueryDecomposer<'a, L: LLM> {
    llm: &'a L,
    params: SamplingParams,
}

impl<'a, L: LLM> QueryDecomposer<'a, L> {
    pub fn new(llm: &'a L, params: SamplingParams) -> Self {
        Self { llm, params }
    }

    /// Asks the model for queries and parses its reply.
    ///
    /// Never fails: a model error is logged and yields no queries. Whether an
    /// empty list ends the run is the caller's decision.
    pub async fn decompose(&self, question: &str) -> Vec<SearchQuery> {
        let prompt = build_decompose_prompt(question);

        match self
            .llm
            .complete_with_system(DECOMPOSE_SYSTEM_PROMPT, &prompt, self.params)
            .await
        {
            Ok(response) => {
                let queries = parse_queries(&response);
                debug!(count = queries.len(), "decomposed question");
                queries
            }
            Err(err) => {
                warn!(error = %err, "query decomposition failed");
                Vec::new()
            }
        }
    }
}

/// Best-effort parser for a model reply listing one query per line.
///
/// Blank lines are skipped. Each line is trimmed and loses its leading list
/// marker (digits, periods, dashes, `)`, `*`, whitespace), so `1. coral reefs 2024`
/// becomes `coral reefs 2024`. A query that itself starts with a number loses
/// that number too.
pub fn parse_queries(response: &str) -> Vec<SearchQuery> {
    response
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(is_list_marker)
                .trim()
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_list_marker(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || matches!(c, '.' | '-' | ')' | '*')
}
