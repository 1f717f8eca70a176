use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::{
    Config, DEFAULT_DECOMPOSE_MAX_TOKENS, DEFAULT_DECOMPOSE_TEMPERATURE,
    DEFAULT_RESULTS_PER_QUERY, DEFAULT_SYNTHESIZE_MAX_TOKENS, DEFAULT_SYNTHESIZE_TEMPERATURE,
};
use crate::llm::{SamplingParams, LLM};
use crate::research::decomposer::QueryDecomposer;
use crate::research::document::{QueryStatus, ResearchReport, SearchQuery};
use crate::research::executor::SearchExecutor;
use crate::research::synthesizer::AnswerSynthesizer;
use crate::search::WebSearch;

/// Stage updates emitted while a question is being researched.
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchProgress {
    /// Decomposition finished with at least one query.
    QueriesGenerated(Vec<SearchQuery>),
    /// One query was searched; `kept` results entered the source list.
    SearchCompleted { query: SearchQuery, kept: usize },
    /// The answer is being written from `sources` results.
    Synthesizing { sources: usize },
}

/// Runs decomposition, search and synthesis for one question.
///
/// Stateless between runs; every call is independent.
pub struct ResearchRunner<L: LLM, S: WebSearch> {
    llm: L,
    search: S,
    decompose: SamplingParams,
    synthesize: SamplingParams,
    results_per_query: usize,
}

impl<L: LLM, S: WebSearch> ResearchRunner<L, S> {
    /// Creates a runner with the default sampling and per-query cap.
    pub fn new(llm: L, search: S) -> Self {
        Self {
            llm,
            search,
            decompose: SamplingParams::new(
                DEFAULT_DECOMPOSE_MAX_TOKENS,
                DEFAULT_DECOMPOSE_TEMPERATURE,
            ),
            synthesize: SamplingParams::new(
                DEFAULT_SYNTHESIZE_MAX_TOKENS,
                DEFAULT_SYNTHESIZE_TEMPERATURE,
            ),
            results_per_query: DEFAULT_RESULTS_PER_QUERY,
        }
    }

    /// Creates a runner using the sampling and pipeline sections of `config`.
    pub fn from_config(llm: L, search: S, config: &Config) -> Self {
        Self {
            llm,
            search,
            decompose: config.llm.decompose.into(),
            synthesize: config.llm.synthesize.into(),
            results_per_query: config.pipeline.results_per_query,
        }
    }

    /// Sets how many results each query may contribute.
    pub fn with_results_per_query(mut self, limit: usize) -> Self {
        self.results_per_query = limit;
        self
    }

    /// Researches `question` and returns the cited answer.
    pub async fn run(&self, question: &str) -> Result<ResearchReport, ResearchError> {
        self.execute(question, None).await
    }

    /// Like [`run`](Self::run), sending stage updates through `tx`.
    pub async fn run_with_progress(
        &self,
        question: &str,
        tx: mpsc::UnboundedSender<ResearchProgress>,
    ) -> Result<ResearchReport, ResearchError> {
        self.execute(question, Some(&tx)).await
    }

    async fn execute(
        &self,
        question: &str,
        tx: Option<&mpsc::UnboundedSender<ResearchProgress>>,
    ) -> Result<ResearchReport, ResearchError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ResearchError::EmptyQuestion);
        }

        let id = Uuid::new_v4().to_string();
        let span = info_span!("research", run_id = %id);

        async move {
            let notify = |event: ResearchProgress| {
                if let Some(tx) = tx {
                    let _ = tx.send(event);
                }
            };

            // 1. Decompose
            let queries = QueryDecomposer::new(&self.llm, self.decompose)
                .decompose(question)
                .await;
            if queries.is_empty() {
                return Err(ResearchError::NoQueries);
            }
            info!(count = queries.len(), "generated search queries");
            notify(ResearchProgress::QueriesGenerated(queries.clone()));

            // 2. Search, one query at a time
            let executor = SearchExecutor::new(&self.search, self.results_per_query);
            let gathered = executor
                .gather_with(&queries, |outcome| {
                    let kept = match outcome.status {
                        QueryStatus::Found { kept, .. } => kept,
                        QueryStatus::Failed { .. } => 0,
                    };
                    notify(ResearchProgress::SearchCompleted {
                        query: outcome.query.clone(),
                        kept,
                    });
                })
                .await;
            if gathered.results.is_empty() {
                return Err(ResearchError::InsufficientInformation { queries });
            }
            info!(sources = gathered.results.len(), "aggregated search results");

            // 3. Synthesize
            notify(ResearchProgress::Synthesizing {
                sources: gathered.results.len(),
            });
            let answer = AnswerSynthesizer::new(&self.llm, self.synthesize)
                .synthesize(question, &gathered.results)
                .await;

            let invalid = answer.invalid_citations(gathered.results.len());
            if !invalid.is_empty() {
                warn!(
                    ?invalid,
                    sources = gathered.results.len(),
                    "answer cites sources that were not provided"
                );
            }

            Ok(ResearchReport {
                id,
                question: question.to_string(),
                queries,
                outcomes: gathered.outcomes,
                sources: gathered.results,
                answer,
                generated_at: Utc::now(),
            })
        }
        .instrument(span)
        .await
    }
}

/// Errors that end a research run.
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("Research question is empty.")]
    EmptyQuestion,

    #[error("Could not generate search queries from the research question.")]
    NoQueries,

    #[error("Insufficient information found to answer the question.")]
    InsufficientInformation { queries: Vec<SearchQuery> },
}
