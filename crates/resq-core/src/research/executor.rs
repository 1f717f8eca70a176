use tracing::{debug, warn};

use super::document::{QueryOutcome, QueryStatus, ResultSet, SearchQuery};
use crate::search::{SearchError, SearchResult, WebSearch};

/// Runs search queries one at a time and aggregates their results.
pub struct SearchExecutor<'a, S: WebSearch> {
    backend: &'a S,
    results_per_query: usize,
}

/// Aggregated results plus what happened to each query.
#[derive(Debug, Clone, Default)]
pub struct Gathered {
    pub results: ResultSet,
    pub outcomes: Vec<QueryOutcome>,
}

impl<'a, S: WebSearch> SearchExecutor<'a, S> {
    pub fn new(backend: &'a S, results_per_query: usize) -> Self {
        Self {
            backend,
            results_per_query,
        }
    }

    /// Searches a single query. Failures are logged and yield no results.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        self.try_search(query).await.unwrap_or_default()
    }

    async fn try_search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let outcome = self.backend.search(query).await;
        match &outcome {
            Ok(results) => debug!(query, count = results.len(), "search succeeded"),
            Err(SearchError::Api { status, body }) => {
                warn!(query, status, body = %body, "search API returned an error")
            }
            Err(err) => warn!(query, error = %err, "search request failed"),
        }
        outcome
    }

    /// Searches every query in order, keeping the first `results_per_query`
    /// hits of each. A failed query contributes nothing and does not stop
    /// the rest.
    pub async fn gather(&self, queries: &[SearchQuery]) -> Gathered {
        self.gather_with(queries, |_| {}).await
    }

    /// Like [`gather`](Self::gather), calling `on_outcome` as each query finishes.
    pub async fn gather_with<F>(&self, queries: &[SearchQuery], mut on_outcome: F) -> Gathered
    where
        F: FnMut(&QueryOutcome),
    {
        let mut gathered = Gathered::default();

        for query in queries {
            let status = match self.try_search(query).await {
                Ok(results) => {
                    let returned = results.len();
                    let kept = gathered
                        .results
                        .extend_capped(results, self.results_per_query);
                    QueryStatus::Found { returned, kept }
                }
                Err(err) => QueryStatus::Failed {
                    reason: err.to_string(),
                },
            };

            let outcome = QueryOutcome {
                query: query.clone(),
                status,
            };
            on_outcome(&outcome);
            gathered.outcomes.push(outcome);
        }

        gathered
    }
}
