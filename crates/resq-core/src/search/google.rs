//! Google Custom Search JSON API client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{SearchError, SearchResult, WebSearch};
use crate::config::{Credentials, SearchConfig, DEFAULT_SEARCH_URL};

/// Client for the Custom Search JSON API.
///
/// One GET per query with `key`, `cx` and `q` parameters.
pub struct GoogleSearchClient {
    base_url: String,
    api_key: String,
    engine_id: String,
    client: Client,
}

impl GoogleSearchClient {
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            client: Client::new(),
        }
    }

    /// Creates a client from the search section and validated credentials.
    pub fn from_config(config: &SearchConfig, credentials: &Credentials) -> Self {
        Self::new(&credentials.search_api_key, &credentials.search_engine_id)
            .with_base_url(&config.base_url)
    }

    /// Sets the endpoint (for proxies or test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl WebSearch for GoogleSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        debug!(query, "sending search request");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        parse_items(&body)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
}

/// Maps a response body to result records. A body without `items` has no results.
fn parse_items(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Parse(e.to_string()))?;
    Ok(response.items)
}
