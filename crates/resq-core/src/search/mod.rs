//! Web search: result records and the search API client.

mod error;
mod google;

pub use error::SearchError;
pub use google::GoogleSearchClient;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder for a result without a title.
pub const NO_TITLE: &str = "No Title";
/// Placeholder for a result without a snippet.
pub const NO_SNIPPET: &str = "No Snippet";
/// Placeholder for a result without a link.
pub const NO_URL: &str = "No URL";

/// A single web search hit.
///
/// Fields missing or null in the upstream response are filled with
/// placeholders ([`NO_TITLE`], [`NO_SNIPPET`], [`NO_URL`]), never left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default = "default_title", deserialize_with = "title_or_placeholder")]
    pub title: String,
    #[serde(default = "default_snippet", deserialize_with = "snippet_or_placeholder")]
    pub snippet: String,
    #[serde(default = "default_link", deserialize_with = "link_or_placeholder")]
    pub link: String,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            link: link.into(),
        }
    }
}

fn default_title() -> String {
    NO_TITLE.to_string()
}

fn default_snippet() -> String {
    NO_SNIPPET.to_string()
}

fn default_link() -> String {
    NO_URL.to_string()
}

fn or_placeholder<'de, D>(deserializer: D, placeholder: &str) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_else(|| placeholder.to_string()))
}

fn title_or_placeholder<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    or_placeholder(deserializer, NO_TITLE)
}

fn snippet_or_placeholder<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    or_placeholder(deserializer, NO_SNIPPET)
}

fn link_or_placeholder<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    or_placeholder(deserializer, NO_URL)
}

/// A web search backend.
///
/// Implementations report expected API failures (non-success status) as
/// [`SearchError::Api`] and keep [`SearchError::Transport`] for faults below
/// HTTP. Deciding whether a failure is fatal is left to the caller.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
}

#[async_trait]
impl WebSearch for Box<dyn WebSearch> {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        (**self).search(query).await
    }
}

#[async_trait]
impl<'a, T: WebSearch + ?Sized> WebSearch for &'a T {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        (**self).search(query).await
    }
}
