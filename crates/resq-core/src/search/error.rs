use thiserror::Error;

/// Errors returned by a web search backend.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The API answered with a non-success status.
    #[error("Search API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Search request failed: {0}")]
    Transport(String),

    #[error("Failed to parse search response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::Parse(err.to_string())
        } else {
            SearchError::Transport(err.to_string())
        }
    }
}
