use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::search::SearchResult;

/// A web search query derived from the research question.
pub type SearchQuery = String;

/// Pattern of an inline citation in a synthesized answer.
const CITATION_PATTERN: &str = r"\[Source (\d+)\]";

static CITATION_RE: OnceLock<Regex> = OnceLock::new();

fn citation_regex() -> &'static Regex {
    CITATION_RE.get_or_init(|| Regex::new(CITATION_PATTERN).expect("invalid citation regex"))
}

/// Search results aggregated across all queries, in query order.
///
/// Position `i` (0-based) is cited as `[Source i+1]`. The set is never
/// reordered or deduplicated once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    results: Vec<SearchResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends at most `limit` results from one query, keeping their order.
    /// Returns how many were kept.
    pub fn extend_capped(&mut self, results: Vec<SearchResult>, limit: usize) -> usize {
        let before = self.results.len();
        self.results.extend(results.into_iter().take(limit));
        self.results.len() - before
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn as_slice(&self) -> &[SearchResult] {
        &self.results
    }

    /// Iterates `(source_number, result)` pairs with 1-based numbering.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &SearchResult)> {
        self.results.iter().enumerate().map(|(i, r)| (i + 1, r))
    }
}

impl From<Vec<SearchResult>> for ResultSet {
    fn from(results: Vec<SearchResult>) -> Self {
        Self { results }
    }
}

/// The final answer text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedAnswer {
    pub text: String,
    /// True when synthesis failed and `text` is the fallback message.
    pub fallback: bool,
}

impl SynthesizedAnswer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fallback: false,
        }
    }

    /// Distinct `[Source N]` numbers in order of first appearance.
    pub fn citations(&self) -> Vec<usize> {
        let mut cited = Vec::new();
        for cap in citation_regex().captures_iter(&self.text) {
            if let Some(n) = cap.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) {
                if !cited.contains(&n) {
                    cited.push(n);
                }
            }
        }
        cited
    }

    /// Cited numbers that do not name one of `source_count` sources.
    pub fn invalid_citations(&self, source_count: usize) -> Vec<usize> {
        self.citations()
            .into_iter()
            .filter(|n| *n == 0 || *n > source_count)
            .collect()
    }
}

/// What happened to one query during the search stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub query: SearchQuery,
    pub status: QueryStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryStatus {
    /// The search succeeded; `kept` of `returned` results entered the set.
    Found { returned: usize, kept: usize },
    /// The search failed and contributed nothing.
    Failed { reason: String },
}

/// Everything produced by one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    pub id: String,
    pub question: String,
    pub queries: Vec<SearchQuery>,
    pub outcomes: Vec<QueryOutcome>,
    pub sources: ResultSet,
    pub answer: SynthesizedAnswer,
    pub generated_at: DateTime<Utc>,
}

impl ResearchReport {
    /// Converts the report to markdown format.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# Research: {}\n\n", self.question));

        md.push_str("## Search Queries\n\n");
        for query in &self.queries {
            md.push_str(&format!("- {}\n", query));
        }
        md.push('\n');

        md.push_str("## Answer\n\n");
        md.push_str(&self.answer.text);
        md.push_str("\n\n");

        md.push_str("## Sources\n\n");
        for (n, source) in self.sources.numbered() {
            md.push_str(&format!("{}. [{}]({})\n", n, source.title, source.link));
            md.push_str(&format!("   {}\n", source.snippet));
        }

        md
    }
}
