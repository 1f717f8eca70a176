#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use resq_core::llm::{LLMError, SamplingParams, LLM};
use resq_core::search::{SearchError, SearchResult, WebSearch};

/// A recorded call to [`ScriptedLLM`].
#[derive(Debug, Clone)]
pub struct LlmCall {
    pub system: String,
    pub prompt: String,
    pub params: SamplingParams,
}

/// Language model that replays queued replies in order.
#[derive(Default)]
pub struct ScriptedLLM {
    replies: Mutex<VecDeque<Result<String, LLMError>>>,
    calls: Mutex<Vec<LlmCall>>,
}

impl ScriptedLLM {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, err: LLMError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<LlmCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLM for ScriptedLLM {
    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
        params: SamplingParams,
    ) -> Result<String, LLMError> {
        self.calls.lock().unwrap().push(LlmCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            params,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LLMError::Network("no scripted reply".to_string())))
    }
}

enum Canned {
    Results(Vec<SearchResult>),
    Status(u16),
    Transport,
}

/// Search backend answering from a fixed table; unknown queries return nothing.
#[derive(Default)]
pub struct TableSearch {
    table: HashMap<String, Canned>,
    seen: Mutex<Vec<String>>,
}

impl TableSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.table.insert(query.to_string(), Canned::Results(results));
        self
    }

    pub fn status(mut self, query: &str, status: u16) -> Self {
        self.table.insert(query.to_string(), Canned::Status(status));
        self
    }

    pub fn transport_error(mut self, query: &str) -> Self {
        self.table.insert(query.to_string(), Canned::Transport);
        self
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for TableSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        self.seen.lock().unwrap().push(query.to_string());
        match self.table.get(query) {
            Some(Canned::Results(results)) => Ok(results.clone()),
            Some(Canned::Status(status)) => Err(SearchError::Api {
                status: *status,
                body: "quota exceeded".to_string(),
            }),
            Some(Canned::Transport) => {
                Err(SearchError::Transport("connection reset".to_string()))
            }
            None => Ok(Vec::new()),
        }
    }
}

/// `count` results tagged with `prefix`, e.g. `q1-1`, `q1-2`.
pub fn hits(prefix: &str, count: usize) -> Vec<SearchResult> {
    (1..=count)
        .map(|n| {
            SearchResult::new(
                format!("{prefix}-{n}"),
                format!("snippet {prefix}-{n}"),
                format!("https://example.com/{prefix}/{n}"),
            )
        })
        .collect()
}
