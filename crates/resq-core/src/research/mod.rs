mod decomposer;
mod document;
mod executor;
pub mod prompts;
mod runner;
mod synthesizer;

pub use decomposer::{parse_queries, QueryDecomposer};
pub use document::{
    QueryOutcome, QueryStatus, ResearchReport, ResultSet, SearchQuery, SynthesizedAnswer,
};
pub use executor::{Gathered, SearchExecutor};
pub use runner::{ResearchError, ResearchProgress, ResearchRunner};
pub use synthesizer::{AnswerSynthesizer, FALLBACK_ANSWER};
