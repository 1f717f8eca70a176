pub mod config;
pub mod llm;
pub mod research;
pub mod search;
pub mod telemetry;

pub use config::{Config, ConfigError, Credentials, LLMConfig};
pub use llm::{LLMError, OpenAIClient, Provider, SamplingParams, LLM};
pub use research::{
    ResearchError, ResearchProgress, ResearchReport, ResearchRunner, ResultSet,
    SynthesizedAnswer, FALLBACK_ANSWER,
};
pub use search::{GoogleSearchClient, SearchError, SearchResult, WebSearch};
pub use telemetry::{init_telemetry, init_telemetry_with_writer, TelemetryOptions};
