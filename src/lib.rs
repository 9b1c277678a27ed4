pub mod config;
pub mod error;
pub mod models;
pub mod feeds;
pub mod llm;
pub mod markdown;
pub mod digest;
pub mod storage;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use feeds::{ContentFetcher, ContentSource, FeedCollector, FeedSource};
pub use llm::{GeminiProvider, LLMProvider, ResponseMode, RetryPolicy, Retrying};
pub use digest::{DigestPipeline, RunOutcome};
pub use storage::JournalWriter;
