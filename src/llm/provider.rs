use async_trait::async_trait;
use crate::error::Result;

/// Whether the caller needs machine-parseable JSON back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    Text,
    Json,
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn generate(&self, prompt: &str, mode: ResponseMode) -> Result<String>;
    fn name(&self) -> &str;
}
