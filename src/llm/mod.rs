pub mod provider;
pub mod gemini;
pub mod retry;
pub mod prompts;
pub mod parser;

pub use provider::{LLMProvider, ResponseMode};
pub use gemini::GeminiProvider;
pub use retry::{RetryPolicy, Retrying};
pub use prompts::{CompositionRequest, SelectionRequest, SummaryRequest, TranslationRequest};
pub use parser::parse_selection;
