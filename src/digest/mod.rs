pub mod pipeline;

pub use pipeline::{DigestPipeline, RunOutcome};
