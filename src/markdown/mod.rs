pub mod sanitizer;

pub use sanitizer::{sanitize, strip_code_fences};

/// Fence stripping followed by sanitizing; applied to every model-written
/// document before it becomes a post.
pub fn clean_model_markdown(text: &str) -> String {
    sanitize(&strip_code_fences(text))
}
