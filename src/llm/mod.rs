//! LLM provider routing, retries and prompt helpers.

pub mod json;
pub mod prompt;
pub mod retry;
pub mod router;

pub use json::extract_json;
pub use prompt::{sanitize_diff, sanitize_for_prompt};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use router::{
    LlmCompletion, LlmError, LlmProviderError, LlmRouter, Provider, ProviderSelection, ResponseFormat,
};
