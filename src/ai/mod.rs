//! AI Integration Layer
//!
//! Chat-completion provider, prompt templates, and the content generator the
//! pipeline stages call.

pub mod generator;
pub mod prompt;
pub mod provider;
pub mod timeout;

pub use generator::{ContentGenerator, clean_markup};
pub use provider::{
    CompletionRequest, LlmProvider, LlmResponse, OpenAiProvider, SharedProvider, create_provider,
};
pub use timeout::with_timeout;
