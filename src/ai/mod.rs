//! AI Integration Layer
//!
//! LLM provider abstraction, prompt construction and model-output parsing.

pub mod json;
pub mod prompt;
pub mod provider;
pub mod timeout;

pub use json::extract_json;
pub use prompt::{PromptBuilder, PromptSection, PromptTemplates};
pub use provider::{
    CompletionRequest, LlmProvider, LlmResponse, OpenAiProvider, ProviderConfig,
    ResponseMetadata, ResponseTiming, SharedProvider, TokenUsage, create_provider,
};
pub use timeout::{generate_with_timeout, with_timeout};
