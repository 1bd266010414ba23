//! LLM module for voxnorm
//!
//! Talks to the external classification service (OpenRouter's
//! OpenAI-compatible chat API) and owns the instruction template.

mod client;
mod openrouter;
mod prompts;

pub use client::{build_provider, ClassificationProvider, ClassificationRequest};
pub use openrouter::OpenRouterClient;
pub use prompts::SYSTEM_PROMPT;
