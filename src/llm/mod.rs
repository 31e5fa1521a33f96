// ABOUTME: LLM module - message types, client abstraction, and the
// ABOUTME: OpenAI-compatible provider implementation.

mod client;
mod openai;
mod types;

pub use client::*;
pub use openai::*;
pub use types::*;
