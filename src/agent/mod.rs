// ABOUTME: Agent module - the conversation runtime driving the think-act loop.

mod runtime;

pub use runtime::{AgentRuntime, DEFAULT_MAX_STEPS, ERROR_MARKER, MAX_STEPS_MESSAGE};

#[cfg(test)]
mod runtime_test;
