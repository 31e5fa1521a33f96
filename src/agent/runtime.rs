// ABOUTME: AgentRuntime - executes the think-act loop for a conversation.
// ABOUTME: Handles tool dispatch, conversation memory, and step budgeting.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::ToolError;
use crate::llm::{ChatMessage, ChatRequest, LlmClient, ToolCall, Usage};
use crate::tool::Registry;

/// Default ceiling on think-act steps per run.
pub const DEFAULT_MAX_STEPS: usize = 10;

/// Returned when a run hits the step ceiling before a final answer.
pub const MAX_STEPS_MESSAGE: &str = "Agent stopped: max steps reached.";

/// Prefix on every error text returned by [`AgentRuntime::run`].
pub const ERROR_MARKER: &str = "[error]";

/// Drives the tool-calling conversation loop against an LLM.
///
/// One runtime owns one logical conversation. Memory persists across calls
/// to `run` and is discarded only by `reset_memory`. Concurrent sessions
/// get distinct runtimes.
pub struct AgentRuntime {
    /// Identifier for this conversation, used in diagnostics.
    session_id: String,

    /// The LLM client to use.
    client: Arc<dyn LlmClient>,

    /// Model identifier sent with every request.
    model: String,

    /// System prompt seeded as the first memory entry. May be empty.
    system_prompt: String,

    /// Tools available to the model.
    tools: Registry,

    /// Conversation memory. The first entry, if any, is the system message.
    memory: Vec<ChatMessage>,

    /// Running total of token usage across model calls.
    usage: Usage,
}

impl AgentRuntime {
    /// Create a new runtime for the given client and model.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            client,
            model: model.into(),
            system_prompt: String::new(),
            tools: Registry::new(),
            memory: Vec::new(),
            usage: Usage::default(),
        }
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the tool registry.
    pub fn tools(mut self, tools: Registry) -> Self {
        self.tools = tools;
        self
    }

    /// The session identifier.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The conversation memory, oldest first.
    pub fn memory(&self) -> &[ChatMessage] {
        &self.memory
    }

    /// The tool registry this runtime dispatches against.
    pub fn registry(&self) -> &Registry {
        &self.tools
    }

    /// Total token usage across all model calls so far.
    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    /// Clear all conversation history, reseeding the system message if one
    /// was configured.
    pub fn reset_memory(&mut self) {
        self.memory.clear();
        self.seed_system_message();
        tracing::debug!(session = %self.session_id, "conversation memory reset");
    }

    fn seed_system_message(&mut self) {
        if self.memory.is_empty() && !self.system_prompt.is_empty() {
            self.memory.push(ChatMessage::system(self.system_prompt.clone()));
        }
    }

    /// Run the loop with the default step ceiling.
    pub async fn run(&mut self, user_message: &str) -> String {
        self.run_with_limit(user_message, DEFAULT_MAX_STEPS).await
    }

    /// Run the think-act loop until the model produces a final answer or the
    /// step ceiling is reached.
    ///
    /// Always returns text: final answers, transport failures, and budget
    /// exhaustion all surface as a string, never as an error or panic.
    pub async fn run_with_limit(&mut self, user_message: &str, max_steps: usize) -> String {
        self.seed_system_message();
        self.memory.push(ChatMessage::user(user_message));
        tracing::info!(session = %self.session_id, "user: {}", user_message);

        for step in 1..=max_steps {
            tracing::debug!(session = %self.session_id, step, "requesting model action");

            let request = ChatRequest::new(self.model.as_str())
                .messages(self.memory.iter().cloned())
                .tools(self.tools.definitions().await);

            let response = match self.client.create_chat(&request).await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::error!(session = %self.session_id, step, error = %e, "model call failed");
                    return format!("{} model call failed: {}", ERROR_MARKER, e);
                }
            };

            self.usage.input_tokens += response.usage.input_tokens;
            self.usage.output_tokens += response.usage.output_tokens;

            // Keep the raw assistant message, tool-call requests included,
            // so the model later sees what it asked for.
            self.memory.push(response.message.clone());

            if !response.text().is_empty() {
                tracing::debug!(session = %self.session_id, "assistant: {}", response.text());
            }

            if response.has_tool_calls() {
                for call in response.tool_calls() {
                    let content = self.dispatch(call).await;
                    self.memory
                        .push(ChatMessage::tool_result(call.id.as_str(), content));
                }
                continue;
            }

            // No tool calls and non-empty text: the final answer.
            if !response.text().is_empty() {
                return response.text().to_string();
            }
        }

        tracing::warn!(session = %self.session_id, max_steps, "step ceiling reached");
        MAX_STEPS_MESSAGE.to_string()
    }

    /// Resolve and execute a single tool call, returning the textual result
    /// to append to memory.
    ///
    /// Every failure mode - unknown tool, unparseable arguments, tool error,
    /// tool panic - is converted to an `{"error": ...}` payload so a single
    /// failing call never aborts the run.
    async fn dispatch(&self, call: &ToolCall) -> String {
        let name = &call.function.name;
        tracing::info!(session = %self.session_id, tool = %name, args = %call.function.arguments, "tool call");

        let Some(tool) = self.tools.get(name).await else {
            tracing::warn!(session = %self.session_id, tool = %name, "tool not found");
            return error_payload(ToolError::NotFound(name.clone()).to_string());
        };

        let params: serde_json::Value = match serde_json::from_str(&call.function.arguments) {
            Ok(serde_json::Value::Object(map)) => serde_json::Value::Object(map),
            Ok(other) => {
                tracing::warn!(session = %self.session_id, tool = %name, "arguments are not an object: {}", other);
                return error_payload(
                    ToolError::InvalidParams(format!("expected a JSON object, got: {}", other))
                        .to_string(),
                );
            }
            Err(e) => {
                tracing::warn!(session = %self.session_id, tool = %name, error = %e, "unparseable arguments");
                return error_payload(ToolError::InvalidParams(e.to_string()).to_string());
            }
        };

        // The spawn boundary isolates panics inside a tool, converting them
        // to the same error payload as an ordinary tool failure.
        let handle = tokio::spawn(async move { tool.execute(params).await });

        let content = match handle.await {
            Ok(Ok(result)) => {
                if result.is_error {
                    tracing::warn!(session = %self.session_id, tool = %name, "tool error: {}", result.content);
                    error_payload(result.content)
                } else {
                    result.content
                }
            }
            Ok(Err(e)) => {
                tracing::error!(session = %self.session_id, tool = %name, error = %e, "tool execution failed");
                error_payload(ToolError::Execution(e).to_string())
            }
            Err(e) => {
                tracing::error!(session = %self.session_id, tool = %name, error = %e, "tool task aborted");
                error_payload(format!("Tool '{}' aborted: {}", name, e))
            }
        };

        tracing::info!(session = %self.session_id, tool = %name, "tool result: {}", content);
        content
    }
}

/// Stable stringification of an error object for memory.
fn error_payload(message: impl Into<String>) -> String {
    serde_json::json!({ "error": message.into() }).to_string()
}
