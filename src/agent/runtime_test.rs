// ABOUTME: Tests for AgentRuntime - loop control, memory invariants, and
// ABOUTME: error isolation, driven by a scripted LlmClient.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::*;
use crate::error::LlmError;
use crate::llm::{ChatMessage, ChatRequest, ChatResponse, LlmClient, Role, ToolCall, Usage};
use crate::tool::{Registry, Tool, ToolResult};

/// An LlmClient that replays a scripted sequence of responses and records
/// every request it receives.
struct ScriptedClient {
    script: Mutex<VecDeque<Result<ChatResponse, LlmError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    fn new(script: Vec<Result<ChatResponse, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    async fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedClient {
    async fn create_chat(&self, req: &ChatRequest) -> Result<ChatResponse, LlmError> {
        self.requests.lock().await.push(req.clone());
        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| panic!("scripted client ran out of responses"))
    }
}

fn text_response(text: &str) -> Result<ChatResponse, LlmError> {
    Ok(ChatResponse {
        id: "resp".to_string(),
        model: "test-model".to_string(),
        message: ChatMessage::assistant(text),
        usage: Usage::default(),
    })
}

fn tool_call_response(calls: Vec<ToolCall>) -> Result<ChatResponse, LlmError> {
    Ok(ChatResponse {
        id: "resp".to_string(),
        model: "test-model".to_string(),
        message: ChatMessage {
            role: Role::Assistant,
            content: None,
            tool_calls: Some(calls),
            tool_call_id: None,
        },
        usage: Usage::default(),
    })
}

/// Echo tool used by the dispatch tests.
struct EchoTool;

#[async_trait::async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes the text parameter back"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": { "text": { "type": "string" } },
            "required": ["text"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        let text = params["text"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing text parameter"))?;
        Ok(ToolResult::json(serde_json::json!({ "result": text })))
    }
}

/// A tool that always fails, for error-isolation tests.
struct FailingTool;

#[async_trait::async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "failing"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        Err(anyhow::anyhow!("deliberate failure"))
    }
}

/// A tool that panics, exercising the spawn isolation boundary.
struct PanickingTool;

#[async_trait::async_trait]
impl Tool for PanickingTool {
    fn name(&self) -> &str {
        "panicking"
    }

    fn description(&self) -> &str {
        "Panics on execute"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        panic!("tool blew up");
    }
}

fn decode_error(content: &str) -> serde_json::Value {
    let value: serde_json::Value = serde_json::from_str(content).expect("tool content is JSON");
    assert!(value.get("error").is_some(), "payload has an error key: {value}");
    value
}

#[tokio::test]
async fn test_final_answer_returned() {
    let client = Arc::new(ScriptedClient::new(vec![text_response("All done.")]));
    let mut runtime = AgentRuntime::new(client, "test-model");

    let answer = runtime.run("hello").await;
    assert_eq!(answer, "All done.");
}

#[tokio::test]
async fn test_system_message_seeded_first() {
    let client = Arc::new(ScriptedClient::new(vec![text_response("ok")]));
    let mut runtime = AgentRuntime::new(client, "test-model").system_prompt("You are a CRM agent.");

    runtime.reset_memory();
    runtime.run("hi").await;

    let memory = runtime.memory();
    assert_eq!(memory[0].role, Role::System);
    assert_eq!(memory[0].text(), "You are a CRM agent.");
    assert_eq!(memory[1].role, Role::User);
    assert_eq!(memory[1].text(), "hi");
}

#[tokio::test]
async fn test_no_system_message_without_prompt() {
    let client = Arc::new(ScriptedClient::new(vec![text_response("ok")]));
    let mut runtime = AgentRuntime::new(client, "test-model");

    runtime.run("hi").await;

    assert_eq!(runtime.memory()[0].role, Role::User);
}

#[tokio::test]
async fn test_system_message_never_duplicated() {
    let client = Arc::new(ScriptedClient::new(vec![
        text_response("first"),
        text_response("second"),
    ]));
    let mut runtime = AgentRuntime::new(client, "test-model").system_prompt("prompt");

    runtime.run("one").await;
    runtime.run("two").await;

    let system_count = runtime
        .memory()
        .iter()
        .filter(|m| m.role == Role::System)
        .count();
    assert_eq!(system_count, 1);
}

#[tokio::test]
async fn test_reset_memory_is_idempotent() {
    let client = Arc::new(ScriptedClient::new(vec![text_response("ok")]));
    let mut runtime = AgentRuntime::new(client, "test-model").system_prompt("prompt");

    runtime.run("hi").await;
    runtime.reset_memory();
    let after_one: Vec<_> = runtime.memory().to_vec();
    runtime.reset_memory();

    assert_eq!(runtime.memory().len(), after_one.len());
    assert_eq!(runtime.memory().len(), 1);
    assert_eq!(runtime.memory()[0].role, Role::System);
}

#[tokio::test]
async fn test_echo_tool_round_trip() {
    let client = Arc::new(ScriptedClient::new(vec![
        tool_call_response(vec![ToolCall::function("c1", "echo", r#"{"text":"hi"}"#)]),
        text_response("The echo said hi."),
    ]));

    let registry = Registry::new();
    registry.register(EchoTool).await;

    let mut runtime = AgentRuntime::new(client.clone(), "test-model").tools(registry);
    let answer = runtime.run("say hi").await;
    assert_eq!(answer, "The echo said hi.");

    // The tool message is bound to c1 and carries the serialized result.
    let tool_msg = runtime
        .memory()
        .iter()
        .find(|m| m.role == Role::Tool)
        .expect("tool message appended");
    assert_eq!(tool_msg.tool_call_id.as_deref(), Some("c1"));
    let payload: serde_json::Value = serde_json::from_str(tool_msg.text()).unwrap();
    assert_eq!(payload["result"], "hi");

    // The second model call saw the tool result in its memory.
    let requests = client.recorded_requests().await;
    assert_eq!(requests.len(), 2);
    let saw_tool_result = requests[1]
        .messages
        .iter()
        .any(|m| m.role == Role::Tool && m.tool_call_id.as_deref() == Some("c1"));
    assert!(saw_tool_result);
}

#[tokio::test]
async fn test_unknown_tool_yields_error_payload_and_continues() {
    let client = Arc::new(ScriptedClient::new(vec![
        tool_call_response(vec![ToolCall::function("c1", "missing_tool", "{}")]),
        text_response("Recovered."),
    ]));

    let mut runtime = AgentRuntime::new(client, "test-model");
    let answer = runtime.run("go").await;

    // The loop proceeded to the next step instead of terminating.
    assert_eq!(answer, "Recovered.");

    let tool_msg = runtime
        .memory()
        .iter()
        .find(|m| m.role == Role::Tool)
        .unwrap();
    decode_error(tool_msg.text());
}

#[tokio::test]
async fn test_failing_tool_does_not_abort_sibling_calls() {
    let client = Arc::new(ScriptedClient::new(vec![
        tool_call_response(vec![
            ToolCall::function("c1", "failing", "{}"),
            ToolCall::function("c2", "echo", r#"{"text":"still here"}"#),
        ]),
        text_response("done"),
    ]));

    let registry = Registry::new();
    registry.register(FailingTool).await;
    registry.register(EchoTool).await;

    let mut runtime = AgentRuntime::new(client, "test-model").tools(registry);
    let answer = runtime.run("go").await;
    assert_eq!(answer, "done");

    let tool_msgs: Vec<_> = runtime
        .memory()
        .iter()
        .filter(|m| m.role == Role::Tool)
        .collect();
    assert_eq!(tool_msgs.len(), 2);

    // Results land in request order, bound to their correlation ids.
    assert_eq!(tool_msgs[0].tool_call_id.as_deref(), Some("c1"));
    decode_error(tool_msgs[0].text());

    assert_eq!(tool_msgs[1].tool_call_id.as_deref(), Some("c2"));
    let payload: serde_json::Value = serde_json::from_str(tool_msgs[1].text()).unwrap();
    assert_eq!(payload["result"], "still here");
}

#[tokio::test]
async fn test_panicking_tool_is_isolated() {
    let client = Arc::new(ScriptedClient::new(vec![
        tool_call_response(vec![ToolCall::function("c1", "panicking", "{}")]),
        text_response("survived"),
    ]));

    let registry = Registry::new();
    registry.register(PanickingTool).await;

    let mut runtime = AgentRuntime::new(client, "test-model").tools(registry);
    let answer = runtime.run("go").await;
    assert_eq!(answer, "survived");

    let tool_msg = runtime
        .memory()
        .iter()
        .find(|m| m.role == Role::Tool)
        .unwrap();
    decode_error(tool_msg.text());
}

#[tokio::test]
async fn test_unparseable_arguments_become_error_payload() {
    let client = Arc::new(ScriptedClient::new(vec![
        tool_call_response(vec![ToolCall::function("c1", "echo", "not json at all")]),
        text_response("ok"),
    ]));

    let registry = Registry::new();
    registry.register(EchoTool).await;

    let mut runtime = AgentRuntime::new(client, "test-model").tools(registry);
    runtime.run("go").await;

    let tool_msg = runtime
        .memory()
        .iter()
        .find(|m| m.role == Role::Tool)
        .unwrap();
    decode_error(tool_msg.text());
}

#[tokio::test]
async fn test_step_ceiling_terminates_run() {
    // The model never stops asking for tools.
    let script: Vec<_> = (0..3)
        .map(|i| {
            tool_call_response(vec![ToolCall::function(
                format!("c{i}"),
                "echo",
                r#"{"text":"again"}"#,
            )])
        })
        .collect();
    let client = Arc::new(ScriptedClient::new(script));

    let registry = Registry::new();
    registry.register(EchoTool).await;

    let mut runtime = AgentRuntime::new(client.clone(), "test-model").tools(registry);
    let answer = runtime.run_with_limit("loop forever", 3).await;

    assert_eq!(answer, MAX_STEPS_MESSAGE);
    // Exactly max_steps model calls were made.
    assert_eq!(client.recorded_requests().await.len(), 3);
}

#[tokio::test]
async fn test_transport_error_returns_marked_text() {
    let client = Arc::new(ScriptedClient::new(vec![Err(LlmError::Api {
        status: 503,
        message: "upstream unavailable".to_string(),
    })]));

    let mut runtime = AgentRuntime::new(client, "test-model").system_prompt("prompt");
    let answer = runtime.run("hello").await;

    assert!(answer.starts_with(ERROR_MARKER));

    // Memory keeps the user message - no rollback.
    let user_msg = runtime
        .memory()
        .iter()
        .find(|m| m.role == Role::User)
        .unwrap();
    assert_eq!(user_msg.text(), "hello");
}

#[tokio::test]
async fn test_configuration_error_surfaces_as_text() {
    let client = Arc::new(ScriptedClient::new(vec![Err(LlmError::Configuration(
        "OPENAI_API_KEY is not set".to_string(),
    ))]));

    let mut runtime = AgentRuntime::new(client, "test-model");
    let answer = runtime.run("hello").await;
    assert!(answer.starts_with(ERROR_MARKER));
    assert!(answer.contains("OPENAI_API_KEY"));
}

#[tokio::test]
async fn test_text_alongside_tool_calls_is_not_final() {
    let client = Arc::new(ScriptedClient::new(vec![
        Ok(ChatResponse {
            id: "resp".to_string(),
            model: "test-model".to_string(),
            message: ChatMessage {
                role: Role::Assistant,
                content: Some("Let me check that.".to_string()),
                tool_calls: Some(vec![ToolCall::function("c1", "echo", r#"{"text":"x"}"#)]),
                tool_call_id: None,
            },
            usage: Usage::default(),
        }),
        text_response("Here is the answer."),
    ]));

    let registry = Registry::new();
    registry.register(EchoTool).await;

    let mut runtime = AgentRuntime::new(client, "test-model").tools(registry);
    let answer = runtime.run("check").await;

    // The accompanying text is kept in memory but not treated as final.
    assert_eq!(answer, "Here is the answer.");
    let assistant_with_calls = runtime
        .memory()
        .iter()
        .find(|m| m.has_tool_calls())
        .unwrap();
    assert_eq!(assistant_with_calls.text(), "Let me check that.");
}
