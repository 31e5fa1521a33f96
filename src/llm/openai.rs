// ABOUTME: OpenAI-compatible chat-completions client.
// ABOUTME: Works against api.openai.com or any gateway speaking the same protocol.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, ChatRequest, ChatResponse, Role, ToolCall, ToolDefinition, Usage};
use crate::error::LlmError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the OpenAI-compatible client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key. A missing key does not prevent construction; the first
    /// request reports a configuration error instead.
    pub api_key: Option<String>,

    /// Base URL of the chat-completions endpoint, without the trailing path.
    pub base_url: String,

    /// Default model identifier.
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl OpenAiConfig {
    /// Build a configuration from OPENAI_API_KEY, OPENAI_BASE_URL and
    /// OPENAI_MODEL environment variables.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }
}

/// Chat-completions API request body.
#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

/// Tool definition in the API's function wrapper.
#[derive(Debug, Serialize)]
struct ApiTool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: ApiFunction,
}

#[derive(Debug, Serialize)]
struct ApiFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

impl From<&ToolDefinition> for ApiTool {
    fn from(def: &ToolDefinition) -> Self {
        ApiTool {
            tool_type: "function",
            function: ApiFunction {
                name: def.name.clone(),
                description: def.description.clone(),
                parameters: def.parameters.clone(),
            },
        }
    }
}

impl From<&ChatRequest> for ApiRequest {
    fn from(req: &ChatRequest) -> Self {
        let tools: Vec<ApiTool> = req.tools.iter().map(ApiTool::from).collect();
        let tool_choice = if tools.is_empty() { None } else { Some("auto") };

        ApiRequest {
            model: req.model.clone(),
            messages: req.messages.clone(),
            tools,
            tool_choice,
            max_tokens: req.max_tokens,
            temperature: req.temperature,
        }
    }
}

/// Chat-completions API response body.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    id: String,
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// API error response body.
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl From<ApiResponse> for ChatResponse {
    fn from(resp: ApiResponse) -> Self {
        let message = resp
            .choices
            .into_iter()
            .next()
            .map(|c| ChatMessage {
                role: Role::Assistant,
                content: c.message.content.filter(|t| !t.is_empty()),
                tool_calls: c.message.tool_calls.filter(|t| !t.is_empty()),
                tool_call_id: None,
            })
            .unwrap_or_else(|| ChatMessage {
                role: Role::Assistant,
                content: None,
                tool_calls: None,
                tool_call_id: None,
            });

        let usage = resp.usage.map_or_else(Usage::default, |u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        ChatResponse {
            id: resp.id,
            model: resp.model,
            message,
            usage,
        }
    }
}

/// Client for OpenAI-compatible chat-completions APIs.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new client from a configuration.
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Create a new client from environment variables.
    pub fn from_env() -> Self {
        Self::new(OpenAiConfig::from_env())
    }

    /// The configured default model identifier.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl super::client::LlmClient for OpenAiClient {
    async fn create_chat(&self, req: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            LlmError::Configuration("OPENAI_API_KEY is not set".to_string())
        })?;

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = ApiRequest::from(req);

        tracing::debug!(model = %body.model, messages = body.messages.len(), "sending chat request");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let api_resp: ApiResponse = response.json().await?;
        Ok(ChatResponse::from(api_resp))
    }
}
