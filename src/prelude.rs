// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use leadloop::prelude::*;` to get started quickly.

pub use crate::agent::{AgentRuntime, DEFAULT_MAX_STEPS, ERROR_MARKER, MAX_STEPS_MESSAGE};
pub use crate::error::{Error, LlmError, StoreError, ToolError};
pub use crate::llm::{
    ChatMessage, ChatRequest, ChatResponse, FunctionCall, LlmClient, OpenAiClient, OpenAiConfig,
    Role, ToolCall, ToolDefinition, Usage,
};
pub use crate::store::{Lead, LeadCreate, LeadStatus, LeadStore, LeadUpdate};
pub use crate::tool::{Registry, Tool, ToolResult};
pub use crate::tools::{
    DeleteLeadTool, LeadDetailsTool, LeadSummaryTool, UpdateLeadStatusTool, WebSearchTool,
};
