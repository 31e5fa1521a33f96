// ABOUTME: Defines the ToolResult type - a unified structure for tool
// ABOUTME: execution outcomes with content and error state.

use serde::Serialize;

/// Result of a tool execution. Content is textual because conversation
/// memory is homogeneously textual; structured payloads are serialized
/// through [`ToolResult::json`].
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// The output content.
    pub content: String,

    /// Whether this result represents an error.
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful text result.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create a successful result from a serializable payload.
    pub fn json(payload: impl Serialize) -> Self {
        match serde_json::to_string(&payload) {
            Ok(content) => Self {
                content,
                is_error: false,
            },
            Err(e) => Self::error(format!("Failed to serialize tool result: {}", e)),
        }
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
        }
    }
}

impl Default for ToolResult {
    fn default() -> Self {
        Self::text("")
    }
}
