// ABOUTME: Defines the Tool trait - the core abstraction for agent capabilities.
// ABOUTME: Tools have a name, description, declared schema, and async execute method.

use async_trait::async_trait;

use super::ToolResult;

/// A tool that can be executed by an agent.
///
/// The schema is declared alongside the implementation rather than derived
/// from the signature at runtime. Parameters with defaults are left out of
/// the schema's `required` list.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique name of this tool.
    fn name(&self) -> &str;

    /// Returns a human-readable description for the LLM.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's input parameters.
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given parameters.
    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error>;
}
