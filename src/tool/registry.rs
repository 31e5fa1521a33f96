// ABOUTME: Implements the Registry - a thread-safe container mapping tool
// ABOUTME: names to implementations and to their LLM-facing definitions.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::Tool;
use crate::llm::ToolDefinition;

/// Description used when a tool does not supply one.
const PLACEHOLDER_DESCRIPTION: &str = "No description provided.";

#[derive(Default)]
struct Inner {
    tools: HashMap<String, Arc<dyn Tool>>,
    /// Names in first-registration order, so definitions sent to the model
    /// are stable across runs.
    order: Vec<String>,
}

/// A thread-safe registry of tools.
#[derive(Default)]
pub struct Registry {
    inner: Arc<RwLock<Inner>>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Re-registering a name replaces the prior tool
    /// (last write wins) while keeping its position in the definition order.
    pub async fn register<T: Tool + 'static>(&self, tool: T) {
        self.register_arc(Arc::new(tool)).await;
    }

    /// Register a tool from an Arc.
    pub async fn register_arc(&self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        let mut inner = self.inner.write().await;
        if inner.tools.insert(name.clone(), tool).is_none() {
            inner.order.push(name.clone());
        }
        tracing::info!(tool = %name, "registered tool");
    }

    /// Unregister a tool by name.
    pub async fn unregister(&self, name: &str) {
        let mut inner = self.inner.write().await;
        if inner.tools.remove(name).is_some() {
            inner.order.retain(|n| n != name);
        }
    }

    /// Get a tool by name. A miss is a normal outcome; callers report it
    /// as an error payload rather than failing the run.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let inner = self.inner.read().await;
        inner.tools.get(name).cloned()
    }

    /// List all tool names in registration order.
    pub async fn list(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        inner.order.clone()
    }

    /// Get the number of registered tools.
    pub async fn count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.tools.len()
    }

    /// Convert all tools to LLM tool definitions, in registration order.
    pub async fn definitions(&self) -> Vec<ToolDefinition> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|name| inner.tools.get(name))
            .map(|t| {
                let description = t.description();
                ToolDefinition {
                    name: t.name().to_string(),
                    description: if description.is_empty() {
                        PLACEHOLDER_DESCRIPTION.to_string()
                    } else {
                        description.to_string()
                    },
                    parameters: t.schema(),
                }
            })
            .collect()
    }
}

impl Clone for Registry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
