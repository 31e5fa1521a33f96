// ABOUTME: Agent wiring - builds the runtime with its tools and system prompt.

use std::sync::Arc;

use leadloop::prelude::*;

/// System prompt handed to the runtime as configuration data.
const SYSTEM_PROMPT: &str = "\
You are an expert BDR (Business Development Representative) agent for a \
digital freight forwarder coordinating international transport.

Your mission:
1. Qualify leads: look for companies shipping physical goods internationally.
2. Disqualify leads: pure SaaS, local services, or non-shipping companies.
3. Manage the CRM: you have full access to the database to update statuses \
or delete bad leads.

Rules:
- Always check the lead summary first if the user asks about all leads.
- If asked to clean up or qualify leads, iterate through them, check their \
details or search the web, and update their status.
- Be concise and professional.";

/// Build the conversation runtime: OpenAI-compatible client from the
/// environment, the five built-in tools over the shared store, and the BDR
/// system prompt.
pub async fn build_runtime(store: Arc<LeadStore>) -> AgentRuntime {
    let client = OpenAiClient::from_env();
    let model = client.model().to_string();

    let registry = Registry::new();
    registry.register(LeadSummaryTool::new(store.clone())).await;
    registry.register(LeadDetailsTool::new(store.clone())).await;
    registry
        .register(UpdateLeadStatusTool::new(store.clone()))
        .await;
    registry.register(DeleteLeadTool::new(store)).await;
    registry.register(WebSearchTool::new()).await;

    AgentRuntime::new(Arc::new(client), model)
        .system_prompt(SYSTEM_PROMPT)
        .tools(registry)
}
