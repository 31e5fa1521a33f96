// ABOUTME: LeadSummaryTool - compact one-line-per-lead view of the CRM.

use std::sync::Arc;

use async_trait::async_trait;

use crate::store::LeadStore;
use crate::tool::{Tool, ToolResult};

/// Tool returning a token-cheap summary of every lead.
pub struct LeadSummaryTool {
    store: Arc<LeadStore>,
}

impl LeadSummaryTool {
    pub fn new(store: Arc<LeadStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for LeadSummaryTool {
    fn name(&self) -> &str {
        "lead_summary"
    }

    fn description(&self) -> &str {
        "Reads the current leads database and returns a summary of all leads. \
         Use this to understand the current state of the CRM."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        let leads = match self.store.list().await {
            Ok(leads) => leads,
            Err(e) => return Ok(ToolResult::error(format!("Failed to read leads: {}", e))),
        };

        let lines: Vec<String> = leads
            .iter()
            .map(|l| {
                format!(
                    "ID {}: {} ({}) - Status: {}",
                    l.id,
                    l.company_name,
                    l.location,
                    l.status.as_str()
                )
            })
            .collect();

        Ok(ToolResult::json(serde_json::json!({
            "total": leads.len(),
            "leads": lines,
        })))
    }
}
