// ABOUTME: LeadDetailsTool - full record lookup for a single lead.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::store::LeadStore;
use crate::tool::{Tool, ToolResult};

/// Tool returning the full record for one lead.
pub struct LeadDetailsTool {
    store: Arc<LeadStore>,
}

impl LeadDetailsTool {
    pub fn new(store: Arc<LeadStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for LeadDetailsTool {
    fn name(&self) -> &str {
        "lead_details"
    }

    fn description(&self) -> &str {
        "Get full details for a specific lead by ID. \
         Includes product type, transport modes, and import/export locations."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "lead_id": {
                    "type": "integer",
                    "description": "The ID of the lead to fetch"
                }
            },
            "required": ["lead_id"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        #[derive(Deserialize)]
        struct Params {
            lead_id: u64,
        }
        let params: Params = serde_json::from_value(params)?;

        match self.store.get(params.lead_id).await? {
            Some(lead) => Ok(ToolResult::json(lead)),
            None => Ok(ToolResult::error(format!(
                "Lead {} not found",
                params.lead_id
            ))),
        }
    }
}
