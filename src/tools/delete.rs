// ABOUTME: DeleteLeadTool - permanently removes a lead record.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::store::LeadStore;
use crate::tool::{Tool, ToolResult};

/// Tool deleting a lead from the store.
pub struct DeleteLeadTool {
    store: Arc<LeadStore>,
}

impl DeleteLeadTool {
    pub fn new(store: Arc<LeadStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for DeleteLeadTool {
    fn name(&self) -> &str {
        "delete_lead"
    }

    fn description(&self) -> &str {
        "Permanently deletes a lead from the database."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "lead_id": {
                    "type": "integer",
                    "description": "The ID of the lead to delete"
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

        let deleted = self.store.delete(params.lead_id).await?;
        Ok(ToolResult::json(serde_json::json!({ "success": deleted })))
    }
}
