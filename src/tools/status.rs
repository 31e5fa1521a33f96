// ABOUTME: UpdateLeadStatusTool - moves a lead through the status lifecycle.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::store::{LeadStatus, LeadStore, LeadUpdate};
use crate::tool::{Tool, ToolResult};

/// Tool updating a lead's status, validating against the known lifecycle.
pub struct UpdateLeadStatusTool {
    store: Arc<LeadStore>,
}

impl UpdateLeadStatusTool {
    pub fn new(store: Arc<LeadStore>) -> Self {
        Self { store }
    }

    fn allowed_statuses() -> String {
        LeadStatus::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
impl Tool for UpdateLeadStatusTool {
    fn name(&self) -> &str {
        "update_lead_status"
    }

    fn description(&self) -> &str {
        "Updates the status of a lead. Allowed statuses: \
         \"New\", \"Qualified\", \"Disqualified\", \"Contacted\", \"Negotiating\", \"Closed\"."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "lead_id": {
                    "type": "integer",
                    "description": "The ID of the lead to update"
                },
                "new_status": {
                    "type": "string",
                    "description": "The new status name"
                }
            },
            "required": ["lead_id", "new_status"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        #[derive(Deserialize)]
        struct Params {
            lead_id: u64,
            new_status: String,
        }
        let params: Params = serde_json::from_value(params)?;

        let Some(status) = LeadStatus::parse(&params.new_status) else {
            return Ok(ToolResult::error(format!(
                "Invalid status '{}'. Must be one of: {}",
                params.new_status,
                Self::allowed_statuses()
            )));
        };

        let patch = LeadUpdate {
            status: Some(status),
            ..LeadUpdate::default()
        };

        match self.store.update(params.lead_id, patch).await? {
            Some(lead) => Ok(ToolResult::json(serde_json::json!({
                "success": true,
                "new_status": lead.status.as_str(),
            }))),
            None => Ok(ToolResult::error(format!(
                "Lead {} not found",
                params.lead_id
            ))),
        }
    }
}
