// ABOUTME: Lead record types - the CRM domain model persisted by the store.
// ABOUTME: Includes the status lifecycle and partial create/update shapes.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStatus {
    New,
    Qualified,
    Disqualified,
    Contacted,
    Negotiating,
    Closed,
}

impl LeadStatus {
    /// All statuses, for validation messages.
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::New,
        LeadStatus::Qualified,
        LeadStatus::Disqualified,
        LeadStatus::Contacted,
        LeadStatus::Negotiating,
        LeadStatus::Closed,
    ];

    /// The status name as stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Disqualified => "Disqualified",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Negotiating => "Negotiating",
            LeadStatus::Closed => "Closed",
        }
    }

    /// Parse a status name, `None` if unknown.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::New
    }
}

/// A persisted lead record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: u64,
    pub company_name: String,
    pub website_url: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub employee_count: String,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub transport_modes: Vec<String>,
    #[serde(default)]
    pub import_locations: Vec<String>,
    #[serde(default)]
    pub export_locations: Vec<String>,
    #[serde(default)]
    pub status: LeadStatus,
}

/// Fields accepted when creating a lead.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadCreate {
    pub company_name: String,
    pub website_url: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub employee_count: String,
}

impl LeadCreate {
    /// Build a full record with the given id.
    pub fn into_lead(self, id: u64) -> Lead {
        Lead {
            id,
            company_name: self.company_name,
            website_url: self.website_url,
            location: self.location,
            industry: self.industry,
            employee_count: self.employee_count,
            product: None,
            product_type: None,
            transport_modes: Vec::new(),
            import_locations: Vec::new(),
            export_locations: Vec::new(),
            status: LeadStatus::New,
        }
    }
}

/// Partial update - only set fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadUpdate {
    pub company_name: Option<String>,
    pub website_url: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub employee_count: Option<String>,
    pub product: Option<String>,
    pub product_type: Option<String>,
    pub transport_modes: Option<Vec<String>>,
    pub import_locations: Option<Vec<String>>,
    pub export_locations: Option<Vec<String>>,
    pub status: Option<LeadStatus>,
}

impl LeadUpdate {
    /// Apply the set fields onto a record.
    pub fn apply(self, lead: &mut Lead) {
        if let Some(v) = self.company_name {
            lead.company_name = v;
        }
        if let Some(v) = self.website_url {
            lead.website_url = v;
        }
        if let Some(v) = self.location {
            lead.location = v;
        }
        if let Some(v) = self.industry {
            lead.industry = v;
        }
        if let Some(v) = self.employee_count {
            lead.employee_count = v;
        }
        if let Some(v) = self.product {
            lead.product = Some(v);
        }
        if let Some(v) = self.product_type {
            lead.product_type = Some(v);
        }
        if let Some(v) = self.transport_modes {
            lead.transport_modes = v;
        }
        if let Some(v) = self.import_locations {
            lead.import_locations = v;
        }
        if let Some(v) = self.export_locations {
            lead.export_locations = v;
        }
        if let Some(v) = self.status {
            lead.status = v;
        }
    }
}
