// ABOUTME: LeadStore - JSON-file-backed lead persistence.
// ABOUTME: Whole-file read/rewrite, serialized behind an async mutex.

use std::path::PathBuf;

use tokio::sync::Mutex;

use super::{Lead, LeadCreate, LeadUpdate};
use crate::error::StoreError;

/// File-backed lead store. Every operation reads the whole file and
/// mutations rewrite it; the last successful save wins. The internal mutex
/// serializes concurrent tool invocations against the same file.
pub struct LeadStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LeadStore {
    /// Create a store backed by the given JSON file. The file is created on
    /// first write; a missing file reads as an empty store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Vec<Lead>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, leads: &[Lead]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(leads)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }

    /// All leads in stored order.
    pub async fn list(&self) -> Result<Vec<Lead>, StoreError> {
        let _guard = self.lock.lock().await;
        self.load()
    }

    /// A single lead by id.
    pub async fn get(&self, id: u64) -> Result<Option<Lead>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load()?.into_iter().find(|l| l.id == id))
    }

    /// Create a lead, assigning the next id.
    pub async fn create(&self, fields: LeadCreate) -> Result<Lead, StoreError> {
        let _guard = self.lock.lock().await;
        let mut leads = self.load()?;
        let id = leads.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        let lead = fields.into_lead(id);
        leads.push(lead.clone());
        self.save(&leads)?;
        tracing::debug!(id, "created lead");
        Ok(lead)
    }

    /// Apply a partial update to a lead. Returns the updated record, or
    /// `None` if the id is unknown.
    pub async fn update(&self, id: u64, patch: LeadUpdate) -> Result<Option<Lead>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut leads = self.load()?;
        let Some(lead) = leads.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        patch.apply(lead);
        let updated = lead.clone();
        self.save(&leads)?;
        tracing::debug!(id, "updated lead");
        Ok(Some(updated))
    }

    /// Delete a lead. Returns whether a record was removed.
    pub async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut leads = self.load()?;
        let before = leads.len();
        leads.retain(|l| l.id != id);
        if leads.len() == before {
            return Ok(false);
        }
        self.save(&leads)?;
        tracing::debug!(id, "deleted lead");
        Ok(true)
    }
}
