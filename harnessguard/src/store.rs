//! In-memory harness repository
//!
//! Keeps built harnesses keyed by their internal id. Updates replace all
//! children wholesale and keep the harness id.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::core::HarnessGuardError;
use crate::model::{Harness, HarnessCreate};

#[derive(Debug, Clone, Serialize)]
pub struct StoredHarness {
    pub harness: Harness,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row for [`HarnessStore::list`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarnessSummary {
    pub id: Uuid,
    pub name: String,
    pub connectors: usize,
    pub wires: usize,
    pub connections: usize,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct HarnessStore {
    harnesses: HashMap<Uuid, StoredHarness>,
}

impl HarnessStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, request: &HarnessCreate) -> Result<&Harness, HarnessGuardError> {
        let harness = request.build()?;
        let id = harness.id();
        let now = Utc::now();
        tracing::debug!("Stored harness '{}' as {}", harness.name(), id);

        self.harnesses.insert(
            id,
            StoredHarness {
                harness,
                created_at: now,
                updated_at: now,
            },
        );
        self.get(id)
    }

    pub fn get(&self, id: Uuid) -> Result<&Harness, HarnessGuardError> {
        self.record(id).map(|r| &r.harness)
    }

    pub fn record(&self, id: Uuid) -> Result<&StoredHarness, HarnessGuardError> {
        self.harnesses
            .get(&id)
            .ok_or(HarnessGuardError::HarnessNotFound(id))
    }

    /// Replace every child of an existing harness. The replacement is built
    /// before the stored one is touched, so a failed build leaves it as is.
    pub fn update(&mut self, id: Uuid, request: &HarnessCreate) -> Result<&Harness, HarnessGuardError> {
        if !self.harnesses.contains_key(&id) {
            return Err(HarnessGuardError::HarnessNotFound(id));
        }
        let harness = request.build_with_id(id)?;

        let record = self
            .harnesses
            .get_mut(&id)
            .ok_or(HarnessGuardError::HarnessNotFound(id))?;
        record.harness = harness;
        record.updated_at = Utc::now();
        tracing::debug!("Replaced harness {}", id);
        Ok(&record.harness)
    }

    pub fn delete(&mut self, id: Uuid) -> Result<Harness, HarnessGuardError> {
        self.harnesses
            .remove(&id)
            .map(|r| r.harness)
            .ok_or(HarnessGuardError::HarnessNotFound(id))
    }

    /// Summaries ordered by creation time.
    pub fn list(&self) -> Vec<HarnessSummary> {
        let mut records: Vec<&StoredHarness> = self.harnesses.values().collect();
        records.sort_by_key(|r| (r.created_at, r.harness.id()));
        records
            .into_iter()
            .map(|r| HarnessSummary {
                id: r.harness.id(),
                name: r.harness.name().to_string(),
                connectors: r.harness.connectors().len(),
                wires: r.harness.wires().len(),
                connections: r.harness.connections().len(),
                updated_at: r.updated_at,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.harnesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.harnesses.is_empty()
    }
}
