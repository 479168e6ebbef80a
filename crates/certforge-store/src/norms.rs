// SPDX-License-Identifier: Apache-2.0

use crate::StoreError;
use certforge_model::{Category, Norm, NormDraft, NormId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// Per-category compliance norm registry.
///
/// Ids are assigned by the store, strictly increasing and never
/// reused. At most one active norm exists per
/// (category, parameter_name, kind); a second create is a conflict.
pub struct NormStore {
    entries: RwLock<BTreeMap<NormId, Norm>>,
    next_id: AtomicI64,
}

impl Default for NormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NormStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Norms for one category, ordered by id. Never fails; empty for
    /// a category with no norms.
    pub async fn list(&self, category: Category) -> Vec<Norm> {
        let entries = self.entries.read().await;
        entries
            .values()
            .filter(|n| n.category == category)
            .cloned()
            .collect()
    }

    /// Immutable copy of the active norm set the engine evaluates
    /// against; recorded in the validation detail for audit.
    pub async fn snapshot(&self, category: Category) -> Vec<Norm> {
        self.list(category).await
    }

    pub async fn get(&self, id: NormId) -> Result<Norm, StoreError> {
        let entries = self.entries.read().await;
        entries
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("norm {id}")))
    }

    pub async fn create(&self, draft: NormDraft) -> Result<Norm, StoreError> {
        draft.validate()?;
        let mut entries = self.entries.write().await;
        if let Some(existing) = entries
            .values()
            .find(|n| n.category == draft.category && n.matches_property(&draft.parameter_name, draft.kind))
        {
            return Err(StoreError::Conflict(format!(
                "norm for ({}, {}, {}) already exists with id {}",
                draft.category,
                draft.parameter_name.trim(),
                draft.kind,
                existing.id
            )));
        }
        let id = NormId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let norm = Norm {
            id,
            category: draft.category,
            parameter_name: draft.parameter_name.trim().to_string(),
            min_value: draft.min_value,
            max_value: draft.max_value,
            unit: draft.unit,
            kind: draft.kind,
            version: 1,
        };
        entries.insert(id, norm.clone());
        Ok(norm)
    }

    /// Full-row update, matching the admin client's read-then-write
    /// behavior. `expected_version` rejects lost updates between two
    /// admin sessions; `None` is last-write-wins.
    pub async fn update(
        &self,
        id: NormId,
        draft: NormDraft,
        expected_version: Option<u64>,
    ) -> Result<Norm, StoreError> {
        draft.validate()?;
        let mut entries = self.entries.write().await;
        if let Some(other) = entries.values().find(|n| {
            n.id != id
                && n.category == draft.category
                && n.matches_property(&draft.parameter_name, draft.kind)
        }) {
            return Err(StoreError::Conflict(format!(
                "norm for ({}, {}, {}) already exists with id {}",
                draft.category,
                draft.parameter_name.trim(),
                draft.kind,
                other.id
            )));
        }
        let existing = entries
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("norm {id}")))?;
        if let Some(expected) = expected_version {
            if existing.version != expected {
                return Err(StoreError::Conflict(format!(
                    "norm {id} version is {}, expected {expected}",
                    existing.version
                )));
            }
        }
        existing.category = draft.category;
        existing.parameter_name = draft.parameter_name.trim().to_string();
        existing.min_value = draft.min_value;
        existing.max_value = draft.max_value;
        existing.unit = draft.unit;
        existing.kind = draft.kind;
        existing.version += 1;
        Ok(existing.clone())
    }

    /// Delete is authoritative, not idempotent: repeating a delete of
    /// a gone id is an error.
    pub async fn delete(&self, id: NormId) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("norm {id}")))
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}
