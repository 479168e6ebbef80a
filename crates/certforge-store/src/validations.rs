// SPDX-License-Identifier: Apache-2.0

use crate::StoreError;
use certforge_model::{
    now_unix_ms, Category, ValidationDetail, ValidationId, ValidationRecord, ValidationStatus,
    CERTIFICATE_NAME_MAX_LEN,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

struct StoredValidation {
    record: ValidationRecord,
    detail: Option<ValidationDetail>,
}

/// Registry of validation records. The store owns the state machine:
/// records are created `pending` and settled exactly once into a
/// terminal status; any further transition attempt is rejected
/// without being applied.
pub struct ValidationStore {
    entries: RwLock<BTreeMap<ValidationId, StoredValidation>>,
    next_id: AtomicI64,
}

impl Default for ValidationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub async fn create_pending(
        &self,
        category: Category,
        certificate_name: &str,
    ) -> Result<ValidationRecord, StoreError> {
        let name = certificate_name.trim();
        if name.is_empty() {
            return Err(StoreError::Invalid(
                "certificate name must not be empty".to_string(),
            ));
        }
        if name.len() > CERTIFICATE_NAME_MAX_LEN {
            return Err(StoreError::Invalid(format!(
                "certificate name exceeds max length {CERTIFICATE_NAME_MAX_LEN}"
            )));
        }
        let record = ValidationRecord {
            id: ValidationId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            category,
            certificate_name: name.to_string(),
            submitted_at_ms: now_unix_ms(),
            status: ValidationStatus::Pending,
        };
        let mut entries = self.entries.write().await;
        entries.insert(
            record.id,
            StoredValidation {
                record: record.clone(),
                detail: None,
            },
        );
        Ok(record)
    }

    /// One-shot pending → terminal transition. Settling an already
    /// terminal record is a conflict and leaves it untouched, so
    /// subsequent reads never observe a status flap.
    pub async fn settle(
        &self,
        id: ValidationId,
        status: ValidationStatus,
        detail: ValidationDetail,
    ) -> Result<ValidationRecord, StoreError> {
        if !status.is_terminal() {
            return Err(StoreError::Invalid(format!(
                "cannot settle validation {id} to non-terminal status {status}"
            )));
        }
        let mut entries = self.entries.write().await;
        let stored = entries
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("validation {id}")))?;
        if stored.record.status.is_terminal() {
            return Err(StoreError::Conflict(format!(
                "validation {id} already settled as {}",
                stored.record.status
            )));
        }
        stored.record.status = status;
        stored.detail = Some(detail);
        Ok(stored.record.clone())
    }

    /// Intake rollback: remove a record whose submission did not
    /// complete. Only pending records can be discarded; once settled a
    /// record is immutable history.
    pub async fn discard(&self, id: ValidationId) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let stored = entries
            .get(&id)
            .ok_or_else(|| StoreError::NotFound(format!("validation {id}")))?;
        if stored.record.status.is_terminal() {
            return Err(StoreError::Conflict(format!(
                "validation {id} already settled as {}",
                stored.record.status
            )));
        }
        entries.remove(&id);
        Ok(())
    }

    pub async fn get(
        &self,
        id: ValidationId,
    ) -> Result<(ValidationRecord, Option<ValidationDetail>), StoreError> {
        let entries = self.entries.read().await;
        entries
            .get(&id)
            .map(|s| (s.record.clone(), s.detail.clone()))
            .ok_or_else(|| StoreError::NotFound(format!("validation {id}")))
    }

    /// All record summaries; ordering and filtering belong to the
    /// query layer.
    pub async fn list(&self) -> Vec<ValidationRecord> {
        let entries = self.entries.read().await;
        entries.values().map(|s| s.record.clone()).collect()
    }
}
