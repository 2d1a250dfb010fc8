//! Per-user, per-concept mastery records.
//!
//! The store guarantees exactly one record per (user, concept) pair and
//! read-after-write visibility for a single caller's sequential operations.
//! Hosts may supply their own persistence behind [`MasteryStore`]; a store
//! using optimistic concurrency reports [`UpdateConflict`] and the caller
//! retries the whole update cycle.

use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

use crate::types::{ConceptId, MasteryRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("concurrent update conflict for user {user_id}, concept {concept_id}")]
pub struct UpdateConflict {
    pub user_id: String,
    pub concept_id: ConceptId,
}

pub trait MasteryStore: Send + Sync {
    /// Current record for the pair, or the default (not_started, score 0)
    /// when none exists yet.
    fn get(&self, user_id: &str, concept_id: &str) -> MasteryRecord;

    /// Atomically create or replace the record for the pair.
    fn upsert(
        &self,
        user_id: &str,
        concept_id: &str,
        record: MasteryRecord,
    ) -> Result<(), UpdateConflict>;

    /// Snapshot of all records for a user, in no particular order.
    fn records_for_user(&self, user_id: &str) -> Vec<(ConceptId, MasteryRecord)>;
}

/// In-memory store. Read-modify-write sequences for the same pair serialize
/// behind the lock; this implementation never reports a conflict.
#[derive(Debug, Default)]
pub struct InMemoryMasteryStore {
    records: RwLock<HashMap<String, HashMap<ConceptId, MasteryRecord>>>,
}

impl InMemoryMasteryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MasteryStore for InMemoryMasteryStore {
    fn get(&self, user_id: &str, concept_id: &str) -> MasteryRecord {
        self.records
            .read()
            .get(user_id)
            .and_then(|per_user| per_user.get(concept_id))
            .cloned()
            .unwrap_or_default()
    }

    fn upsert(
        &self,
        user_id: &str,
        concept_id: &str,
        record: MasteryRecord,
    ) -> Result<(), UpdateConflict> {
        self.records
            .write()
            .entry(user_id.to_string())
            .or_default()
            .insert(concept_id.to_string(), record);
        Ok(())
    }

    fn records_for_user(&self, user_id: &str) -> Vec<(ConceptId, MasteryRecord)> {
        self.records
            .read()
            .get(user_id)
            .map(|per_user| {
                per_user
                    .iter()
                    .map(|(id, record)| (id.clone(), record.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
