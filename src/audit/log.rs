/*!
 * Audit Log
 * Append-only trail of committed workflow transitions
 */

use super::types::AuditEntry;
use crate::core::id::ActorId;
use ahash::RandomState;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Write side of the audit trail
///
/// The workflow only ever appends; it never reads back what it wrote.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry);
}

/// In-memory audit trail with per-entity and per-actor indices
pub struct AuditLog {
    entries: RwLock<Vec<AuditEntry>>,
    by_entity: Arc<DashMap<String, Vec<AuditEntry>, RandomState>>,
    by_actor: Arc<DashMap<ActorId, u64, RandomState>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            by_entity: Arc::new(DashMap::with_hasher(RandomState::new())),
            by_actor: Arc::new(DashMap::with_hasher(RandomState::new())),
        }
    }

    /// All entries in commit order
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().clone()
    }

    /// Most recent entries first
    pub fn recent(&self, limit: usize) -> Vec<AuditEntry> {
        self.entries.read().iter().rev().take(limit).cloned().collect()
    }

    /// Entries for one entity in commit order
    pub fn for_entity(&self, entity_id: &str) -> Vec<AuditEntry> {
        self.by_entity
            .get(entity_id)
            .map(|entries| entries.value().clone())
            .unwrap_or_default()
    }

    /// Number of entries recorded by an actor
    pub fn actor_count(&self, actor: ActorId) -> u64 {
        self.by_actor.get(&actor).map(|count| *count).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> AuditStats {
        let entries = self.entries.read();
        AuditStats {
            total_entries: entries.len(),
            state_changes: entries.iter().filter(|e| e.is_state_change()).count(),
            entities_tracked: self.by_entity.len(),
            actors_tracked: self.by_actor.len(),
        }
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditSink for AuditLog {
    fn record(&self, entry: &AuditEntry) {
        info!(
            actor = %entry.actor,
            action = %entry.action,
            entity_type = %entry.entity_type,
            entity_id = %entry.entity_id,
            before = ?entry.before,
            after = %entry.after,
            "Audit entry recorded"
        );

        self.entries.write().push(entry.clone());

        self.by_entity
            .entry(entry.entity_id.clone())
            .or_default()
            .push(entry.clone());

        self.by_actor
            .entry(entry.actor)
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }
}

impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    fn record(&self, entry: &AuditEntry) {
        (**self).record(entry)
    }
}

/// Audit statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditStats {
    pub total_entries: usize,
    pub state_changes: usize,
    pub entities_tracked: usize,
    pub actors_tracked: usize,
}
