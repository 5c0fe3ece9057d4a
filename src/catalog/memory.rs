/*!
 * In-Memory Catalog
 * Concurrent catalog used by embedders without a database and by tests
 */

use super::traits::Catalog;
use super::types::{Guardian, Student, WithdrawalReason};
use crate::core::errors::{ValidationIssue, WithdrawalResult};
use crate::core::id::{GuardianId, ReasonId, StudentId};
use crate::permissions::{actions, Actor, PermissionChecker};
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

/// Catalog backed by sharded maps
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    students: Arc<DashMap<StudentId, Student, RandomState>>,
    guardians: Arc<DashMap<GuardianId, Guardian, RandomState>>,
    reasons: Arc<DashMap<ReasonId, WithdrawalReason, RandomState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_student(&self, id: impl Into<StudentId>, full_name: impl Into<String>) {
        let id = id.into();
        self.students.insert(
            id,
            Student {
                id,
                full_name: full_name.into(),
            },
        );
    }

    pub fn add_guardian(&self, id: impl Into<GuardianId>, full_name: impl Into<String>) {
        let id = id.into();
        self.guardians.insert(
            id,
            Guardian {
                id,
                full_name: full_name.into(),
            },
        );
    }

    pub fn add_reason(&self, reason: WithdrawalReason) {
        self.reasons.insert(reason.id, reason);
    }

    /// Deactivate a reason so no new request can reference it
    ///
    /// Returns whether the reason was active before the call.
    pub fn deactivate_reason(
        &self,
        actor: &Actor,
        permissions: &dyn PermissionChecker,
        id: ReasonId,
    ) -> WithdrawalResult<bool> {
        permissions.require_action(actor, actions::MANAGE_REASONS)?;

        let mut reason = self
            .reasons
            .get_mut(&id)
            .ok_or(ValidationIssue::UnknownReason { reason: id })?;
        let was_active = reason.active;
        reason.active = false;

        info!(reason = %id, actor = %actor.id, was_active, "Withdrawal reason deactivated");
        Ok(was_active)
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }
}

impl Catalog for InMemoryCatalog {
    fn student_exists(&self, id: StudentId) -> bool {
        self.students.contains_key(&id)
    }

    fn guardian_exists(&self, id: GuardianId) -> bool {
        self.guardians.contains_key(&id)
    }

    fn reason(&self, id: ReasonId) -> Option<WithdrawalReason> {
        self.reasons.get(&id).map(|entry| entry.value().clone())
    }
}
