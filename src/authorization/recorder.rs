/*!
 * Authorization Recorder
 * Creates and reads the single decision row tied to a request
 *
 * A decision never exists without its request moving to the verdict's
 * state: `create_decision` commits the row, the link and the transition
 * together, and the lifecycle's `decide` stages the row inside its own
 * transition.
 */

use super::types::{AuthorizationDecision, Verdict};
use crate::audit::AuditEntry;
use crate::core::clock::Clock;
use crate::core::errors::{ConflictKind, Operation, ValidationIssue, WithdrawalError, WithdrawalResult};
use crate::core::id::{ActorId, DecisionId, RequestId};
use crate::permissions::{actions, Actor, PermissionChecker};
use crate::storage::{Store, Transaction};
use crate::withdrawal::state::RequestState;
use std::sync::Arc;
use tracing::{info, instrument};

/// Trim a justification, mapping blank text to `None`
pub fn normalize_justification(justification: Option<&str>) -> Option<String> {
    justification
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// Reject a rejection that carries no justification
pub fn check_justification(verdict: Verdict, justification: Option<&str>) -> WithdrawalResult<Option<String>> {
    let normalized = normalize_justification(justification);
    if verdict == Verdict::Rejected && normalized.is_none() {
        return Err(ValidationIssue::MissingJustification.into());
    }
    Ok(normalized)
}

/// Decision writer
#[derive(Clone)]
pub struct AuthorizationRecorder {
    store: Store,
    permissions: Arc<dyn PermissionChecker>,
    clock: Arc<dyn Clock>,
}

impl AuthorizationRecorder {
    pub fn new(store: Store, permissions: Arc<dyn PermissionChecker>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            permissions,
            clock,
        }
    }

    /// Stage a decision inside an open transaction
    ///
    /// Checks, in order: no decision exists yet, the request is derived, a
    /// rejection is justified. Nothing is staged on failure.
    pub fn stage(
        &self,
        tx: &mut Transaction<'_>,
        request_id: RequestId,
        decider: ActorId,
        verdict: Verdict,
        justification: Option<&str>,
    ) -> WithdrawalResult<AuthorizationDecision> {
        let stored = tx
            .stored_request(request_id)
            .ok_or(WithdrawalError::NotFound {
                request: request_id,
            })?;

        if tx.decision(request_id).is_some() || stored.decision().is_some() {
            return Err(ConflictKind::DecisionExists {
                request: request_id,
            }
            .into());
        }

        if stored.state() != RequestState::Derived {
            return Err(WithdrawalError::state(Operation::RecordDecision, stored.state()));
        }

        let justification = check_justification(verdict, justification)?;

        let decision = AuthorizationDecision {
            id: DecisionId::new(),
            request: request_id,
            decider,
            verdict,
            justification,
            decided_at: self.clock.now(),
        };
        tx.insert_decision(decision.clone());
        Ok(decision)
    }

    /// Decide a derived request of either subject kind
    ///
    /// Same effect as the lifecycle's `decide`, reached through the request id
    /// alone. The audit entry is attributed to `record_decision`.
    #[instrument(skip(self, actor, justification), fields(actor = %actor.id))]
    pub fn create_decision(
        &self,
        request_id: RequestId,
        actor: &Actor,
        verdict: Verdict,
        justification: Option<&str>,
    ) -> WithdrawalResult<AuthorizationDecision> {
        self.permissions
            .require_action(actor, actions::DECIDE_WITHDRAWAL)?;

        let mut tx = self.store.begin();
        let decision = self.stage(&mut tx, request_id, actor.id, verdict, justification)?;
        let mut stored = tx
            .stored_request(request_id)
            .ok_or(WithdrawalError::NotFound {
                request: request_id,
            })?;
        stored.record_decision(&decision);

        tx.append_audit(AuditEntry::new(
            actor.id,
            Operation::RecordDecision,
            stored.entity_type(),
            request_id,
            Some(RequestState::Derived),
            stored.state(),
            decision.decided_at,
        ));
        tx.put_stored(stored);
        tx.commit();

        info!(request = %request_id, %verdict, "Authorization decision recorded");
        Ok(decision)
    }

    /// Read-only lookup
    pub fn get_decision(&self, request_id: RequestId) -> Option<AuthorizationDecision> {
        self.store.decision(request_id)
    }
}
