/*!
 * Request Lifecycle
 *
 * Generic state machine driving both individual and mass requests. Every
 * operation runs in one store transaction: load, check, apply, stage the
 * audit entry (and the decision row for `decide`), commit. Any error drops
 * the transaction, so nothing of a failed call is ever visible.
 *
 * Checks run in a fixed order: authorization, input validation, load, state
 * precondition. `cancel` loads first because its check is ownership.
 */

use super::departure::DepartureLog;
use super::state::{RequestState, Transition};
use super::subject::Subject;
use super::types::{Cancellation, NewRequest, Stamp, WithdrawalRequest};
use crate::audit::AuditEntry;
use crate::authorization::{check_justification, AuthorizationDecision, AuthorizationRecorder, Verdict};
use crate::catalog::Catalog;
use crate::core::clock::Clock;
use crate::core::errors::{ConflictKind, Operation, ValidationIssue, WithdrawalError, WithdrawalResult};
use crate::core::id::{DepartureId, ReasonId, RequestId};
use crate::permissions::{actions, Actor, PermissionChecker};
use crate::storage::{Store, Transaction};
use std::marker::PhantomData;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

/// Entity name written to audit entries for departure rows
pub const DEPARTURE_ENTITY_TYPE: &str = "departure_log";

/// Lifecycle of one subject kind
pub struct RequestLifecycle<S: Subject> {
    store: Store,
    catalog: Arc<dyn Catalog>,
    permissions: Arc<dyn PermissionChecker>,
    recorder: AuthorizationRecorder,
    clock: Arc<dyn Clock>,
    _subject: PhantomData<fn() -> S>,
}

impl<S: Subject> Clone for RequestLifecycle<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            catalog: Arc::clone(&self.catalog),
            permissions: Arc::clone(&self.permissions),
            recorder: self.recorder.clone(),
            clock: Arc::clone(&self.clock),
            _subject: PhantomData,
        }
    }
}

impl<S: Subject> RequestLifecycle<S> {
    pub fn new(
        store: Store,
        catalog: Arc<dyn Catalog>,
        permissions: Arc<dyn PermissionChecker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let recorder =
            AuthorizationRecorder::new(store.clone(), Arc::clone(&permissions), Arc::clone(&clock));
        Self {
            store,
            catalog,
            permissions,
            recorder,
            clock,
            _subject: PhantomData,
        }
    }

    pub fn recorder(&self) -> &AuthorizationRecorder {
        &self.recorder
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Register a new request in state `received`
    #[instrument(skip(self, actor, draft), fields(actor = %actor.id, entity = S::ENTITY_TYPE))]
    pub fn create(&self, actor: &Actor, draft: NewRequest<S>) -> WithdrawalResult<WithdrawalRequest<S>> {
        self.permissions
            .require_action(actor, actions::CREATE_WITHDRAWAL)?;

        draft.subject.validate(self.catalog.as_ref())?;
        let schedule = draft.schedule.ok_or(ValidationIssue::MissingSchedule)?;
        schedule.validate()?;
        self.check_reason(draft.reason)?;

        let now = self.clock.now();
        let request = WithdrawalRequest {
            id: RequestId::new(),
            subject: draft.subject,
            reason: draft.reason,
            schedule,
            observation: draft.observation.trim().to_owned(),
            state: RequestState::Received,
            received: Stamp::new(actor.id, now),
            derived: None,
            decided: None,
            decision: None,
            cancellation: None,
            version: 1,
        };

        let mut tx = self.store.begin();
        tx.put(request.clone());
        tx.append_audit(self.audit_entry(
            actor,
            Operation::Create,
            request.id,
            None,
            RequestState::Received,
            now,
        ));
        tx.commit();

        info!(
            request = %request.id,
            students = request.subject.students().len(),
            "Withdrawal request received"
        );
        Ok(request)
    }

    /// Hand a received request to the supervising approver
    #[instrument(skip(self, actor), fields(actor = %actor.id, entity = S::ENTITY_TYPE))]
    pub fn derive(&self, request_id: RequestId, actor: &Actor) -> WithdrawalResult<WithdrawalRequest<S>> {
        self.permissions
            .require_action(actor, actions::DERIVE_WITHDRAWAL)?;

        self.transition(request_id, actor, Operation::Derive, |request, _tx, now| {
            request.state = request.state.apply(Transition::Derive, Operation::Derive)?;
            request.derived = Some(Stamp::new(actor.id, now));
            Ok(())
        })
    }

    /// Approve or reject a derived request, recording the decision row
    #[instrument(skip(self, actor, justification), fields(actor = %actor.id, entity = S::ENTITY_TYPE))]
    pub fn decide(
        &self,
        request_id: RequestId,
        actor: &Actor,
        verdict: Verdict,
        justification: Option<&str>,
    ) -> WithdrawalResult<WithdrawalRequest<S>> {
        self.permissions
            .require_action(actor, actions::DECIDE_WITHDRAWAL)?;
        let justification = check_justification(verdict, justification)?;

        self.transition(request_id, actor, Operation::Decide, |request, tx, _now| {
            request.state.apply(verdict.transition(), Operation::Decide)?;
            let decision = self.recorder.stage(
                tx,
                request.id,
                actor.id,
                verdict,
                justification.as_deref(),
            )?;
            request.link_decision(&decision);
            Ok(())
        })
    }

    /// Cancel a request that has not been decided yet
    ///
    /// Allowed for the original requester, administrators, and roles listed
    /// under `cancel_withdrawal` in the action table.
    #[instrument(skip(self, actor, reason), fields(actor = %actor.id, entity = S::ENTITY_TYPE))]
    pub fn cancel(
        &self,
        request_id: RequestId,
        actor: &Actor,
        reason: Option<&str>,
    ) -> WithdrawalResult<WithdrawalRequest<S>> {
        self.transition(request_id, actor, Operation::Cancel, |request, _tx, now| {
            let owner = request.requester() == actor.id;
            if !(owner
                || actor.is_administrator
                || self.permissions.role_allowed(actor, actions::CANCEL_WITHDRAWAL))
            {
                warn!(request = %request.id, actor = %actor.id, "Cancellation by non-owner refused");
                return Err(WithdrawalError::unauthorized(
                    actor.id,
                    actions::CANCEL_WITHDRAWAL,
                ));
            }

            request.state = request.state.apply(Transition::Cancel, Operation::Cancel)?;
            request.cancellation = Some(Cancellation {
                stamp: Stamp::new(actor.id, now),
                reason: reason
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(str::to_owned),
            });
            Ok(())
        })
    }

    // ------------------------------------------------------------------------
    // Departure log
    // ------------------------------------------------------------------------

    /// Record that the students of an approved request actually left
    #[instrument(skip(self, actor), fields(actor = %actor.id, entity = S::ENTITY_TYPE))]
    pub fn register_departure(
        &self,
        request_id: RequestId,
        actor: &Actor,
        departed_at: OffsetDateTime,
    ) -> WithdrawalResult<DepartureLog> {
        self.permissions
            .require_action(actor, actions::REGISTER_DEPARTURE)?;

        let mut tx = self.store.begin();
        let request = tx.load::<S>(request_id)?;
        if request.state != RequestState::Approved {
            return Err(WithdrawalError::state(Operation::RegisterDeparture, request.state));
        }
        if tx.departure(request_id).is_some() {
            return Err(ConflictKind::DepartureExists {
                request: request_id,
            }
            .into());
        }

        let log = DepartureLog {
            id: DepartureId::new(),
            request: request_id,
            students: request.subject.students(),
            recorded_by: actor.id,
            departed_at,
            returned_at: None,
        };
        tx.put_departure(log.clone());
        tx.append_audit(AuditEntry::new(
            actor.id,
            Operation::RegisterDeparture,
            DEPARTURE_ENTITY_TYPE,
            log.id,
            Some(RequestState::Approved),
            RequestState::Approved,
            self.clock.now(),
        ));
        tx.commit();

        info!(request = %request_id, departure = %log.id, "Departure registered");
        Ok(log)
    }

    /// Record the return of students whose departure was registered
    #[instrument(skip(self, actor), fields(actor = %actor.id, entity = S::ENTITY_TYPE))]
    pub fn register_return(
        &self,
        request_id: RequestId,
        actor: &Actor,
        returned_at: OffsetDateTime,
    ) -> WithdrawalResult<DepartureLog> {
        self.permissions
            .require_action(actor, actions::REGISTER_DEPARTURE)?;

        let mut tx = self.store.begin();
        let request = tx.load::<S>(request_id)?;
        if request.state != RequestState::Approved {
            return Err(WithdrawalError::state(Operation::RegisterReturn, request.state));
        }
        let mut log = tx
            .departure(request_id)
            .ok_or(ValidationIssue::NoDepartureRecorded {
                request: request_id,
            })?;
        if log.has_returned() {
            return Err(ConflictKind::ReturnRecorded {
                request: request_id,
            }
            .into());
        }
        if returned_at < log.departed_at {
            return Err(ValidationIssue::ReturnBeforeDeparture.into());
        }

        log.returned_at = Some(returned_at);
        tx.put_departure(log.clone());
        tx.append_audit(AuditEntry::new(
            actor.id,
            Operation::RegisterReturn,
            DEPARTURE_ENTITY_TYPE,
            log.id,
            Some(RequestState::Approved),
            RequestState::Approved,
            self.clock.now(),
        ));
        tx.commit();

        info!(request = %request_id, departure = %log.id, "Return registered");
        Ok(log)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Read a request; the requester may always read their own
    pub fn get(&self, request_id: RequestId, actor: &Actor) -> WithdrawalResult<WithdrawalRequest<S>> {
        let request = self
            .store
            .request::<S>(request_id)
            .ok_or(WithdrawalError::NotFound {
                request: request_id,
            })?;
        if request.requester() != actor.id {
            self.permissions
                .require_action(actor, actions::VIEW_WITHDRAWAL)?;
        }
        Ok(request)
    }

    /// Requests of this subject kind in `state`, oldest first
    pub fn list_in_state(
        &self,
        actor: &Actor,
        state: RequestState,
    ) -> WithdrawalResult<Vec<WithdrawalRequest<S>>> {
        self.permissions
            .require_action(actor, actions::VIEW_WITHDRAWAL)?;
        Ok(self.store.requests_in_state::<S>(state))
    }

    /// Decision attached to a request, if any
    pub fn decision(&self, request_id: RequestId) -> Option<AuthorizationDecision> {
        self.recorder.get_decision(request_id)
    }

    /// Departure log of a request, if any
    pub fn departure(&self, request_id: RequestId) -> Option<DepartureLog> {
        self.store.departure(request_id)
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn check_reason(&self, reason: ReasonId) -> WithdrawalResult<()> {
        let entry = self
            .catalog
            .reason(reason)
            .ok_or(ValidationIssue::UnknownReason { reason })?;
        if !entry.active {
            return Err(ValidationIssue::InactiveReason { reason }.into());
        }
        debug!(reason = %reason, severity = %entry.severity, "Reason accepted");
        Ok(())
    }

    /// Load, mutate through `apply`, bump the version, audit, commit
    fn transition<F>(
        &self,
        request_id: RequestId,
        actor: &Actor,
        operation: Operation,
        apply: F,
    ) -> WithdrawalResult<WithdrawalRequest<S>>
    where
        F: FnOnce(&mut WithdrawalRequest<S>, &mut Transaction<'_>, OffsetDateTime) -> WithdrawalResult<()>,
    {
        let mut tx = self.store.begin();
        let mut request = tx.load::<S>(request_id)?;
        let before = request.state;
        let now = self.clock.now();

        apply(&mut request, &mut tx, now)?;
        request.version += 1;

        tx.put(request.clone());
        tx.append_audit(self.audit_entry(
            actor,
            operation,
            request.id,
            Some(before),
            request.state,
            now,
        ));
        tx.commit();

        info!(
            request = %request.id,
            %operation,
            from = %before,
            to = %request.state,
            "Withdrawal request transitioned"
        );
        Ok(request)
    }

    fn audit_entry(
        &self,
        actor: &Actor,
        operation: Operation,
        request_id: RequestId,
        before: Option<RequestState>,
        after: RequestState,
        at: OffsetDateTime,
    ) -> AuditEntry {
        AuditEntry::new(actor.id, operation, S::ENTITY_TYPE, request_id, before, after, at)
    }
}
