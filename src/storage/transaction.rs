/*!
 * Transactions
 *
 * Request-scoped unit of work over the store. Writes are staged and become
 * visible only on commit; a transaction dropped without commit rolls back by
 * discarding them. The store's write lock is held for the whole transaction,
 * so a state check made inside it stays valid until commit.
 */

use super::store::Tables;
use crate::audit::{AuditEntry, AuditSink};
use crate::authorization::types::AuthorizationDecision;
use crate::core::errors::{WithdrawalError, WithdrawalResult};
use crate::core::id::RequestId;
use crate::withdrawal::departure::DepartureLog;
use crate::withdrawal::subject::Subject;
use crate::withdrawal::types::{StoredRequest, WithdrawalRequest};
use parking_lot::RwLockWriteGuard;
use tracing::debug;

/// Transaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction in progress
    Active,
    /// Staged writes applied
    Committed,
    /// Staged writes discarded
    RolledBack,
}

/// A single staged write
#[derive(Debug, Clone)]
pub enum StagedWrite {
    PutRequest(StoredRequest),
    InsertDecision(AuthorizationDecision),
    PutDeparture(DepartureLog),
    Audit(AuditEntry),
}

/// Unit of work holding the store's write lock
pub struct Transaction<'a> {
    tables: RwLockWriteGuard<'a, Tables>,
    audit: &'a dyn AuditSink,
    staged: Vec<StagedWrite>,
    state: TransactionState,
}

impl<'a> Transaction<'a> {
    pub(super) fn begin(tables: RwLockWriteGuard<'a, Tables>, audit: &'a dyn AuditSink) -> Self {
        Self {
            tables,
            audit,
            staged: Vec::new(),
            state: TransactionState::Active,
        }
    }

    // ------------------------------------------------------------------------
    // Reads (staged writes shadow committed rows)
    // ------------------------------------------------------------------------

    pub fn stored_request(&self, id: RequestId) -> Option<StoredRequest> {
        self.staged
            .iter()
            .rev()
            .find_map(|write| match write {
                StagedWrite::PutRequest(request) if request.id() == id => Some(request.clone()),
                _ => None,
            })
            .or_else(|| self.tables.requests.get(&id).cloned())
    }

    /// Typed request; a request of the other subject kind counts as missing
    pub fn load<S: Subject>(&self, id: RequestId) -> WithdrawalResult<WithdrawalRequest<S>> {
        self.stored_request(id)
            .as_ref()
            .and_then(S::from_stored)
            .cloned()
            .ok_or(WithdrawalError::NotFound { request: id })
    }

    pub fn decision(&self, request: RequestId) -> Option<AuthorizationDecision> {
        self.staged
            .iter()
            .rev()
            .find_map(|write| match write {
                StagedWrite::InsertDecision(decision) if decision.request == request => {
                    Some(decision.clone())
                }
                _ => None,
            })
            .or_else(|| self.tables.decisions.get(&request).cloned())
    }

    pub fn departure(&self, request: RequestId) -> Option<DepartureLog> {
        self.staged
            .iter()
            .rev()
            .find_map(|write| match write {
                StagedWrite::PutDeparture(log) if log.request == request => Some(log.clone()),
                _ => None,
            })
            .or_else(|| self.tables.departures.get(&request).cloned())
    }

    // ------------------------------------------------------------------------
    // Staged writes
    // ------------------------------------------------------------------------

    pub fn put<S: Subject>(&mut self, request: WithdrawalRequest<S>) {
        self.put_stored(S::into_stored(request));
    }

    pub fn put_stored(&mut self, request: StoredRequest) {
        self.staged.push(StagedWrite::PutRequest(request));
    }

    /// Caller checks write-once semantics; commit overwrites nothing it did not check
    pub fn insert_decision(&mut self, decision: AuthorizationDecision) {
        self.staged.push(StagedWrite::InsertDecision(decision));
    }

    pub fn put_departure(&mut self, log: DepartureLog) {
        self.staged.push(StagedWrite::PutDeparture(log));
    }

    pub fn append_audit(&mut self, entry: AuditEntry) {
        self.staged.push(StagedWrite::Audit(entry));
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Apply every staged write, then hand audit entries to the sink
    pub fn commit(mut self) {
        let staged = std::mem::take(&mut self.staged);
        let count = staged.len();
        let mut audit_entries = Vec::new();

        for write in staged {
            match write {
                StagedWrite::PutRequest(request) => {
                    self.tables.requests.insert(request.id(), request);
                }
                StagedWrite::InsertDecision(decision) => {
                    self.tables.decisions.insert(decision.request, decision);
                }
                StagedWrite::PutDeparture(log) => {
                    self.tables.departures.insert(log.request, log);
                }
                StagedWrite::Audit(entry) => audit_entries.push(entry),
            }
        }

        // Still under the write lock, so audit order matches commit order
        for entry in &audit_entries {
            self.audit.record(entry);
        }

        self.state = TransactionState::Committed;
        debug!(writes = count, "Transaction committed");
    }

    /// Discard staged writes explicitly
    pub fn rollback(mut self) {
        self.discard();
    }

    fn discard(&mut self) {
        if !self.staged.is_empty() {
            debug!(writes = self.staged.len(), "Transaction rolled back");
        }
        self.staged.clear();
        self.state = TransactionState::RolledBack;
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.state == TransactionState::Active {
            self.discard();
        }
    }
}
