/*!
 * Workflow Store
 * In-memory rows for requests, decisions, and departure logs
 */

use super::transaction::Transaction;
use crate::audit::AuditSink;
use crate::authorization::types::AuthorizationDecision;
use crate::core::id::RequestId;
use crate::withdrawal::departure::DepartureLog;
use crate::withdrawal::state::RequestState;
use crate::withdrawal::subject::Subject;
use crate::withdrawal::types::{StoredRequest, WithdrawalRequest};
use ahash::RandomState;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Committed rows
#[derive(Default)]
pub struct Tables {
    pub(super) requests: HashMap<RequestId, StoredRequest, RandomState>,
    pub(super) decisions: HashMap<RequestId, AuthorizationDecision, RandomState>,
    pub(super) departures: HashMap<RequestId, DepartureLog, RandomState>,
}

/// Shared store handle
///
/// Cloning is cheap; all clones see the same rows and feed the same audit sink.
#[derive(Clone)]
pub struct Store {
    tables: Arc<RwLock<Tables>>,
    audit: Arc<dyn AuditSink>,
}

impl Store {
    pub fn new(audit: Arc<dyn AuditSink>) -> Self {
        info!("Withdrawal store initialized");
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            audit,
        }
    }

    /// Open a transaction; blocks while another one is open
    pub fn begin(&self) -> Transaction<'_> {
        Transaction::begin(self.tables.write(), self.audit.as_ref())
    }

    pub fn stored_request(&self, id: RequestId) -> Option<StoredRequest> {
        self.tables.read().requests.get(&id).cloned()
    }

    pub fn request<S: Subject>(&self, id: RequestId) -> Option<WithdrawalRequest<S>> {
        let tables = self.tables.read();
        tables.requests.get(&id).and_then(S::from_stored).cloned()
    }

    /// Requests of one subject kind in a state, oldest first
    pub fn requests_in_state<S: Subject>(&self, state: RequestState) -> Vec<WithdrawalRequest<S>> {
        let tables = self.tables.read();
        let mut matching: Vec<_> = tables
            .requests
            .values()
            .filter_map(S::from_stored)
            .filter(|request| request.state == state)
            .cloned()
            .collect();
        matching.sort_by_key(|request| request.received.at);
        matching
    }

    pub fn decision(&self, request: RequestId) -> Option<AuthorizationDecision> {
        self.tables.read().decisions.get(&request).cloned()
    }

    pub fn departure(&self, request: RequestId) -> Option<DepartureLog> {
        self.tables.read().departures.get(&request).cloned()
    }

    pub fn stats(&self) -> StoreStats {
        let tables = self.tables.read();
        StoreStats {
            requests: tables.requests.len(),
            decisions: tables.decisions.len(),
            departures: tables.departures.len(),
        }
    }
}

/// Row counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub requests: usize,
    pub decisions: usize,
    pub departures: usize,
}
