/*!
 * Withdrawal Types
 * Request rows, stamps, and creation input
 */

use super::state::RequestState;
use super::subject::{Individual, Mass, Subject};
use crate::authorization::types::AuthorizationDecision;
use crate::core::errors::{ValidationIssue, WithdrawalResult};
use crate::core::id::{ActorId, DecisionId, ReasonId, RequestId};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use time::OffsetDateTime;

/// Who did something, and when
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub actor: ActorId,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub at: OffsetDateTime,
}

impl Stamp {
    #[inline]
    pub fn new(actor: ActorId, at: OffsetDateTime) -> Self {
        Self { actor, at }
    }
}

/// Planned departure and (optionally) return
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub departure: OffsetDateTime,
    #[serde_as(as = "Option<TimestampSeconds<i64>>")]
    #[serde(default)]
    pub expected_return: Option<OffsetDateTime>,
}

impl Schedule {
    pub fn leaving_at(departure: OffsetDateTime) -> Self {
        Self {
            departure,
            expected_return: None,
        }
    }

    #[must_use]
    pub fn returning_at(mut self, expected_return: OffsetDateTime) -> Self {
        self.expected_return = Some(expected_return);
        self
    }

    pub fn validate(&self) -> WithdrawalResult<()> {
        match self.expected_return {
            Some(back) if back < self.departure => {
                Err(ValidationIssue::ReturnBeforeDeparture.into())
            }
            _ => Ok(()),
        }
    }
}

/// Why a request was cancelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    pub stamp: Stamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Creation input shared by both subject kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest<S> {
    pub subject: S,
    pub reason: ReasonId,
    pub schedule: Option<Schedule>,
    pub observation: String,
}

impl<S> NewRequest<S> {
    pub fn new(subject: S, reason: impl Into<ReasonId>, schedule: Option<Schedule>) -> Self {
        Self {
            subject,
            reason: reason.into(),
            schedule,
            observation: String::new(),
        }
    }

    #[must_use]
    pub fn with_observation(mut self, observation: impl Into<String>) -> Self {
        self.observation = observation.into();
        self
    }
}

/// Withdrawal request parametrized over its subject
///
/// `received` is stamped by the requester (the front-desk, teacher, or
/// guardian proxy who registered it); `decided` carries the supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest<S> {
    pub id: RequestId,
    pub subject: S,
    pub reason: ReasonId,
    pub schedule: Schedule,
    #[serde(default)]
    pub observation: String,
    pub state: RequestState,
    pub received: Stamp,
    #[serde(default)]
    pub derived: Option<Stamp>,
    #[serde(default)]
    pub decided: Option<Stamp>,
    #[serde(default)]
    pub decision: Option<DecisionId>,
    #[serde(default)]
    pub cancellation: Option<Cancellation>,
    /// Bumped on every committed transition
    pub version: u64,
}

impl<S> WithdrawalRequest<S> {
    /// Actor that registered the request
    #[inline]
    pub fn requester(&self) -> ActorId {
        self.received.actor
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Move to the verdict's state and link the decision row
    ///
    /// Leaves the version alone; the caller commits the transition.
    pub(crate) fn link_decision(&mut self, decision: &AuthorizationDecision) {
        self.state = decision.verdict.resulting_state();
        self.decided = Some(Stamp::new(decision.decider, decision.decided_at));
        self.decision = Some(decision.id);
    }
}

/// Request of either subject kind, as held by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoredRequest {
    Individual(WithdrawalRequest<Individual>),
    Mass(WithdrawalRequest<Mass>),
}

impl StoredRequest {
    pub fn id(&self) -> RequestId {
        match self {
            StoredRequest::Individual(r) => r.id,
            StoredRequest::Mass(r) => r.id,
        }
    }

    pub fn state(&self) -> RequestState {
        match self {
            StoredRequest::Individual(r) => r.state,
            StoredRequest::Mass(r) => r.state,
        }
    }

    pub fn decision(&self) -> Option<DecisionId> {
        match self {
            StoredRequest::Individual(r) => r.decision,
            StoredRequest::Mass(r) => r.decision,
        }
    }

    pub fn entity_type(&self) -> &'static str {
        match self {
            StoredRequest::Individual(_) => Individual::ENTITY_TYPE,
            StoredRequest::Mass(_) => Mass::ENTITY_TYPE,
        }
    }

    /// Link a decision and bump the version
    pub(crate) fn record_decision(&mut self, decision: &AuthorizationDecision) {
        match self {
            StoredRequest::Individual(r) => {
                r.link_decision(decision);
                r.version += 1;
            }
            StoredRequest::Mass(r) => {
                r.link_decision(decision);
                r.version += 1;
            }
        }
    }
}
