/*!
 * Authorization Types
 */

use crate::core::id::{ActorId, DecisionId, RequestId};
use crate::withdrawal::state::{RequestState, Transition};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use std::fmt;
use time::OffsetDateTime;

/// Supervisor verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    #[inline]
    pub const fn transition(&self) -> Transition {
        match self {
            Verdict::Approved => Transition::Approve,
            Verdict::Rejected => Transition::Reject,
        }
    }

    #[inline]
    pub const fn resulting_state(&self) -> RequestState {
        match self {
            Verdict::Approved => RequestState::Approved,
            Verdict::Rejected => RequestState::Rejected,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Approved => f.write_str("approved"),
            Verdict::Rejected => f.write_str("rejected"),
        }
    }
}

/// The single decision row attached to a request
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationDecision {
    pub id: DecisionId,
    pub request: RequestId,
    pub decider: ActorId,
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub decided_at: OffsetDateTime,
}
