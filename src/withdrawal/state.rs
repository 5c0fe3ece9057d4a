/*!
 * Request State Machine
 * The one transition graph shared by individual and mass requests
 *
 * ```text
 * received ──derive──▶ derived ──approve──▶ approved
 *    │                    │    └─reject───▶ rejected
 *    └──cancel──▶ cancelled ◀──cancel──┘
 * ```
 */

use crate::core::errors::{Operation, WithdrawalError, WithdrawalResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    /// Registered at the front desk
    Received,
    /// Handed to a supervising approver
    Derived,
    Approved,
    Rejected,
    Cancelled,
}

/// Edge of the state graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Derive,
    Approve,
    Reject,
    Cancel,
}

impl RequestState {
    pub const ALL: [RequestState; 5] = [
        RequestState::Received,
        RequestState::Derived,
        RequestState::Approved,
        RequestState::Rejected,
        RequestState::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            RequestState::Received => "received",
            RequestState::Derived => "derived",
            RequestState::Approved => "approved",
            RequestState::Rejected => "rejected",
            RequestState::Cancelled => "cancelled",
        }
    }

    /// No edge leaves a terminal state
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestState::Approved | RequestState::Rejected | RequestState::Cancelled
        )
    }

    /// Target state of `transition`, or `None` if the edge does not exist
    #[inline]
    #[must_use]
    pub const fn next(&self, transition: Transition) -> Option<RequestState> {
        match (self, transition) {
            (RequestState::Received, Transition::Derive) => Some(RequestState::Derived),
            (RequestState::Derived, Transition::Approve) => Some(RequestState::Approved),
            (RequestState::Derived, Transition::Reject) => Some(RequestState::Rejected),
            (RequestState::Received | RequestState::Derived, Transition::Cancel) => {
                Some(RequestState::Cancelled)
            }
            _ => None,
        }
    }

    /// Apply `transition`, failing with a state error attributed to `operation`
    pub fn apply(&self, transition: Transition, operation: Operation) -> WithdrawalResult<RequestState> {
        self.next(transition)
            .ok_or_else(|| WithdrawalError::state(operation, *self))
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Transition {
    pub const ALL: [Transition; 4] = [
        Transition::Derive,
        Transition::Approve,
        Transition::Reject,
        Transition::Cancel,
    ];
}
