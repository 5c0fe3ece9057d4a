/*!
 * Error Types
 * Workflow failure taxonomy with thiserror, miette, and serde support
 */

use super::id::{ActorId, GuardianId, ReasonId, RequestId, StudentId};
use crate::withdrawal::state::RequestState;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for workflow operations
pub type WithdrawalResult<T> = Result<T, WithdrawalError>;

/// Workflow operation named in state errors and audit entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Derive,
    Decide,
    Cancel,
    RecordDecision,
    RegisterDeparture,
    RegisterReturn,
}

impl Operation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Derive => "derive",
            Operation::Decide => "decide",
            Operation::Cancel => "cancel",
            Operation::RecordDecision => "record_decision",
            Operation::RegisterDeparture => "register_departure",
            Operation::RegisterReturn => "register_return",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Malformed or missing input detected before any mutation
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("reason {reason} does not exist")]
    UnknownReason { reason: ReasonId },

    #[error("reason {reason} is inactive")]
    InactiveReason { reason: ReasonId },

    #[error("student {student} does not exist")]
    UnknownStudent { student: StudentId },

    #[error("guardian {guardian} does not exist")]
    UnknownGuardian { guardian: GuardianId },

    #[error("departure schedule is missing")]
    MissingSchedule,

    #[error("expected return precedes departure")]
    ReturnBeforeDeparture,

    #[error("student list is empty")]
    EmptyStudentList,

    #[error("student {student} is listed more than once")]
    DuplicateStudent { student: StudentId },

    #[error("evidence reference is missing")]
    MissingEvidence,

    #[error("a rejection requires a justification")]
    MissingJustification,

    #[error("no departure recorded for request {request}")]
    NoDepartureRecorded { request: RequestId },
}

/// Row that already exists and may not be overwritten
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "conflict", rename_all = "snake_case")]
pub enum ConflictKind {
    #[error("request {request} already has a decision")]
    DecisionExists { request: RequestId },

    #[error("departure for request {request} already recorded")]
    DepartureExists { request: RequestId },

    #[error("return for request {request} already recorded")]
    ReturnRecorded { request: RequestId },
}

/// Coarse classification of a workflow failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    State,
    Authorization,
    Conflict,
    NotFound,
}

/// Workflow errors
///
/// Every variant is deterministic: repeating the call with the same inputs
/// against the same state yields the same error, and none of them leave a
/// visible side effect behind.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum WithdrawalError {
    #[error("Validation failed: {0}")]
    #[diagnostic(
        code(withdrawal::validation),
        help("Correct the submitted fields; nothing was changed.")
    )]
    Validation(ValidationIssue),

    #[error("Cannot {operation} a request in state {current}")]
    #[diagnostic(
        code(withdrawal::invalid_state),
        help("Reload the request; it may have been handled by someone else.")
    )]
    State {
        operation: Operation,
        current: RequestState,
    },

    #[error("Actor {actor} is not allowed to {action}")]
    #[diagnostic(
        code(withdrawal::unauthorized),
        help("Ask an administrator to grant a role that permits this action.")
    )]
    Authorization { actor: ActorId, action: String },

    #[error("Conflict: {0}")]
    #[diagnostic(
        code(withdrawal::conflict),
        help("The record is write-once; read the existing row instead.")
    )]
    Conflict(ConflictKind),

    #[error("Request {request} not found")]
    #[diagnostic(code(withdrawal::not_found))]
    NotFound { request: RequestId },
}

impl WithdrawalError {
    #[inline]
    pub fn validation(issue: ValidationIssue) -> Self {
        WithdrawalError::Validation(issue)
    }

    #[inline]
    pub fn state(operation: Operation, current: RequestState) -> Self {
        WithdrawalError::State { operation, current }
    }

    #[inline]
    pub fn unauthorized(actor: ActorId, action: impl Into<String>) -> Self {
        WithdrawalError::Authorization {
            actor,
            action: action.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WithdrawalError::Validation(_) => ErrorKind::Validation,
            WithdrawalError::State { .. } => ErrorKind::State,
            WithdrawalError::Authorization { .. } => ErrorKind::Authorization,
            WithdrawalError::Conflict(_) => ErrorKind::Conflict,
            WithdrawalError::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// None of the workflow failures change by retrying
    pub const fn is_retryable(&self) -> bool {
        false
    }
}

impl From<ValidationIssue> for WithdrawalError {
    fn from(issue: ValidationIssue) -> Self {
        WithdrawalError::Validation(issue)
    }
}

impl From<ConflictKind> for WithdrawalError {
    fn from(conflict: ConflictKind) -> Self {
        WithdrawalError::Conflict(conflict)
    }
}
