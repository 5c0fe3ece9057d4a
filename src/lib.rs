/*!
 * Student Withdrawal Library
 * Early-withdrawal approval workflow: permissions, request lifecycle,
 * supervisor decisions, and the audit trail
 */

pub mod audit;
pub mod authorization;
pub mod catalog;
pub mod config;
pub mod core;
pub mod permissions;
pub mod storage;
pub mod telemetry;
pub mod withdrawal;

// Re-exports
pub use audit::{AuditEntry, AuditLog, AuditSink, AuditStats};
pub use authorization::{AuthorizationDecision, AuthorizationRecorder, Verdict};
pub use catalog::{Catalog, InMemoryCatalog, Severity, WithdrawalReason};
pub use config::{ConfigError, TelemetryConfig, WithdrawalConfig};
pub use crate::core::{
    ActorId, Clock, ConflictKind, DecisionId, DepartureId, ErrorKind, GuardianId, ManualClock, Operation,
    ReasonId, RequestId, StudentId, SystemClock, ValidationIssue, WithdrawalError,
    WithdrawalResult,
};
pub use permissions::{
    actions, roles, ActionPolicy, ActionRule, Actor, CapabilityKind, PermissionChecker,
    PermissionResolver, Role,
};
pub use storage::{Store, StoreStats};
pub use telemetry::init_tracing;
pub use withdrawal::{
    DepartureLog, Individual, IndividualLifecycle, Mass, MassLifecycle, NewRequest,
    RequestLifecycle, RequestState, Schedule, Subject, WithdrawalRequest, Workflow,
    WorkflowBuilder,
};
