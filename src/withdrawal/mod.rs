/*!
 * Withdrawal Module
 * Request lifecycle for individual and mass early withdrawals
 */

pub mod departure;
pub mod lifecycle;
pub mod state;
pub mod subject;
pub mod types;
pub mod workflow;
pub mod workflow_builder;

pub use departure::DepartureLog;
pub use lifecycle::{RequestLifecycle, DEPARTURE_ENTITY_TYPE};
pub use state::{RequestState, Transition};
pub use subject::{EvidenceRef, Individual, Mass, RequestDetail, Subject};
pub use types::{Cancellation, NewRequest, Schedule, Stamp, StoredRequest, WithdrawalRequest};
pub use workflow::{IndividualLifecycle, MassLifecycle, Workflow};
pub use workflow_builder::WorkflowBuilder;
