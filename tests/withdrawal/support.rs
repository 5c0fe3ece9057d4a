/*!
 * Shared fixtures for workflow tests
 */

use std::sync::Arc;
use student_withdrawal::{
    Actor, Individual, InMemoryCatalog, ManualClock, Mass, NewRequest, RequestId, Role, Schedule,
    Severity, WithdrawalReason, Workflow,
};
use time::macros::datetime;
use time::OffsetDateTime;

pub const GRAVE_REASON: u64 = 1;
pub const MINOR_REASON: u64 = 2;
pub const RETIRED_REASON: u64 = 3;
pub const GUARDIAN: u64 = 500;

pub struct Harness {
    pub workflow: Workflow,
    pub catalog: Arc<InMemoryCatalog>,
    pub clock: Arc<ManualClock>,
}

pub fn start() -> OffsetDateTime {
    datetime!(2024-10-07 08:00 UTC)
}

/// Catalog with students 1..=20, one guardian, and three reasons
pub fn harness() -> Harness {
    harness_with(|builder| builder)
}

pub fn harness_with(
    configure: impl FnOnce(student_withdrawal::WorkflowBuilder) -> student_withdrawal::WorkflowBuilder,
) -> Harness {
    let catalog = Arc::new(InMemoryCatalog::new());
    for id in 1u64..=20 {
        catalog.add_student(id, format!("Student {id}"));
    }
    catalog.add_guardian(GUARDIAN, "María González");
    catalog.add_reason(WithdrawalReason::new(GRAVE_REASON, "Medical emergency", Severity::Serious));
    catalog.add_reason(WithdrawalReason::new(MINOR_REASON, "Dentist appointment", Severity::Minor));
    let mut retired = WithdrawalReason::new(RETIRED_REASON, "Old reason", Severity::Minor);
    retired.active = false;
    catalog.add_reason(retired);

    let clock = Arc::new(ManualClock::new(start()));
    let builder = Workflow::builder(catalog.clone()).with_clock(clock.clone());
    let workflow = configure(builder).build();

    Harness {
        workflow,
        catalog,
        clock,
    }
}

pub fn receptionist() -> Actor {
    Actor::new(10u64, "Front desk").with_role(Role::new("reception"))
}

pub fn teacher() -> Actor {
    Actor::new(11u64, "Homeroom teacher").with_role(Role::new("teacher"))
}

pub fn supervisor() -> Actor {
    Actor::new(20u64, "Inspector").with_role(Role::new("supervisor"))
}

pub fn administrator() -> Actor {
    Actor::administrator(1u64, "Principal")
}

pub fn outsider() -> Actor {
    Actor::new(99u64, "Visitor")
}

pub fn schedule() -> Schedule {
    Schedule::leaving_at(datetime!(2024-10-07 11:30 UTC))
        .returning_at(datetime!(2024-10-07 13:00 UTC))
}

pub fn individual_draft(student: u64) -> NewRequest<Individual> {
    NewRequest::new(Individual::new(student, GUARDIAN), GRAVE_REASON, Some(schedule()))
}

pub fn mass_draft(students: &[u64]) -> NewRequest<Mass> {
    NewRequest::new(
        Mass::new(students.iter().copied(), "https://x/y.jpg"),
        MINOR_REASON,
        Some(schedule()),
    )
}

impl Harness {
    pub fn audit_len(&self) -> usize {
        self.workflow.audit_log().map(|log| log.len()).unwrap_or(0)
    }

    pub fn derived_individual(&self) -> RequestId {
        let individual = self.workflow.individual();
        let request = individual
            .create(&receptionist(), individual_draft(1))
            .unwrap();
        individual.derive(request.id, &receptionist()).unwrap();
        request.id
    }

    pub fn approved_individual(&self) -> RequestId {
        let id = self.derived_individual();
        self.workflow
            .individual()
            .decide(id, &supervisor(), student_withdrawal::Verdict::Approved, None)
            .unwrap();
        id
    }
}

impl Harness {
    pub fn clock_now(&self) -> OffsetDateTime {
        use student_withdrawal::Clock;
        self.clock.now()
    }

    pub fn catalog_reason_severity(&self, reason: u64) -> Severity {
        use student_withdrawal::Catalog;
        self.catalog
            .reason(reason.into())
            .map(|entry| entry.severity)
            .unwrap()
    }
}
