/*!
 * Authorization recorder tests
 */

use crate::support::*;
use pretty_assertions::assert_eq;
use student_withdrawal::{
    ConflictKind, ErrorKind, Individual, Mass, Operation, RequestState, Subject, Verdict,
    WithdrawalError,
};

#[test]
fn test_standalone_decision_moves_and_links_request() {
    let h = harness();
    let id = h.derived_individual();
    let recorder = h.workflow.recorder();

    let decision = recorder
        .create_decision(id, &supervisor(), Verdict::Approved, None)
        .unwrap();
    assert_eq!(decision.request, id);
    assert_eq!(decision.decided_at, start());
    assert_eq!(recorder.get_decision(id), Some(decision.clone()));

    let request = h.workflow.individual().get(id, &receptionist()).unwrap();
    assert_eq!(request.state, RequestState::Approved);
    assert_eq!(request.decision, Some(decision.id));
    assert_eq!(request.decided.unwrap().actor, supervisor().id);
    assert_eq!(request.version, 3);

    let entries = h.workflow.audit_log().unwrap().for_entity(&id.to_string());
    let last = entries.last().unwrap();
    assert_eq!(last.action, Operation::RecordDecision);
    assert_eq!(last.entity_type, Individual::ENTITY_TYPE);
    assert_eq!(last.before, Some(RequestState::Derived));
    assert_eq!(last.after, RequestState::Approved);
}

#[test]
fn test_standalone_decision_closes_the_request() {
    let h = harness();
    let id = h.derived_individual();
    h.workflow
        .recorder()
        .create_decision(id, &supervisor(), Verdict::Approved, None)
        .unwrap();
    let audit_before = h.audit_len();

    let individual = h.workflow.individual();
    assert_eq!(
        individual
            .decide(id, &supervisor(), Verdict::Rejected, Some("late"))
            .unwrap_err()
            .kind(),
        ErrorKind::State
    );
    assert_eq!(
        individual.cancel(id, &receptionist(), None).unwrap_err(),
        WithdrawalError::State {
            operation: Operation::Cancel,
            current: RequestState::Approved,
        }
    );
    assert_eq!(h.audit_len(), audit_before);
    assert_eq!(
        h.workflow.recorder().get_decision(id).unwrap().verdict,
        Verdict::Approved
    );
}

#[test]
fn test_standalone_rejection_of_mass_request() {
    let h = harness();
    let mass = h.workflow.mass();
    let created = mass.create(&teacher(), mass_draft(&[1, 2])).unwrap();
    mass.derive(created.id, &receptionist()).unwrap();

    let decision = h
        .workflow
        .recorder()
        .create_decision(created.id, &supervisor(), Verdict::Rejected, Some("no bus"))
        .unwrap();

    let request = mass.get(created.id, &teacher()).unwrap();
    assert_eq!(request.state, RequestState::Rejected);
    assert_eq!(request.decision, Some(decision.id));
    let last = h.workflow.audit_log().unwrap().entries().pop().unwrap();
    assert_eq!(last.entity_type, Mass::ENTITY_TYPE);
}

#[test]
fn test_second_decision_conflicts_and_keeps_first() {
    let h = harness();
    let id = h.derived_individual();
    let recorder = h.workflow.recorder();

    let first = recorder
        .create_decision(id, &supervisor(), Verdict::Rejected, Some("no guardian id"))
        .unwrap();
    let audit_before = h.audit_len();

    let err = recorder
        .create_decision(id, &supervisor(), Verdict::Approved, None)
        .unwrap_err();
    assert_eq!(err, WithdrawalError::Conflict(ConflictKind::DecisionExists { request: id }));
    assert_eq!(recorder.get_decision(id), Some(first));
    assert_eq!(h.audit_len(), audit_before);
}

#[test]
fn test_decision_after_lifecycle_decide_conflicts() {
    let h = harness();
    let id = h.approved_individual();
    let err = h
        .workflow
        .recorder()
        .create_decision(id, &supervisor(), Verdict::Approved, None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn test_decision_needs_derived_request() {
    let h = harness();
    let created = h
        .workflow
        .individual()
        .create(&receptionist(), individual_draft(9))
        .unwrap();
    let err = h
        .workflow
        .recorder()
        .create_decision(created.id, &supervisor(), Verdict::Approved, None)
        .unwrap_err();
    assert_eq!(
        err,
        WithdrawalError::State {
            operation: Operation::RecordDecision,
            current: RequestState::Received,
        }
    );
}

#[test]
fn test_decision_requires_permission_and_justification() {
    let h = harness();
    let id = h.derived_individual();
    let recorder = h.workflow.recorder();

    assert_eq!(
        recorder
            .create_decision(id, &receptionist(), Verdict::Approved, None)
            .unwrap_err()
            .kind(),
        ErrorKind::Authorization
    );
    assert_eq!(
        recorder
            .create_decision(id, &supervisor(), Verdict::Rejected, Some(" "))
            .unwrap_err()
            .kind(),
        ErrorKind::Validation
    );
    assert!(recorder.get_decision(id).is_none());
}
