/*!
 * Request lifecycle integration tests
 */

use crate::support::*;
use pretty_assertions::assert_eq;
use student_withdrawal::withdrawal::{RequestDetail, DEPARTURE_ENTITY_TYPE};
use student_withdrawal::{
    ErrorKind, Individual, Mass, NewRequest, Operation, RequestId, RequestState, StudentId, Subject,
    ValidationIssue, Verdict, WithdrawalError,
};

#[test]
fn test_create_stamps_requester_and_audits() {
    let h = harness();
    let created = h
        .workflow
        .individual()
        .create(&teacher(), individual_draft(2).with_observation("  fever  "))
        .unwrap();

    assert_eq!(created.received.actor, teacher().id);
    assert_eq!(created.received.at, start());
    assert_eq!(created.observation, "fever");
    assert_eq!(created.version, 1);
    assert!(created.decided.is_none());

    let entries = h.workflow.audit_log().unwrap().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, Operation::Create);
    assert_eq!(entries[0].entity_type, Individual::ENTITY_TYPE);
    assert_eq!(entries[0].before, None);
    assert_eq!(entries[0].after, RequestState::Received);
}

#[test]
fn test_create_validation_failures() {
    let h = harness();
    let individual = h.workflow.individual();

    let unknown_student = individual
        .create(&receptionist(), individual_draft(404))
        .unwrap_err();
    assert_eq!(
        unknown_student,
        WithdrawalError::Validation(ValidationIssue::UnknownStudent {
            student: 404u64.into()
        })
    );

    let unknown_guardian = individual
        .create(
            &receptionist(),
            NewRequest::new(Individual::new(1u64, 9u64), GRAVE_REASON, Some(schedule())),
        )
        .unwrap_err();
    assert_eq!(unknown_guardian.kind(), ErrorKind::Validation);

    let retired = individual
        .create(
            &receptionist(),
            NewRequest::new(Individual::new(1u64, GUARDIAN), RETIRED_REASON, Some(schedule())),
        )
        .unwrap_err();
    assert_eq!(
        retired,
        WithdrawalError::Validation(ValidationIssue::InactiveReason {
            reason: RETIRED_REASON.into()
        })
    );

    let unknown_reason = individual
        .create(
            &receptionist(),
            NewRequest::new(Individual::new(1u64, GUARDIAN), 77u64, Some(schedule())),
        )
        .unwrap_err();
    assert_eq!(
        unknown_reason,
        WithdrawalError::Validation(ValidationIssue::UnknownReason { reason: 77u64.into() })
    );

    assert_eq!(h.audit_len(), 0);
    assert_eq!(h.workflow.stats().requests, 0);
}

#[test]
fn test_create_requires_permission_before_validation() {
    let h = harness();
    let err = h
        .workflow
        .individual()
        .create(&outsider(), individual_draft(404))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
}

#[test]
fn test_mass_create_rules() {
    let h = harness();
    let mass = h.workflow.mass();

    let empty = mass
        .create(&teacher(), NewRequest::new(Mass::new(Vec::<u64>::new(), "ref"), MINOR_REASON, Some(schedule())))
        .unwrap_err();
    assert_eq!(empty, WithdrawalError::Validation(ValidationIssue::EmptyStudentList));

    let duplicate = mass.create(&teacher(), mass_draft(&[1, 2, 1])).unwrap_err();
    assert_eq!(
        duplicate,
        WithdrawalError::Validation(ValidationIssue::DuplicateStudent {
            student: 1u64.into()
        })
    );

    let no_evidence = mass
        .create(&teacher(), NewRequest::new(Mass::new([1u64], "   "), MINOR_REASON, Some(schedule())))
        .unwrap_err();
    assert_eq!(no_evidence, WithdrawalError::Validation(ValidationIssue::MissingEvidence));

    let details = vec![
        RequestDetail::new(4u64).with_note("asthma inhaler"),
        RequestDetail::new(6u64),
    ];
    let created = mass
        .create(
            &teacher(),
            NewRequest::new(Mass::from_details(details.clone(), "slip-88"), MINOR_REASON, Some(schedule())),
        )
        .unwrap();
    assert_eq!(created.subject.details, details);
    assert_eq!(h.audit_len(), 1);
}

#[test]
fn test_schedule_rules() {
    let h = harness();
    let individual = h.workflow.individual();

    let missing = individual
        .create(
            &receptionist(),
            NewRequest::new(Individual::new(1u64, GUARDIAN), GRAVE_REASON, None),
        )
        .unwrap_err();
    assert_eq!(missing, WithdrawalError::Validation(ValidationIssue::MissingSchedule));

    let backwards = student_withdrawal::Schedule::leaving_at(start() + time::Duration::hours(4))
        .returning_at(start());
    let err = individual
        .create(
            &receptionist(),
            NewRequest::new(Individual::new(1u64, GUARDIAN), GRAVE_REASON, Some(backwards)),
        )
        .unwrap_err();
    assert_eq!(err, WithdrawalError::Validation(ValidationIssue::ReturnBeforeDeparture));
}

#[test]
fn test_derive_twice_is_state_error() {
    let h = harness();
    let id = h.derived_individual();
    let err = h
        .workflow
        .individual()
        .derive(id, &receptionist())
        .unwrap_err();
    assert_eq!(
        err,
        WithdrawalError::State {
            operation: Operation::Derive,
            current: RequestState::Derived,
        }
    );
}

#[test]
fn test_derive_requires_permission() {
    let h = harness();
    let individual = h.workflow.individual();
    let created = individual.create(&teacher(), individual_draft(3)).unwrap();

    let err = individual.derive(created.id, &teacher()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert_eq!(
        individual.get(created.id, &teacher()).unwrap().state,
        RequestState::Received
    );
}

#[test]
fn test_rejection_with_justification() {
    let h = harness();
    let id = h.derived_individual();
    let rejected = h
        .workflow
        .individual()
        .decide(id, &supervisor(), Verdict::Rejected, Some("guardian not on file"))
        .unwrap();
    assert_eq!(rejected.state, RequestState::Rejected);
    assert!(rejected.is_terminal());

    let decision = h.workflow.recorder().get_decision(id).unwrap();
    assert_eq!(decision.verdict, Verdict::Rejected);
    assert_eq!(decision.decider, supervisor().id);
    assert_eq!(decision.justification.as_deref(), Some("guardian not on file"));
}

#[test]
fn test_cancel_rules() {
    let h = harness();
    let individual = h.workflow.individual();

    let created = individual.create(&teacher(), individual_draft(5)).unwrap();
    let err = individual.cancel(created.id, &supervisor(), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let cancelled = individual.cancel(created.id, &administrator(), None).unwrap();
    assert_eq!(cancelled.state, RequestState::Cancelled);
    let stamp = cancelled.cancellation.unwrap();
    assert_eq!(stamp.stamp.actor, administrator().id);
    assert_eq!(stamp.reason, None);

    let derived = h.derived_individual();
    let by_owner = individual.cancel(derived, &receptionist(), Some("picked up later")).unwrap();
    assert_eq!(by_owner.state, RequestState::Cancelled);
}

#[test]
fn test_terminal_requests_reject_everything() {
    let h = harness();
    let individual = h.workflow.individual();
    let id = h.approved_individual();

    assert_eq!(individual.derive(id, &receptionist()).unwrap_err().kind(), ErrorKind::State);
    assert_eq!(
        individual
            .decide(id, &supervisor(), Verdict::Approved, None)
            .unwrap_err()
            .kind(),
        ErrorKind::State
    );
    assert_eq!(individual.cancel(id, &receptionist(), None).unwrap_err().kind(), ErrorKind::State);
}

#[test]
fn test_unknown_request_not_found() {
    let h = harness();
    let missing = RequestId::new();
    assert_eq!(
        h.workflow.individual().derive(missing, &receptionist()).unwrap_err(),
        WithdrawalError::NotFound { request: missing }
    );
    assert_eq!(
        h.workflow.mass().cancel(missing, &administrator(), None).unwrap_err(),
        WithdrawalError::NotFound { request: missing }
    );
}

#[test]
fn test_get_and_list_visibility() {
    let h = harness();
    let individual = h.workflow.individual();
    let first = individual.create(&teacher(), individual_draft(1)).unwrap();
    h.clock.advance(time::Duration::minutes(1));
    let second = individual.create(&receptionist(), individual_draft(2)).unwrap();
    individual.derive(second.id, &receptionist()).unwrap();

    // requester reads own request without view capability
    assert!(individual.get(first.id, &teacher()).is_ok());
    assert_eq!(
        individual.get(second.id, &teacher()).unwrap_err().kind(),
        ErrorKind::Authorization
    );
    assert!(individual.get(second.id, &administrator()).is_ok());

    let received = individual
        .list_in_state(&administrator(), RequestState::Received)
        .unwrap();
    assert_eq!(received.iter().map(|r| r.id).collect::<Vec<_>>(), vec![first.id]);

    let derived = individual
        .list_in_state(&administrator(), RequestState::Derived)
        .unwrap();
    assert_eq!(derived.len(), 1);
    assert!(h
        .workflow
        .mass()
        .list_in_state(&administrator(), RequestState::Derived)
        .unwrap()
        .is_empty());

    assert_eq!(
        individual
            .list_in_state(&outsider(), RequestState::Received)
            .unwrap_err()
            .kind(),
        ErrorKind::Authorization
    );
}

#[test]
fn test_departure_requires_approval_and_is_write_once() {
    let h = harness();
    let individual = h.workflow.individual();

    let id = h.derived_individual();
    assert_eq!(
        individual
            .register_departure(id, &receptionist(), start())
            .unwrap_err()
            .kind(),
        ErrorKind::State
    );

    individual
        .decide(id, &supervisor(), Verdict::Approved, None)
        .unwrap();

    let no_departure = individual
        .register_return(id, &receptionist(), start())
        .unwrap_err();
    assert_eq!(
        no_departure,
        WithdrawalError::Validation(ValidationIssue::NoDepartureRecorded { request: id })
    );

    let log = individual
        .register_departure(id, &receptionist(), start())
        .unwrap();
    assert_eq!(log.students, vec![StudentId(1)]);
    assert_eq!(log.recorded_by, receptionist().id);

    assert_eq!(
        individual
            .register_departure(id, &receptionist(), start())
            .unwrap_err()
            .kind(),
        ErrorKind::Conflict
    );

    individual
        .register_return(id, &receptionist(), start() + time::Duration::hours(1))
        .unwrap();
    assert_eq!(
        individual
            .register_return(id, &receptionist(), start() + time::Duration::hours(2))
            .unwrap_err()
            .kind(),
        ErrorKind::Conflict
    );

    let departure_entries = h.workflow.audit_log().unwrap().for_entity(&log.id.to_string());
    assert_eq!(departure_entries.len(), 2);
    assert!(departure_entries
        .iter()
        .all(|entry| entry.entity_type == DEPARTURE_ENTITY_TYPE && !entry.is_state_change()));
}

#[test]
fn test_departure_requires_permission() {
    let h = harness();
    let id = h.approved_individual();
    let err = h
        .workflow
        .individual()
        .register_departure(id, &teacher(), start())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert!(h.workflow.individual().departure(id).is_none());
}

#[test]
fn test_racing_derives_have_one_winner() {
    const RACERS: usize = 8;

    let h = harness();
    let id = h
        .workflow
        .individual()
        .create(&receptionist(), individual_draft(7))
        .unwrap()
        .id;

    let barrier = std::sync::Arc::new(std::sync::Barrier::new(RACERS));
    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let individual = h.workflow.individual().clone();
            let barrier = std::sync::Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                individual.derive(id, &receptionist())
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    let losers = results
        .iter()
        .filter(|r| matches!(r, Err(err) if err.kind() == ErrorKind::State))
        .count();
    assert_eq!(winners, 1);
    assert_eq!(losers, RACERS - 1);

    let stored = h.workflow.individual().get(id, &receptionist()).unwrap();
    assert_eq!(stored.state, RequestState::Derived);
    assert_eq!(stored.version, 2);
    assert_eq!(h.audit_len(), 2);
}
