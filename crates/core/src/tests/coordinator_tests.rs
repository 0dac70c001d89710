// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Enrollment transaction coordinator tests.

use cert_roster_domain::{DomainError, EnrollmentStatus, Role, RosterLifecycle};

use crate::coordinator::{EnrollmentRequest, enroll_student};
use crate::error::CoreError;
use crate::saga::{StepName, TOTAL_STEPS};
use crate::tests::helpers::{FailingSink, Fixture};

fn registrar_request(roster_id: i64, student_id: i64) -> EnrollmentRequest {
    EnrollmentRequest::standard(
        roster_id,
        student_id,
        String::from("registrar-1"),
        Role::Registrar,
    )
}

#[test]
fn test_nominal_enrollment_with_open_capacity() {
    let (mut fixture, roster_id, student_ids) = Fixture::with_roster(Some(20), 16);
    fixture.seed_enrolled(roster_id, &student_ids[..15]);

    let request = registrar_request(roster_id, student_ids[15]);
    let outcome = enroll_student(&mut fixture.ctx(), &request).expect("Enrollment should succeed");

    assert_eq!(outcome.status, EnrollmentStatus::Enrolled);
    assert_eq!(outcome.steps_completed, TOTAL_STEPS);
    assert_eq!(outcome.total_steps, TOTAL_STEPS);
    assert_eq!(outcome.capacity_before.current_enrollment, 15);
    assert_eq!(outcome.capacity_after.current_enrollment, 16);
    assert_eq!(outcome.capacity_after.available_spots, Some(4));

    // Side effects landed: row, notification, audit entry.
    let record = fixture
        .store
        .get_enrollment(outcome.enrollment_id)
        .expect("Failed to query")
        .expect("Row should exist");
    assert_eq!(record.status, EnrollmentStatus::Enrolled);

    let notifications = fixture
        .store
        .get_notifications_for_student(student_ids[15])
        .expect("Failed to query notifications");
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Enrollment Confirmed");

    let trail = fixture
        .store
        .get_audit_entries_for_roster(roster_id)
        .expect("Failed to query audit trail");
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, "student_enrolled");

    // Transaction finished, nothing left in flight.
    assert_eq!(fixture.registry.in_flight(), 0);
}

#[test]
fn test_full_roster_fails_with_capacity_exceeded() {
    let (mut fixture, roster_id, student_ids) = Fixture::with_roster(Some(20), 21);
    fixture.seed_enrolled(roster_id, &student_ids[..20]);

    let request = registrar_request(roster_id, student_ids[20]);
    let failure =
        enroll_student(&mut fixture.ctx(), &request).expect_err("Full roster must reject");

    assert_eq!(failure.failed_step, Some(StepName::ValidateCapacity));
    assert_eq!(failure.steps_completed, 0);
    assert!(failure.rolled_back);
    match failure.error {
        CoreError::Domain(DomainError::CapacityExceeded {
            max_capacity,
            current_enrollment,
            ..
        }) => {
            assert_eq!(max_capacity, 20);
            assert_eq!(current_enrollment, 20);
        }
        other => panic!("Expected CapacityExceeded, got {other:?}"),
    }

    assert!(
        fixture
            .store
            .find_enrollment(roster_id, student_ids[20])
            .expect("Failed to query")
            .is_none()
    );
}

#[test]
fn test_forced_enrollment_on_full_roster_by_administrator() {
    let (mut fixture, roster_id, student_ids) = Fixture::with_roster(Some(20), 21);
    fixture.seed_enrolled(roster_id, &student_ids[..20]);

    let mut request = registrar_request(roster_id, student_ids[20]);
    request.role = Role::Administrator;
    request.force = true;

    let outcome = enroll_student(&mut fixture.ctx(), &request).expect("Force should succeed");
    assert_eq!(outcome.status, EnrollmentStatus::Enrolled);
    assert_eq!(outcome.capacity_after.current_enrollment, 21);
    assert_eq!(outcome.capacity_after.available_spots, Some(0));
    assert_eq!(outcome.capacity_after.utilization_percent(), Some(105));
}

#[test]
fn test_force_by_non_administrator_rejected_before_any_step() {
    // A roster id that does not exist: the permission check must fire
    // before any read would discover that.
    let (mut fixture, _, student_ids) = Fixture::with_roster(Some(20), 1);

    let mut request = registrar_request(999_999, student_ids[0]);
    request.force = true;

    let failure = enroll_student(&mut fixture.ctx(), &request)
        .expect_err("Unprivileged force must reject");
    assert_eq!(failure.failed_step, None);
    assert_eq!(failure.steps_completed, 0);
    match failure.error {
        CoreError::Domain(DomainError::InsufficientPermissions {
            action, required, ..
        }) => {
            assert_eq!(action, "force_enrollment");
            assert_eq!(required, Role::Administrator);
        }
        other => panic!("Expected InsufficientPermissions, got {other:?}"),
    }
}

#[test]
fn test_role_below_enrollment_floor_is_rejected() {
    let (mut fixture, roster_id, student_ids) = Fixture::with_roster(Some(20), 1);

    let mut request = registrar_request(roster_id, student_ids[0]);
    request.role = Role::Instructor;

    let failure =
        enroll_student(&mut fixture.ctx(), &request).expect_err("Low role must reject");
    assert_eq!(failure.failed_step, None);
    assert!(matches!(
        failure.error,
        CoreError::Domain(DomainError::InsufficientPermissions {
            action: "enroll_student",
            ..
        })
    ));
}

#[test]
fn test_duplicate_enrollment_reports_existing_status() {
    let (mut fixture, roster_id, student_ids) = Fixture::with_roster(Some(20), 1);

    let request = registrar_request(roster_id, student_ids[0]);
    enroll_student(&mut fixture.ctx(), &request).expect("First attempt should succeed");

    let failure =
        enroll_student(&mut fixture.ctx(), &request).expect_err("Duplicate must reject");
    assert_eq!(failure.failed_step, Some(StepName::CheckDuplicate));
    assert_eq!(failure.steps_completed, 1);
    match failure.error {
        CoreError::Domain(DomainError::AlreadyEnrolled { status, .. }) => {
            assert_eq!(status, EnrollmentStatus::Enrolled);
        }
        other => panic!("Expected AlreadyEnrolled, got {other:?}"),
    }
}

#[test]
fn test_duplicate_detection_covers_waitlisted_rows() {
    let (mut fixture, roster_id, student_ids) = Fixture::with_roster(Some(20), 1);
    let at = crate::tests::helpers::base_instant();
    fixture.seed_waitlisted(roster_id, student_ids[0], at);

    let request = registrar_request(roster_id, student_ids[0]);
    let failure =
        enroll_student(&mut fixture.ctx(), &request).expect_err("Duplicate must reject");
    match failure.error {
        CoreError::Domain(DomainError::AlreadyEnrolled { status, .. }) => {
            assert_eq!(status, EnrollmentStatus::Waitlisted);
        }
        other => panic!("Expected AlreadyEnrolled, got {other:?}"),
    }
}

#[test]
fn test_unknown_student_fails_validation_step() {
    let (mut fixture, roster_id, _) = Fixture::with_roster(Some(20), 0);

    let request = registrar_request(roster_id, 777);
    let failure =
        enroll_student(&mut fixture.ctx(), &request).expect_err("Unknown student must reject");
    assert_eq!(failure.failed_step, Some(StepName::ValidateStudent));
    assert_eq!(failure.steps_completed, 2);
    assert!(failure.rolled_back);
    assert!(matches!(
        failure.error,
        CoreError::Domain(DomainError::StudentNotFound(777))
    ));
}

#[test]
fn test_inactive_roster_rejects_enrollment() {
    let (mut fixture, roster_id, student_ids) = Fixture::with_roster(Some(20), 1);
    fixture
        .store
        .set_roster_lifecycle(roster_id, RosterLifecycle::Inactive)
        .expect("Failed to update lifecycle");

    let request = registrar_request(roster_id, student_ids[0]);
    let failure =
        enroll_student(&mut fixture.ctx(), &request).expect_err("Inactive roster must reject");
    assert_eq!(failure.failed_step, Some(StepName::ValidateCapacity));
    assert!(matches!(
        failure.error,
        CoreError::Domain(DomainError::RosterInactive { .. })
    ));
}

#[test]
fn test_notification_failure_rolls_back_enrollment_row() {
    let (mut fixture, roster_id, student_ids) = Fixture::with_roster(Some(20), 1);
    fixture.sink = Box::new(FailingSink);

    let request = registrar_request(roster_id, student_ids[0]);
    let failure = enroll_student(&mut fixture.ctx(), &request)
        .expect_err("Failing sink must fail the transaction");

    assert_eq!(failure.failed_step, Some(StepName::CreateNotification));
    assert_eq!(failure.steps_completed, 5);
    assert!(failure.rolled_back);
    assert!(matches!(
        failure.error,
        CoreError::NotificationDeliveryFailed(_)
    ));

    // The row inserted at step four must not survive.
    assert!(
        fixture
            .store
            .find_enrollment(roster_id, student_ids[0])
            .expect("Failed to query")
            .is_none()
    );
    // No audit entry either: the sequence never reached step seven.
    assert!(
        fixture
            .store
            .get_audit_entries_for_roster(roster_id)
            .expect("Failed to query")
            .is_empty()
    );
    assert_eq!(fixture.registry.in_flight(), 0);
}

#[test]
fn test_unlimited_roster_never_waitlists() {
    let (mut fixture, roster_id, student_ids) = Fixture::with_roster(None, 30);

    for &student_id in &student_ids {
        let request = registrar_request(roster_id, student_id);
        let outcome =
            enroll_student(&mut fixture.ctx(), &request).expect("Enrollment should succeed");
        assert_eq!(outcome.status, EnrollmentStatus::Enrolled);
        assert!(outcome.capacity_after.can_enroll);
    }

    assert_eq!(
        fixture
            .store
            .count_waitlisted(roster_id)
            .expect("Failed to count"),
        0
    );
}

#[test]
fn test_invalid_identifiers_rejected_before_transaction() {
    let (mut fixture, _, _) = Fixture::with_roster(Some(20), 0);

    let request = registrar_request(-1, 5);
    let failure = enroll_student(&mut fixture.ctx(), &request).expect_err("Must reject");
    assert!(failure.transaction_id.is_none());
    assert!(matches!(
        failure.error,
        CoreError::Domain(DomainError::InvalidIdentifier {
            field: "roster_id",
            ..
        })
    ));
}
