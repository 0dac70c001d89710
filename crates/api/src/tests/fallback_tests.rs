// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Legacy fallback tests.
//!
//! The fallback is a deliberate, opt-in escape hatch: a bare insert that
//! trades capacity protection, notification, and audit for availability.
//! It must never engage for capacity failures.

use cert_roster_domain::{EnrollmentStatus, EnrollmentType};

use crate::error::ErrorCode;
use crate::service::ServiceConfig;
use crate::tests::helpers::{FailingSink, registrar_enroll, seed_enrolled, service_with_roster};

fn fallback_config() -> ServiceConfig {
    ServiceConfig {
        legacy_fallback: true,
        ..ServiceConfig::default()
    }
}

#[test]
fn test_fallback_is_off_by_default() {
    let (mut service, roster_id, student_ids) =
        service_with_roster(Some(20), 1, ServiceConfig::default());
    service.set_notification_sink(Box::new(FailingSink));

    let response = service.enroll_student(&registrar_enroll(roster_id, student_ids[0]));

    assert!(!response.success);
    assert!(!response.used_fallback);
    assert_eq!(
        response.error.expect("Error payload").code,
        ErrorCode::TransactionFailed
    );
    // The primary path rolled back; nothing survived.
    assert!(
        service
            .store_mut()
            .find_enrollment(roster_id, student_ids[0])
            .expect("Failed to query")
            .is_none()
    );
}

#[test]
fn test_fallback_rescues_a_non_capacity_failure() {
    let (mut service, roster_id, student_ids) =
        service_with_roster(Some(20), 1, fallback_config());
    service.set_notification_sink(Box::new(FailingSink));

    let response = service.enroll_student(&registrar_enroll(roster_id, student_ids[0]));

    assert!(response.success);
    assert!(response.used_fallback);
    assert!(response.fallback_reason.is_some());
    assert!(response.notification_id.is_none());
    assert!(response.audit_id.is_none());

    let record = service
        .store_mut()
        .find_enrollment(roster_id, student_ids[0])
        .expect("Failed to query")
        .expect("Fallback row should exist");
    assert_eq!(record.status, EnrollmentStatus::Enrolled);
    // The degraded path strips side effects, not the enrollment
    // classification the caller asked for.
    assert_eq!(record.enrollment_type, EnrollmentType::Standard);

    // The degraded path writes no notification or audit entry.
    assert!(
        service
            .store_mut()
            .get_notifications_for_student(student_ids[0])
            .expect("Failed to query")
            .is_empty()
    );
    assert!(
        service
            .store_mut()
            .get_audit_entries_for_roster(roster_id)
            .expect("Failed to query")
            .is_empty()
    );
}

#[test]
fn test_fallback_never_engages_for_capacity_failures() {
    let (mut service, roster_id, student_ids) = service_with_roster(Some(2), 3, fallback_config());
    seed_enrolled(&mut service, roster_id, &student_ids[..2]);

    let response = service.enroll_student(&registrar_enroll(roster_id, student_ids[2]));

    assert!(!response.success);
    assert!(!response.used_fallback);
    assert_eq!(
        response.error.expect("Error payload").code,
        ErrorCode::CapacityExceeded
    );
    assert_eq!(
        service
            .store_mut()
            .count_enrolled(roster_id)
            .expect("Failed to count"),
        2
    );
}

#[test]
fn test_fallback_failure_falls_through_to_the_primary_error() {
    // An unknown student fails the primary path at validation and the
    // fallback insert on the foreign key; the caller sees the primary
    // failure.
    let (mut service, roster_id, _) = service_with_roster(Some(20), 0, fallback_config());

    let response = service.enroll_student(&registrar_enroll(roster_id, 4_242));

    assert!(!response.success);
    assert!(!response.used_fallback);
    assert_eq!(
        response.error.expect("Error payload").code,
        ErrorCode::StudentNotFound
    );
}
