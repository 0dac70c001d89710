// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::{DomainError, EnrollmentStatus, EnrollmentType, Role, Roster, RosterLifecycle};
use std::str::FromStr;

#[test]
fn test_lifecycle_round_trips_through_strings() {
    for lifecycle in [
        RosterLifecycle::Active,
        RosterLifecycle::Inactive,
        RosterLifecycle::Archived,
    ] {
        let parsed = RosterLifecycle::from_str(lifecycle.as_str()).unwrap();
        assert_eq!(parsed, lifecycle);
    }
}

#[test]
fn test_unknown_lifecycle_is_rejected() {
    let result = RosterLifecycle::from_str("Paused");

    assert_eq!(
        result.unwrap_err(),
        DomainError::InvalidLifecycleState(String::from("Paused"))
    );
}

#[test]
fn test_only_enrolled_counts_against_capacity() {
    assert!(EnrollmentStatus::Enrolled.counts_against_capacity());
    assert!(!EnrollmentStatus::Waitlisted.counts_against_capacity());
    assert!(!EnrollmentStatus::Completed.counts_against_capacity());
    assert!(!EnrollmentStatus::Cancelled.counts_against_capacity());
}

#[test]
fn test_enrollment_status_parsing() {
    assert_eq!(
        EnrollmentStatus::from_str("Waitlisted").unwrap(),
        EnrollmentStatus::Waitlisted
    );
    assert!(EnrollmentStatus::from_str("waitlisted").is_err());
}

#[test]
fn test_enrollment_type_defaults_to_standard() {
    assert_eq!(EnrollmentType::default(), EnrollmentType::Standard);
    assert_eq!(
        EnrollmentType::from_str("Administrative").unwrap(),
        EnrollmentType::Administrative
    );
}

#[test]
fn test_role_ordering_matches_privilege() {
    assert!(Role::Viewer < Role::Instructor);
    assert!(Role::Instructor < Role::Registrar);
    assert!(Role::Registrar < Role::Administrator);
}

#[test]
fn test_registrar_meets_enrollment_floor() {
    assert!(Role::Registrar.meets(Role::ENROLLMENT_FLOOR));
    assert!(Role::Administrator.meets(Role::ENROLLMENT_FLOOR));
    assert!(!Role::Instructor.meets(Role::ENROLLMENT_FLOOR));
    assert!(!Role::Viewer.meets(Role::ENROLLMENT_FLOOR));
}

#[test]
fn test_only_administrator_meets_force_floor() {
    assert!(Role::Administrator.meets(Role::FORCE_FLOOR));
    assert!(!Role::Registrar.meets(Role::FORCE_FLOOR));
}

#[test]
fn test_only_active_roster_accepts_enrollment() {
    let active = Roster::new(1, String::from("A"), Some(10), RosterLifecycle::Active);
    let archived = Roster::new(2, String::from("B"), Some(10), RosterLifecycle::Archived);

    assert!(active.is_active());
    assert!(!archived.is_active());
}
