// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Enrollment row tests: inserts, lookups, waitlist ordering, and
//! relational constraints.

use time::Duration;

use cert_roster_domain::{EnrollmentStatus, EnrollmentType};

use crate::tests::helpers::{base_instant, enroll_at, setup_roster_with_students, waitlist_at};
use crate::PersistenceError;

#[test]
fn test_insert_and_find_enrollment() {
    let (mut persistence, roster_id, student_ids) =
        setup_roster_with_students(Some(20), 1).expect("Failed to setup");

    let enrollment_id = enroll_at(&mut persistence, roster_id, student_ids[0], base_instant())
        .expect("Failed to enroll");

    let record = persistence
        .find_enrollment(roster_id, student_ids[0])
        .expect("Failed to query enrollment")
        .expect("Enrollment should exist");
    assert_eq!(record.enrollment_id, enrollment_id);
    assert_eq!(record.status, EnrollmentStatus::Enrolled);
    assert_eq!(record.enrollment_type, EnrollmentType::Standard);
    assert_eq!(record.enrolled_at, base_instant());

    let by_id = persistence
        .get_enrollment(enrollment_id)
        .expect("Failed to query enrollment")
        .expect("Enrollment should exist");
    assert_eq!(by_id.student_id, student_ids[0]);
}

#[test]
fn test_find_enrollment_for_unknown_pair_returns_none() {
    let (mut persistence, roster_id, _) =
        setup_roster_with_students(Some(20), 0).expect("Failed to setup");

    let found = persistence
        .find_enrollment(roster_id, 555)
        .expect("Failed to query");
    assert!(found.is_none());
}

#[test]
fn test_duplicate_pair_insert_is_rejected() {
    let (mut persistence, roster_id, student_ids) =
        setup_roster_with_students(Some(20), 1).expect("Failed to setup");

    enroll_at(&mut persistence, roster_id, student_ids[0], base_instant())
        .expect("Failed to enroll");

    let result = waitlist_at(&mut persistence, roster_id, student_ids[0], base_instant());
    assert!(result.is_err(), "Second row for the same pair must fail");
}

#[test]
fn test_insert_with_unknown_student_violates_foreign_key() {
    let (mut persistence, roster_id, _) =
        setup_roster_with_students(Some(20), 0).expect("Failed to setup");

    let result = enroll_at(&mut persistence, roster_id, 9876, base_instant());
    assert!(result.is_err(), "Foreign keys must be enforced");
}

#[test]
fn test_count_enrolled_excludes_non_enrolled_statuses() {
    let (mut persistence, roster_id, student_ids) =
        setup_roster_with_students(Some(20), 3).expect("Failed to setup");

    let t0 = base_instant();
    enroll_at(&mut persistence, roster_id, student_ids[0], t0).expect("Failed to enroll");
    waitlist_at(&mut persistence, roster_id, student_ids[1], t0).expect("Failed to waitlist");
    persistence
        .insert_enrollment(
            roster_id,
            student_ids[2],
            EnrollmentStatus::Cancelled,
            EnrollmentType::Standard,
            t0,
            None,
            true,
        )
        .expect("Failed to insert cancelled row");

    assert_eq!(
        persistence
            .count_enrolled(roster_id)
            .expect("Failed to count"),
        1
    );
    assert_eq!(
        persistence
            .count_waitlisted(roster_id)
            .expect("Failed to count"),
        1
    );
}

#[test]
fn test_waitlist_is_ordered_oldest_first() {
    let (mut persistence, roster_id, student_ids) =
        setup_roster_with_students(Some(1), 4).expect("Failed to setup");

    let t0 = base_instant();
    enroll_at(&mut persistence, roster_id, student_ids[0], t0).expect("Failed to enroll");

    // Insert out of chronological order to prove ordering comes from the
    // stored timestamp, not insertion order.
    waitlist_at(
        &mut persistence,
        roster_id,
        student_ids[2],
        t0 + Duration::minutes(10),
    )
    .expect("Failed to waitlist");
    waitlist_at(
        &mut persistence,
        roster_id,
        student_ids[1],
        t0 + Duration::minutes(5),
    )
    .expect("Failed to waitlist");
    waitlist_at(
        &mut persistence,
        roster_id,
        student_ids[3],
        t0 + Duration::minutes(15),
    )
    .expect("Failed to waitlist");

    let waitlist = persistence
        .get_waitlist(roster_id)
        .expect("Failed to query waitlist");
    let ordered: Vec<i64> = waitlist.iter().map(|e| e.student_id).collect();
    assert_eq!(ordered, vec![student_ids[1], student_ids[2], student_ids[3]]);
}

#[test]
fn test_waitlist_ties_break_by_row_id() {
    let (mut persistence, roster_id, student_ids) =
        setup_roster_with_students(Some(1), 3).expect("Failed to setup");

    let t0 = base_instant();
    enroll_at(&mut persistence, roster_id, student_ids[0], t0).expect("Failed to enroll");

    let first = waitlist_at(&mut persistence, roster_id, student_ids[1], t0)
        .expect("Failed to waitlist");
    let second = waitlist_at(&mut persistence, roster_id, student_ids[2], t0)
        .expect("Failed to waitlist");
    assert!(first < second);

    let waitlist = persistence
        .get_waitlist(roster_id)
        .expect("Failed to query waitlist");
    let ordered: Vec<i64> = waitlist.iter().map(|e| e.enrollment_id).collect();
    assert_eq!(ordered, vec![first, second]);
}

#[test]
fn test_delete_enrollment_removes_row() {
    let (mut persistence, roster_id, student_ids) =
        setup_roster_with_students(Some(20), 1).expect("Failed to setup");

    let enrollment_id = enroll_at(&mut persistence, roster_id, student_ids[0], base_instant())
        .expect("Failed to enroll");

    persistence
        .delete_enrollment(enrollment_id)
        .expect("Failed to delete");

    let found = persistence
        .get_enrollment(enrollment_id)
        .expect("Failed to query");
    assert!(found.is_none());
    assert_eq!(
        persistence
            .count_enrolled(roster_id)
            .expect("Failed to count"),
        0
    );
}

#[test]
fn test_promote_missing_enrollment_returns_not_found() {
    let (mut persistence, _, _) = setup_roster_with_students(Some(20), 0).expect("Failed to setup");

    let result = persistence.promote_enrollment(31337, base_instant(), true);
    match result {
        Err(PersistenceError::NotFound(msg)) => assert!(msg.contains("31337")),
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_promote_non_waitlisted_enrollment_is_rejected() {
    let (mut persistence, roster_id, student_ids) =
        setup_roster_with_students(Some(20), 1).expect("Failed to setup");

    let enrollment_id = enroll_at(&mut persistence, roster_id, student_ids[0], base_instant())
        .expect("Failed to enroll");

    let result = persistence.promote_enrollment(enrollment_id, base_instant(), true);
    match result {
        Err(PersistenceError::Other(msg)) => assert!(msg.contains("not waitlisted")),
        other => panic!("Expected rejection, got {other:?}"),
    }
}

#[test]
fn test_promote_flips_status_and_updates_timestamp() {
    let (mut persistence, roster_id, student_ids) =
        setup_roster_with_students(Some(2), 2).expect("Failed to setup");

    let t0 = base_instant();
    enroll_at(&mut persistence, roster_id, student_ids[0], t0).expect("Failed to enroll");
    let waitlisted_id =
        waitlist_at(&mut persistence, roster_id, student_ids[1], t0).expect("Failed to waitlist");

    let promoted_at = t0 + Duration::hours(1);
    persistence
        .promote_enrollment(waitlisted_id, promoted_at, true)
        .expect("Failed to promote");

    let record = persistence
        .get_enrollment(waitlisted_id)
        .expect("Failed to query")
        .expect("Enrollment should exist");
    assert_eq!(record.status, EnrollmentStatus::Enrolled);
    assert_eq!(record.enrolled_at, t0);
    assert_eq!(record.updated_at, promoted_at);
    assert_eq!(
        persistence
            .count_enrolled(roster_id)
            .expect("Failed to count"),
        2
    );
}
