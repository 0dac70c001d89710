// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity oracle tests.

use time::Duration;

use cert_roster_domain::DomainError;

use crate::error::CoreError;
use crate::oracle::check_capacity;
use crate::tests::helpers::{Fixture, base_instant};

#[test]
fn test_report_includes_snapshot_waitlist_and_advisories() {
    let (mut fixture, roster_id, student_ids) = Fixture::with_roster(Some(20), 20);
    fixture.seed_enrolled(roster_id, &student_ids[..17]);
    let t0 = base_instant();
    fixture.seed_waitlisted(roster_id, student_ids[17], t0);
    fixture.seed_waitlisted(roster_id, student_ids[18], t0 + Duration::minutes(1));

    let report = check_capacity(&mut fixture.store, roster_id, 1, true)
        .expect("Capacity check should succeed");

    assert_eq!(report.snapshot.current_enrollment, 17);
    assert_eq!(report.snapshot.available_spots, Some(3));
    assert!(report.snapshot.can_enroll);

    let waitlist = report.waitlist.expect("Waitlist was requested");
    assert_eq!(waitlist.total, 2);
    assert_eq!(waitlist.positions.len(), 2);
    assert_eq!(waitlist.positions[0].position, 1);
    assert_eq!(waitlist.positions[0].student_id, student_ids[17]);
    assert_eq!(waitlist.positions[1].position, 2);

    // Open spots and a non-empty waitlist yield a promotion recommendation.
    assert!(
        report
            .advisories
            .recommendations
            .iter()
            .any(|r| r.contains("Promote 2 student(s)"))
    );
}

#[test]
fn test_waitlist_omitted_when_not_requested() {
    let (mut fixture, roster_id, _) = Fixture::with_roster(Some(20), 0);

    let report = check_capacity(&mut fixture.store, roster_id, 0, false)
        .expect("Capacity check should succeed");
    assert!(report.waitlist.is_none());
}

#[test]
fn test_missing_roster_reports_not_found() {
    let (mut fixture, _, _) = Fixture::with_roster(Some(20), 0);

    let result = check_capacity(&mut fixture.store, 54_321, 1, false);
    match result {
        Err(CoreError::Domain(DomainError::RosterNotFound(54_321))) => {}
        other => panic!("Expected RosterNotFound, got {other:?}"),
    }
}

#[test]
fn test_full_roster_report_flags_blocked_request() {
    let (mut fixture, roster_id, student_ids) = Fixture::with_roster(Some(3), 4);
    fixture.seed_enrolled(roster_id, &student_ids[..3]);
    fixture.seed_waitlisted(roster_id, student_ids[3], base_instant());

    let report = check_capacity(&mut fixture.store, roster_id, 1, false)
        .expect("Capacity check should succeed");

    assert!(!report.snapshot.can_enroll);
    assert_eq!(report.snapshot.available_spots, Some(0));
    assert!(
        report
            .advisories
            .warnings
            .iter()
            .any(|w| w.contains("1 student(s) waiting"))
    );
}

#[test]
fn test_unlimited_roster_report() {
    let (mut fixture, roster_id, student_ids) = Fixture::with_roster(None, 5);
    fixture.seed_enrolled(roster_id, &student_ids);

    let report = check_capacity(&mut fixture.store, roster_id, 100, true)
        .expect("Capacity check should succeed");

    assert!(report.snapshot.can_enroll);
    assert_eq!(report.snapshot.available_spots, None);
    assert!(report.advisories.warnings.is_empty());
}
