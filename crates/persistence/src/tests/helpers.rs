// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for persistence tests.

use time::OffsetDateTime;
use time::macros::datetime;

use cert_roster_domain::{EnrollmentStatus, EnrollmentType, RosterLifecycle};

use crate::{Persistence, PersistenceError};

/// A fixed instant so tests can assert on ordering deterministically.
pub fn base_instant() -> OffsetDateTime {
    datetime!(2026-03-01 09:00:00 UTC)
}

/// Creates an in-memory store with one active roster and `student_count`
/// students. Returns the store, the roster id, and the student ids.
pub fn setup_roster_with_students(
    max_capacity: Option<u32>,
    student_count: usize,
) -> Result<(Persistence, i64, Vec<i64>), PersistenceError> {
    let mut persistence = Persistence::new_in_memory()?;
    let roster_id =
        persistence.create_roster("Cert Prep Spring", max_capacity, RosterLifecycle::Active)?;

    let mut student_ids = Vec::with_capacity(student_count);
    for n in 0..student_count {
        let student_id = persistence.create_student(
            &format!("Student {n}"),
            Some(&format!("student{n}@example.edu")),
        )?;
        student_ids.push(student_id);
    }

    Ok((persistence, roster_id, student_ids))
}

/// Inserts an `Enrolled` membership row at the given instant.
pub fn enroll_at(
    persistence: &mut Persistence,
    roster_id: i64,
    student_id: i64,
    at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    persistence.insert_enrollment(
        roster_id,
        student_id,
        EnrollmentStatus::Enrolled,
        EnrollmentType::Standard,
        at,
        None,
        true,
    )
}

/// Inserts a `Waitlisted` membership row at the given instant.
pub fn waitlist_at(
    persistence: &mut Persistence,
    roster_id: i64,
    student_id: i64,
    at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    persistence.insert_enrollment(
        roster_id,
        student_id,
        EnrollmentStatus::Waitlisted,
        EnrollmentType::Standard,
        at,
        None,
        true,
    )
}
