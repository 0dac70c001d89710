// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Enrollment (roster membership) query operations.

use diesel::prelude::*;
use diesel::SqliteConnection;

use cert_roster_domain::EnrollmentStatus;

use crate::data_models::EnrollmentRow;
use crate::diesel_schema::enrollments;
use crate::error::PersistenceError;

/// Query the membership row for a (roster, student) pair.
///
/// At most one row exists per pair (enforced by a unique constraint).
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_enrollment(
    conn: &mut SqliteConnection,
    roster_id: i64,
    student_id: i64,
) -> Result<Option<EnrollmentRow>, PersistenceError> {
    enrollments::table
        .filter(enrollments::roster_id.eq(roster_id))
        .filter(enrollments::student_id.eq(student_id))
        .first::<EnrollmentRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_enrollment: {e}")))
}

/// Query a membership row by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_enrollment(
    conn: &mut SqliteConnection,
    enrollment_id: i64,
) -> Result<Option<EnrollmentRow>, PersistenceError> {
    enrollments::table
        .filter(enrollments::enrollment_id.eq(enrollment_id))
        .first::<EnrollmentRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_enrollment: {e}")))
}

/// Query the waitlist for a roster, oldest first.
///
/// Ordering is `enrolled_at` ascending (the FIFO key) with the row id as
/// a deterministic tie-break for identical timestamps.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_waitlist(
    conn: &mut SqliteConnection,
    roster_id: i64,
) -> Result<Vec<EnrollmentRow>, PersistenceError> {
    enrollments::table
        .filter(enrollments::roster_id.eq(roster_id))
        .filter(enrollments::status.eq(EnrollmentStatus::Waitlisted.as_str()))
        .order((
            enrollments::enrolled_at.asc(),
            enrollments::enrollment_id.asc(),
        ))
        .load::<EnrollmentRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("get_waitlist: {e}")))
}

/// Count waitlisted rows for a roster.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_waitlisted(
    conn: &mut SqliteConnection,
    roster_id: i64,
) -> Result<i64, PersistenceError> {
    enrollments::table
        .filter(enrollments::roster_id.eq(roster_id))
        .filter(enrollments::status.eq(EnrollmentStatus::Waitlisted.as_str()))
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_waitlisted: {e}")))
}
