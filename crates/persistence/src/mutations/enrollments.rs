// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Enrollment mutation operations.
//!
//! The insert and promotion paths here carry the store-side capacity
//! constraint: when enforcement is requested, the enrolled-row count is
//! re-taken inside the same database transaction as the write, and the
//! write aborts with `CapacityConstraintViolation` if it would overshoot
//! the roster's `max_capacity`. `SQLite` serializes writers, so this
//! check-within-transaction is atomic and remains authoritative even
//! when an application-level pre-check raced another writer.
//!
//! Force enrollment and the legacy fallback pass `enforce_capacity =
//! false` and skip the check deliberately.

use diesel::prelude::*;
use diesel::SqliteConnection;

use cert_roster_domain::EnrollmentStatus;

use crate::data_models::{EnrollmentRow, NewEnrollment, RosterRow};
use crate::diesel_schema::{enrollments, rosters};
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Fails when one more enrolled row would overshoot the roster's capacity.
///
/// Runs inside the caller's transaction.
fn check_capacity_for_one_more(
    conn: &mut SqliteConnection,
    roster_id: i64,
) -> Result<(), PersistenceError> {
    let roster: RosterRow = rosters::table
        .filter(rosters::roster_id.eq(roster_id))
        .first::<RosterRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Roster {roster_id}")))?;

    let Some(max_capacity) = roster.max_capacity else {
        return Ok(());
    };

    let enrolled: i64 = enrollments::table
        .filter(enrollments::roster_id.eq(roster_id))
        .filter(enrollments::status.eq(EnrollmentStatus::Enrolled.as_str()))
        .count()
        .get_result(conn)?;

    if enrolled >= i64::from(max_capacity) {
        return Err(PersistenceError::CapacityConstraintViolation {
            roster_id,
            max_capacity: u32::try_from(max_capacity).unwrap_or(0),
            enrolled: u32::try_from(enrolled).unwrap_or(u32::MAX),
        });
    }
    Ok(())
}

/// Insert a membership row.
///
/// When `enforce_capacity` is true and the new row is in `Enrolled`
/// status, the write runs in a transaction that re-counts enrolled rows
/// and aborts on overshoot. Waitlisted rows never consume capacity and
/// are inserted without the check.
///
/// # Errors
///
/// Returns `CapacityConstraintViolation` if the insert would overshoot
/// capacity, or a database error if the insert fails (including the
/// unique-pair constraint on `(roster_id, student_id)`).
pub fn insert_enrollment(
    conn: &mut SqliteConnection,
    record: &NewEnrollment,
    enforce_capacity: bool,
) -> Result<i64, PersistenceError> {
    conn.transaction::<i64, PersistenceError, _>(|conn| {
        if enforce_capacity && record.status == EnrollmentStatus::Enrolled.as_str() {
            check_capacity_for_one_more(conn, record.roster_id)?;
        }

        diesel::insert_into(enrollments::table)
            .values(record)
            .execute(conn)?;

        get_last_insert_rowid(conn)
    })
}

/// Delete a membership row.
///
/// This is the compensation for a failed enrollment saga; ordinary
/// workflows cancel memberships instead of deleting them.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_enrollment(
    conn: &mut SqliteConnection,
    enrollment_id: i64,
) -> Result<(), PersistenceError> {
    diesel::delete(enrollments::table.filter(enrollments::enrollment_id.eq(enrollment_id)))
        .execute(conn)?;
    Ok(())
}

/// Flip a waitlisted membership row to `Enrolled`.
///
/// When `enforce_capacity` is true the status flip runs in a transaction
/// that re-counts enrolled rows first, so a promotion can never overshoot
/// capacity even if the promoter's pre-computed spot count went stale.
///
/// # Errors
///
/// Returns `NotFound` if the row does not exist, `Other` if it is not
/// waitlisted, or `CapacityConstraintViolation` on overshoot.
pub fn promote_enrollment(
    conn: &mut SqliteConnection,
    enrollment_id: i64,
    updated_at: &str,
    enforce_capacity: bool,
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let row: EnrollmentRow = enrollments::table
            .filter(enrollments::enrollment_id.eq(enrollment_id))
            .first::<EnrollmentRow>(conn)
            .optional()?
            .ok_or_else(|| PersistenceError::NotFound(format!("Enrollment {enrollment_id}")))?;

        if row.status != EnrollmentStatus::Waitlisted.as_str() {
            return Err(PersistenceError::Other(format!(
                "Enrollment {enrollment_id} is not waitlisted (status: {})",
                row.status
            )));
        }

        if enforce_capacity {
            check_capacity_for_one_more(conn, row.roster_id)?;
        }

        diesel::update(enrollments::table.filter(enrollments::enrollment_id.eq(enrollment_id)))
            .set((
                enrollments::status.eq(EnrollmentStatus::Enrolled.as_str()),
                enrollments::updated_at.eq(updated_at),
            ))
            .execute(conn)?;
        Ok(())
    })
}
