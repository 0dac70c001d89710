// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roster query operations.

use diesel::prelude::*;
use diesel::SqliteConnection;

use cert_roster_domain::EnrollmentStatus;

use crate::data_models::RosterRow;
use crate::diesel_schema::{enrollments, rosters};
use crate::error::PersistenceError;

/// Query a roster by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_roster(
    conn: &mut SqliteConnection,
    roster_id: i64,
) -> Result<Option<RosterRow>, PersistenceError> {
    rosters::table
        .filter(rosters::roster_id.eq(roster_id))
        .first::<RosterRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_roster: {e}")))
}

/// Count membership rows in `Enrolled` status for a roster.
///
/// This count is the roster's current enrollment: it is derived from the
/// membership rows on every read rather than maintained as a stored
/// counter.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_enrolled(
    conn: &mut SqliteConnection,
    roster_id: i64,
) -> Result<i64, PersistenceError> {
    enrollments::table
        .filter(enrollments::roster_id.eq(roster_id))
        .filter(enrollments::status.eq(EnrollmentStatus::Enrolled.as_str()))
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_enrolled: {e}")))
}
