// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roster and student bootstrap mutations.
//!
//! Roster administration and student onboarding live outside the
//! enrollment core; these functions exist so deployments and tests can
//! seed the referenced entities.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::{NewRoster, NewStudent};
use crate::diesel_schema::{rosters, students};
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Insert a roster.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_roster(
    conn: &mut SqliteConnection,
    record: &NewRoster,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(rosters::table)
        .values(record)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Insert a student profile.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_student(
    conn: &mut SqliteConnection,
    record: &NewStudent,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(students::table)
        .values(record)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Update a roster's lifecycle state.
///
/// # Errors
///
/// Returns `NotFound` if the roster does not exist.
pub fn set_roster_lifecycle(
    conn: &mut SqliteConnection,
    roster_id: i64,
    lifecycle: &str,
) -> Result<(), PersistenceError> {
    let updated =
        diesel::update(rosters::table.filter(rosters::roster_id.eq(roster_id)))
            .set(rosters::lifecycle.eq(lifecycle))
            .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Roster {roster_id}")));
    }
    Ok(())
}
