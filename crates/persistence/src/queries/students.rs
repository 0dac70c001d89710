// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Student profile query operations.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::StudentRow;
use crate::diesel_schema::students;
use crate::error::PersistenceError;

/// Query a student profile by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_student(
    conn: &mut SqliteConnection,
    student_id: i64,
) -> Result<Option<StudentRow>, PersistenceError> {
    students::table
        .filter(students::student_id.eq(student_id))
        .first::<StudentRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_student: {e}")))
}
