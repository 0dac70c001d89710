// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification query operations.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::NotificationRow;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Query all notifications delivered to a student, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_notifications_for_student(
    conn: &mut SqliteConnection,
    student_id: i64,
) -> Result<Vec<NotificationRow>, PersistenceError> {
    notifications::table
        .filter(notifications::student_id.eq(student_id))
        .order(notifications::notification_id.asc())
        .load::<NotificationRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("get_notifications_for_student: {e}")))
}
