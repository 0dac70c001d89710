// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification mutation operations.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::NewNotification;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Insert a notification record.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_notification(
    conn: &mut SqliteConnection,
    record: &NewNotification,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(notifications::table)
        .values(record)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Delete a notification record.
///
/// This is the compensation for a failed enrollment saga; delivered
/// notifications are otherwise immutable.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_notification(
    conn: &mut SqliteConnection,
    notification_id: i64,
) -> Result<(), PersistenceError> {
    diesel::delete(
        notifications::table.filter(notifications::notification_id.eq(notification_id)),
    )
    .execute(conn)?;
    Ok(())
}
