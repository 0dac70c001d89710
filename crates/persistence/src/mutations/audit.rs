// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log mutation operations.
//!
//! Append only. There is deliberately no update or delete function for
//! the audit log anywhere in this crate.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::NewAuditLog;
use crate::diesel_schema::audit_log;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Append an audit log entry.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn append_audit_entry(
    conn: &mut SqliteConnection,
    record: &NewAuditLog,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(audit_log::table)
        .values(record)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
