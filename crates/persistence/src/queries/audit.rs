// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log query operations.
//!
//! The audit log is append-only: this module reads it, `mutations::audit`
//! appends to it, and nothing updates or deletes rows.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::AuditLogRow;
use crate::diesel_schema::audit_log;
use crate::error::PersistenceError;

/// Query the audit trail for a roster, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_audit_entries_for_roster(
    conn: &mut SqliteConnection,
    roster_id: i64,
) -> Result<Vec<AuditLogRow>, PersistenceError> {
    audit_log::table
        .filter(audit_log::roster_id.eq(roster_id))
        .order(audit_log::audit_id.asc())
        .load::<AuditLogRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("get_audit_entries_for_roster: {e}")))
}
