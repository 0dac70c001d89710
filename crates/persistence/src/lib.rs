// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the CertRoster enrollment system.
//!
//! This crate provides database persistence for rosters, students,
//! enrollment (membership) rows, notifications, and the append-only
//! audit log. It is built on Diesel over `SQLite`.
//!
//! ## Capacity constraint
//!
//! The store, not the application, is the final arbiter of the capacity
//! invariant (`enrolled rows <= max_capacity`). The enrollment insert
//! and waitlist-promotion mutations re-count enrolled rows inside the
//! same transaction as the write and abort with
//! [`PersistenceError::CapacityConstraintViolation`] on overshoot.
//! Callers must treat that rejection as authoritative even when their
//! own pre-check reported space available.
//!
//! ## Testing
//!
//! Tests run against unique in-memory `SQLite` databases. Each call to
//! [`Persistence::new_in_memory`] receives a unique database via an
//! atomic counter, giving deterministic isolation without time-based
//! collisions.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;

use cert_roster_audit::AuditEntry;
use cert_roster_domain::{
    EnrollmentRecord, EnrollmentStatus, EnrollmentType, Roster, RosterLifecycle, StudentProfile,
};

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use data_models::{NewEnrollment, NotificationRow};
pub use error::PersistenceError;

use data_models::{NewAuditLog, NewRoster, NewStudent, format_timestamp};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the enrollment core.
///
/// One adapter owns one `SQLite` connection. All enrollment writes for a
/// roster funnel through a single adapter, which is the application's
/// concurrency-safety posture for multi-student operations (see the
/// batch coordinator).
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_roster_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Invalid database path"))
        })?;

        let mut conn: SqliteConnection = sqlite::initialize_database(path_str)?;
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Checks that the database answers a trivial query.
    ///
    /// Used by the service health check.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable.
    pub fn ping(&mut self) -> Result<(), PersistenceError> {
        diesel::sql_query("SELECT 1")
            .execute(&mut self.conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("ping: {e}")))?;
        Ok(())
    }

    // ========================================================================
    // Bootstrap
    // ========================================================================

    /// Creates a roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_roster(
        &mut self,
        name: &str,
        max_capacity: Option<u32>,
        lifecycle: RosterLifecycle,
    ) -> Result<i64, PersistenceError> {
        let max_capacity = max_capacity
            .map(|max| {
                i32::try_from(max).map_err(|_| {
                    PersistenceError::Other(format!("max_capacity {max} out of range"))
                })
            })
            .transpose()?;
        let record = NewRoster {
            name: name.to_string(),
            max_capacity,
            lifecycle: lifecycle.as_str().to_string(),
            created_at: format_timestamp(OffsetDateTime::now_utc())?,
        };
        mutations::bootstrap::insert_roster(&mut self.conn, &record)
    }

    /// Creates a student profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_student(
        &mut self,
        name: &str,
        email: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        let record = NewStudent {
            name: name.to_string(),
            email: email.map(ToString::to_string),
            created_at: format_timestamp(OffsetDateTime::now_utc())?,
        };
        mutations::bootstrap::insert_student(&mut self.conn, &record)
    }

    /// Updates a roster's lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the roster does not exist.
    pub fn set_roster_lifecycle(
        &mut self,
        roster_id: i64,
        lifecycle: RosterLifecycle,
    ) -> Result<(), PersistenceError> {
        mutations::bootstrap::set_roster_lifecycle(&mut self.conn, roster_id, lifecycle.as_str())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Reads a roster by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn get_roster(&mut self, roster_id: i64) -> Result<Option<Roster>, PersistenceError> {
        queries::rosters::get_roster(&mut self.conn, roster_id)?
            .map(data_models::RosterRow::into_domain)
            .transpose()
    }

    /// Counts membership rows in `Enrolled` status for a roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_enrolled(&mut self, roster_id: i64) -> Result<u32, PersistenceError> {
        let count = queries::rosters::count_enrolled(&mut self.conn, roster_id)?;
        u32::try_from(count)
            .map_err(|_| PersistenceError::InvalidStoredValue(format!("enrolled count {count}")))
    }

    /// Reads a student profile by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_student(
        &mut self,
        student_id: i64,
    ) -> Result<Option<StudentProfile>, PersistenceError> {
        Ok(queries::students::get_student(&mut self.conn, student_id)?
            .map(data_models::StudentRow::into_domain))
    }

    /// Reads the membership row for a (roster, student) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn find_enrollment(
        &mut self,
        roster_id: i64,
        student_id: i64,
    ) -> Result<Option<EnrollmentRecord>, PersistenceError> {
        queries::enrollments::find_enrollment(&mut self.conn, roster_id, student_id)?
            .map(data_models::EnrollmentRow::into_domain)
            .transpose()
    }

    /// Reads a membership row by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn get_enrollment(
        &mut self,
        enrollment_id: i64,
    ) -> Result<Option<EnrollmentRecord>, PersistenceError> {
        queries::enrollments::get_enrollment(&mut self.conn, enrollment_id)?
            .map(data_models::EnrollmentRow::into_domain)
            .transpose()
    }

    /// Reads the waitlist for a roster, oldest first (FIFO order).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn get_waitlist(
        &mut self,
        roster_id: i64,
    ) -> Result<Vec<EnrollmentRecord>, PersistenceError> {
        queries::enrollments::get_waitlist(&mut self.conn, roster_id)?
            .into_iter()
            .map(data_models::EnrollmentRow::into_domain)
            .collect()
    }

    /// Counts waitlisted rows for a roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_waitlisted(&mut self, roster_id: i64) -> Result<u32, PersistenceError> {
        let count = queries::enrollments::count_waitlisted(&mut self.conn, roster_id)?;
        u32::try_from(count)
            .map_err(|_| PersistenceError::InvalidStoredValue(format!("waitlist count {count}")))
    }

    /// Reads all notifications delivered to a student, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_notifications_for_student(
        &mut self,
        student_id: i64,
    ) -> Result<Vec<NotificationRow>, PersistenceError> {
        queries::notifications::get_notifications_for_student(&mut self.conn, student_id)
    }

    /// Reads the audit trail for a roster, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn get_audit_entries_for_roster(
        &mut self,
        roster_id: i64,
    ) -> Result<Vec<AuditEntry>, PersistenceError> {
        queries::audit::get_audit_entries_for_roster(&mut self.conn, roster_id)?
            .into_iter()
            .map(data_models::AuditLogRow::into_domain)
            .collect()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Inserts a membership row.
    ///
    /// See [`PersistenceError::CapacityConstraintViolation`] for the
    /// write-time capacity semantics when `enforce_capacity` is true.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or would overshoot capacity.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_enrollment(
        &mut self,
        roster_id: i64,
        student_id: i64,
        status: EnrollmentStatus,
        enrollment_type: EnrollmentType,
        enrolled_at: OffsetDateTime,
        notes: Option<&str>,
        enforce_capacity: bool,
    ) -> Result<i64, PersistenceError> {
        let timestamp = format_timestamp(enrolled_at)?;
        let record = NewEnrollment {
            roster_id,
            student_id,
            status: status.as_str().to_string(),
            enrollment_type: enrollment_type.as_str().to_string(),
            enrolled_at: timestamp.clone(),
            updated_at: timestamp,
            notes: notes.map(ToString::to_string),
        };
        mutations::enrollments::insert_enrollment(&mut self.conn, &record, enforce_capacity)
    }

    /// Deletes a membership row (saga compensation).
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_enrollment(&mut self, enrollment_id: i64) -> Result<(), PersistenceError> {
        mutations::enrollments::delete_enrollment(&mut self.conn, enrollment_id)
    }

    /// Flips a waitlisted membership row to `Enrolled`.
    ///
    /// # Errors
    ///
    /// Returns an error if the row is missing, not waitlisted, or the
    /// flip would overshoot capacity.
    pub fn promote_enrollment(
        &mut self,
        enrollment_id: i64,
        promoted_at: OffsetDateTime,
        enforce_capacity: bool,
    ) -> Result<(), PersistenceError> {
        let updated_at = format_timestamp(promoted_at)?;
        mutations::enrollments::promote_enrollment(
            &mut self.conn,
            enrollment_id,
            &updated_at,
            enforce_capacity,
        )
    }

    /// Inserts a notification record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_notification(
        &mut self,
        student_id: i64,
        title: &str,
        message: &str,
        kind: &str,
        category: &str,
        priority: &str,
        metadata: Option<&serde_json::Value>,
    ) -> Result<i64, PersistenceError> {
        let metadata_json = metadata.map(serde_json::to_string).transpose()?;
        let record = data_models::NewNotification {
            student_id,
            title: title.to_string(),
            message: message.to_string(),
            kind: kind.to_string(),
            category: category.to_string(),
            priority: priority.to_string(),
            metadata_json,
            created_at: format_timestamp(OffsetDateTime::now_utc())?,
        };
        mutations::notifications::insert_notification(&mut self.conn, &record)
    }

    /// Deletes a notification record (saga compensation).
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_notification(&mut self, notification_id: i64) -> Result<(), PersistenceError> {
        mutations::notifications::delete_notification(&mut self.conn, notification_id)
    }

    /// Appends an audit log entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn append_audit_entry(&mut self, entry: &AuditEntry) -> Result<i64, PersistenceError> {
        let record = NewAuditLog {
            action: entry.action.clone(),
            roster_id: entry.roster_id,
            student_id: entry.student_id,
            performed_by: entry.actor.performed_by.clone(),
            role: entry.actor.role.as_str().to_string(),
            timestamp: format_timestamp(entry.timestamp)?,
            details_json: serde_json::to_string(&entry.details)?,
        };
        mutations::audit::append_audit_entry(&mut self.conn, &record)
    }
}
