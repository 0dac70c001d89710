// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed row models for the enrollment schema.
//!
//! Rows are decoded into domain records at this boundary: status,
//! lifecycle, role, and timestamp columns are parsed here and never
//! passed through as loose strings.

use std::str::FromStr;

use diesel::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

use cert_roster_audit::{AuditActor, AuditEntry};
use cert_roster_domain::{
    EnrollmentRecord, EnrollmentStatus, EnrollmentType, Role, Roster, RosterLifecycle,
    StudentProfile,
};

use crate::diesel_schema::{audit_log, enrollments, notifications, rosters, students};
use crate::error::PersistenceError;

/// Formats a timestamp for storage as ISO-8601 text.
///
/// All timestamp columns use this single format so that lexical ordering
/// of the stored text matches chronological ordering (the waitlist FIFO
/// key depends on this).
pub(crate) fn format_timestamp(ts: OffsetDateTime) -> Result<String, PersistenceError> {
    ts.format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored ISO-8601 timestamp.
pub(crate) fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(raw, &Iso8601::DEFAULT).map_err(|e| {
        PersistenceError::InvalidStoredValue(format!("timestamp '{raw}': {e}"))
    })
}

fn decode_capacity(raw: Option<i32>) -> Result<Option<u32>, PersistenceError> {
    raw.map(|max| {
        u32::try_from(max)
            .map_err(|_| PersistenceError::InvalidStoredValue(format!("max_capacity {max}")))
    })
    .transpose()
}

/// A roster row.
#[derive(Debug, Clone, Queryable)]
pub struct RosterRow {
    pub roster_id: i64,
    pub name: String,
    pub max_capacity: Option<i32>,
    pub lifecycle: String,
    pub created_at: String,
}

impl RosterRow {
    /// Decodes this row into a domain roster record.
    ///
    /// # Errors
    ///
    /// Returns an error if the lifecycle or capacity column holds a value
    /// outside the domain.
    pub fn into_domain(self) -> Result<Roster, PersistenceError> {
        let lifecycle = RosterLifecycle::from_str(&self.lifecycle)?;
        let max_capacity = decode_capacity(self.max_capacity)?;
        Ok(Roster::new(
            self.roster_id,
            self.name,
            max_capacity,
            lifecycle,
        ))
    }
}

/// Insertable roster record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rosters)]
pub struct NewRoster {
    pub name: String,
    pub max_capacity: Option<i32>,
    pub lifecycle: String,
    pub created_at: String,
}

/// A student row.
#[derive(Debug, Clone, Queryable)]
pub struct StudentRow {
    pub student_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub created_at: String,
}

impl StudentRow {
    /// Decodes this row into a domain student profile.
    #[must_use]
    pub fn into_domain(self) -> StudentProfile {
        StudentProfile::new(self.student_id, self.name, self.email)
    }
}

/// Insertable student record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub struct NewStudent {
    pub name: String,
    pub email: Option<String>,
    pub created_at: String,
}

/// An enrollment (roster membership) row.
#[derive(Debug, Clone, Queryable)]
pub struct EnrollmentRow {
    pub enrollment_id: i64,
    pub roster_id: i64,
    pub student_id: i64,
    pub status: String,
    pub enrollment_type: String,
    pub enrolled_at: String,
    pub updated_at: String,
    pub notes: Option<String>,
}

impl EnrollmentRow {
    /// Decodes this row into a domain enrollment record.
    ///
    /// # Errors
    ///
    /// Returns an error if a status, type, or timestamp column holds a
    /// value outside the domain.
    pub fn into_domain(self) -> Result<EnrollmentRecord, PersistenceError> {
        let status = EnrollmentStatus::from_str(&self.status)?;
        let enrollment_type = EnrollmentType::from_str(&self.enrollment_type)?;
        let enrolled_at = parse_timestamp(&self.enrolled_at)?;
        let updated_at = parse_timestamp(&self.updated_at)?;
        Ok(EnrollmentRecord {
            enrollment_id: self.enrollment_id,
            roster_id: self.roster_id,
            student_id: self.student_id,
            status,
            enrollment_type,
            enrolled_at,
            updated_at,
            notes: self.notes,
        })
    }
}

/// Insertable enrollment record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = enrollments)]
pub struct NewEnrollment {
    pub roster_id: i64,
    pub student_id: i64,
    pub status: String,
    pub enrollment_type: String,
    pub enrolled_at: String,
    pub updated_at: String,
    pub notes: Option<String>,
}

/// A stored notification row.
#[derive(Debug, Clone, Queryable)]
pub struct NotificationRow {
    pub notification_id: i64,
    pub student_id: i64,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub category: String,
    pub priority: String,
    pub metadata_json: Option<String>,
    pub created_at: String,
}

/// Insertable notification record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub student_id: i64,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub category: String,
    pub priority: String,
    pub metadata_json: Option<String>,
    pub created_at: String,
}

/// An audit log row.
#[derive(Debug, Clone, Queryable)]
pub struct AuditLogRow {
    pub audit_id: i64,
    pub action: String,
    pub roster_id: i64,
    pub student_id: Option<i64>,
    pub performed_by: String,
    pub role: String,
    pub timestamp: String,
    pub details_json: String,
}

impl AuditLogRow {
    /// Decodes this row into a domain audit entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the role, timestamp, or details column cannot
    /// be decoded.
    pub fn into_domain(self) -> Result<AuditEntry, PersistenceError> {
        let role = Role::from_str(&self.role)?;
        let timestamp = parse_timestamp(&self.timestamp)?;
        let details: serde_json::Value = serde_json::from_str(&self.details_json)?;
        Ok(AuditEntry::new(
            self.action,
            self.roster_id,
            self.student_id,
            AuditActor::new(self.performed_by, role),
            timestamp,
            details,
        ))
    }
}

/// Insertable audit log record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_log)]
pub struct NewAuditLog {
    pub action: String,
    pub roster_id: i64,
    pub student_id: Option<i64>,
    pub performed_by: String,
    pub role: String,
    pub timestamp: String,
    pub details_json: String,
}
