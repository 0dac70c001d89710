// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{EnrollmentStatus, Role, RosterLifecycle};

/// Errors that can occur during domain validation and capacity checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The roster is full and force enrollment was not authorized.
    CapacityExceeded {
        /// The roster that is full.
        roster_id: i64,
        /// The roster's stated maximum capacity.
        max_capacity: u32,
        /// The number of currently enrolled students.
        current_enrollment: u32,
        /// The number of additional students requested.
        requested: u32,
    },
    /// The student already holds a membership row on this roster.
    AlreadyEnrolled {
        /// The roster.
        roster_id: i64,
        /// The student.
        student_id: i64,
        /// The status of the existing membership row.
        status: EnrollmentStatus,
    },
    /// Roster does not exist.
    RosterNotFound(i64),
    /// Student profile does not exist.
    StudentNotFound(i64),
    /// The roster is not accepting enrollment actions.
    RosterInactive {
        /// The roster.
        roster_id: i64,
        /// The roster's current lifecycle state.
        lifecycle: RosterLifecycle,
    },
    /// The caller's role is below the required floor for the action.
    InsufficientPermissions {
        /// The action that was attempted.
        action: &'static str,
        /// The minimum role required.
        required: Role,
        /// The caller's actual role.
        actual: Role,
    },
    /// Roster lifecycle string is not recognized.
    InvalidLifecycleState(String),
    /// Enrollment status string is not recognized.
    InvalidEnrollmentStatus(String),
    /// Enrollment type string is not recognized.
    InvalidEnrollmentType(String),
    /// Role string is not recognized.
    InvalidRole(String),
    /// An identifier field holds a non-positive value.
    InvalidIdentifier {
        /// The field name.
        field: &'static str,
        /// The invalid value.
        value: i64,
    },
    /// A required text field is empty.
    EmptyField(&'static str),
    /// A batch enrollment was requested with no students.
    EmptyStudentList,
    /// A batch enrollment listed the same student more than once.
    DuplicateStudentInBatch(i64),
    /// The promotion limit must be at least 1.
    InvalidPromotionLimit(u32),
    /// A timestamp could not be parsed from its stored representation.
    TimestampParseError {
        /// The raw timestamp string.
        value: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityExceeded {
                roster_id,
                max_capacity,
                current_enrollment,
                requested,
            } => {
                write!(
                    f,
                    "Roster {roster_id} is at capacity: {current_enrollment}/{max_capacity} enrolled, {requested} requested"
                )
            }
            Self::AlreadyEnrolled {
                roster_id,
                student_id,
                status,
            } => {
                write!(
                    f,
                    "Student {student_id} already has a membership on roster {roster_id} with status {status}"
                )
            }
            Self::RosterNotFound(id) => write!(f, "Roster {id} not found"),
            Self::StudentNotFound(id) => write!(f, "Student {id} not found"),
            Self::RosterInactive {
                roster_id,
                lifecycle,
            } => {
                write!(
                    f,
                    "Roster {roster_id} is not accepting enrollment (lifecycle: {lifecycle})"
                )
            }
            Self::InsufficientPermissions {
                action,
                required,
                actual,
            } => {
                write!(
                    f,
                    "'{action}' requires at least the {required} role, caller has {actual}"
                )
            }
            Self::InvalidLifecycleState(s) => write!(f, "Invalid roster lifecycle state: {s}"),
            Self::InvalidEnrollmentStatus(s) => write!(f, "Invalid enrollment status: {s}"),
            Self::InvalidEnrollmentType(s) => write!(f, "Invalid enrollment type: {s}"),
            Self::InvalidRole(s) => write!(f, "Invalid role: {s}"),
            Self::InvalidIdentifier { field, value } => {
                write!(f, "Invalid {field}: {value}. Must be a positive identifier")
            }
            Self::EmptyField(field) => write!(f, "Field '{field}' must not be empty"),
            Self::EmptyStudentList => {
                write!(f, "Batch enrollment requires at least one student")
            }
            Self::DuplicateStudentInBatch(id) => {
                write!(f, "Student {id} appears more than once in the batch")
            }
            Self::InvalidPromotionLimit(limit) => {
                write!(f, "Invalid promotion limit: {limit}. Must be at least 1")
            }
            Self::TimestampParseError { value, error } => {
                write!(f, "Failed to parse timestamp '{value}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
