// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error codes and classification for the service boundary.
//!
//! Every failure crossing the boundary carries a stable code plus a
//! classification telling the caller whether to retry, whether the
//! waitlist is a viable alternative, and what to suggest to the user.

use serde::{Deserialize, Serialize};

use cert_roster::CoreError;
use cert_roster_domain::DomainError;
use cert_roster_persistence::PersistenceError;

/// Stable error codes carried on every boundary failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The roster is full and force was not used.
    CapacityExceeded,
    /// The student already holds a membership row.
    AlreadyEnrolled,
    /// The roster does not exist.
    RosterNotFound,
    /// The student profile does not exist.
    StudentNotFound,
    /// The roster is not accepting enrollment actions.
    RosterInactive,
    /// The caller's role is below the required floor.
    InsufficientPermissions,
    /// Infrastructure-level store failure.
    DatabaseError,
    /// The transaction sequence failed mid-flight.
    TransactionFailed,
    /// Malformed input.
    ValidationError,
}

impl ErrorCode {
    /// The code's wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CapacityExceeded => "CAPACITY_EXCEEDED",
            Self::AlreadyEnrolled => "ALREADY_ENROLLED",
            Self::RosterNotFound => "ROSTER_NOT_FOUND",
            Self::StudentNotFound => "STUDENT_NOT_FOUND",
            Self::RosterInactive => "ROSTER_INACTIVE",
            Self::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::TransactionFailed => "TRANSACTION_FAILED",
            Self::ValidationError => "VALIDATION_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Caller guidance derived from an error code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorClassification {
    /// Whether an identical retry can reasonably succeed.
    pub should_retry: bool,
    /// What the caller should do next.
    pub suggested_action: String,
    /// Alternatives worth presenting to the user.
    pub alternative_options: Vec<String>,
    /// Whether the waitlist is a viable path for this failure.
    pub can_use_waitlist: bool,
}

/// Classifies an error code into caller guidance.
#[must_use]
pub fn classify(code: ErrorCode) -> ErrorClassification {
    match code {
        ErrorCode::CapacityExceeded => ErrorClassification {
            should_retry: false,
            suggested_action: String::from("Add the student to the waitlist or increase capacity"),
            alternative_options: vec![
                String::from("Join the waitlist"),
                String::from("Increase the roster's capacity"),
                String::from("Use force enrollment with administrator approval"),
            ],
            can_use_waitlist: true,
        },
        ErrorCode::AlreadyEnrolled => ErrorClassification {
            should_retry: false,
            suggested_action: String::from("The student already has a membership on this roster"),
            alternative_options: Vec::new(),
            can_use_waitlist: false,
        },
        ErrorCode::RosterNotFound | ErrorCode::StudentNotFound => ErrorClassification {
            should_retry: false,
            suggested_action: String::from("Verify the identifier and try again"),
            alternative_options: Vec::new(),
            can_use_waitlist: false,
        },
        ErrorCode::RosterInactive => ErrorClassification {
            should_retry: false,
            suggested_action: String::from("Reactivate the roster before enrolling"),
            alternative_options: Vec::new(),
            can_use_waitlist: false,
        },
        ErrorCode::InsufficientPermissions => ErrorClassification {
            should_retry: false,
            suggested_action: String::from("Escalate to a user with enrollment-management access"),
            alternative_options: Vec::new(),
            can_use_waitlist: false,
        },
        ErrorCode::DatabaseError | ErrorCode::TransactionFailed => ErrorClassification {
            should_retry: true,
            suggested_action: String::from("Transient infrastructure failure; retry the request"),
            alternative_options: Vec::new(),
            can_use_waitlist: false,
        },
        ErrorCode::ValidationError => ErrorClassification {
            should_retry: false,
            suggested_action: String::from("Correct the request fields and resubmit"),
            alternative_options: Vec::new(),
            can_use_waitlist: false,
        },
    }
}

/// Maps a core error to its boundary code.
#[must_use]
pub fn code_for(error: &CoreError) -> ErrorCode {
    match error {
        CoreError::Domain(domain) => match domain {
            DomainError::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            DomainError::AlreadyEnrolled { .. } => ErrorCode::AlreadyEnrolled,
            DomainError::RosterNotFound(_) => ErrorCode::RosterNotFound,
            DomainError::StudentNotFound(_) => ErrorCode::StudentNotFound,
            DomainError::RosterInactive { .. } => ErrorCode::RosterInactive,
            DomainError::InsufficientPermissions { .. } => ErrorCode::InsufficientPermissions,
            _ => ErrorCode::ValidationError,
        },
        CoreError::Persistence(persistence) => match persistence {
            // The store's write-time constraint is authoritative; surface
            // it under the same code as the pre-check rejection.
            PersistenceError::CapacityConstraintViolation { .. } => ErrorCode::CapacityExceeded,
            _ => ErrorCode::DatabaseError,
        },
        CoreError::NotificationDeliveryFailed(_) | CoreError::RollbackFailed { .. } => {
            ErrorCode::TransactionFailed
        }
        CoreError::TransactionNotFound(_) => ErrorCode::ValidationError,
    }
}

/// The structured error payload carried on unsuccessful responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// The stable error code.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
    /// Caller guidance.
    pub classification: ErrorClassification,
}

impl ErrorPayload {
    /// Builds the payload for a core error.
    #[must_use]
    pub fn from_core(error: &CoreError) -> Self {
        let code = code_for(error);
        Self {
            code,
            message: error.to_string(),
            classification: classify(code),
        }
    }

    /// Builds the payload for an explicit code and message.
    #[must_use]
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            classification: classify(code),
        }
    }
}
