// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Represents the lifecycle state of a roster.
///
/// Only `Active` rosters accept enrollment and promotion actions.
/// The remaining states fail fast with `RosterInactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RosterLifecycle {
    /// Roster is open for enrollment and promotion.
    #[default]
    Active,
    /// Roster is temporarily closed to enrollment.
    Inactive,
    /// Roster is retired. Records are kept for history only.
    Archived,
}

impl RosterLifecycle {
    /// Converts this lifecycle state to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Archived => "Archived",
        }
    }
}

impl FromStr for RosterLifecycle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            "Archived" => Ok(Self::Archived),
            _ => Err(DomainError::InvalidLifecycleState(s.to_string())),
        }
    }
}

impl std::fmt::Display for RosterLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a roster membership record.
///
/// Only `Enrolled` rows count against roster capacity. The
/// `Waitlisted -> Enrolled` transition happens exclusively through the
/// waitlist promoter; `Completed` and `Cancelled` are set by later
/// workflows outside this subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    /// The student holds a seat on the roster.
    Enrolled,
    /// The student is queued for a seat, FIFO by `enrolled_at`.
    Waitlisted,
    /// The student finished the training.
    Completed,
    /// The membership was cancelled.
    Cancelled,
}

impl EnrollmentStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enrolled => "Enrolled",
            Self::Waitlisted => "Waitlisted",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether a row in this status occupies a capacity seat.
    #[must_use]
    pub const fn counts_against_capacity(&self) -> bool {
        matches!(self, Self::Enrolled)
    }
}

impl FromStr for EnrollmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Enrolled" => Ok(Self::Enrolled),
            "Waitlisted" => Ok(Self::Waitlisted),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidEnrollmentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of how an enrollment was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EnrollmentType {
    /// Ordinary enrollment through the standard path.
    #[default]
    Standard,
    /// Transfer from another roster.
    Transfer,
    /// Administrative placement (corrections, make-ups).
    Administrative,
}

impl EnrollmentType {
    /// Converts this enrollment type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Transfer => "Transfer",
            Self::Administrative => "Administrative",
        }
    }
}

impl FromStr for EnrollmentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Standard" => Ok(Self::Standard),
            "Transfer" => Ok(Self::Transfer),
            "Administrative" => Ok(Self::Administrative),
            _ => Err(DomainError::InvalidEnrollmentType(s.to_string())),
        }
    }
}

impl std::fmt::Display for EnrollmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Actor roles for authorization, ordered by privilege.
///
/// Roles apply to the operators driving enrollment actions, never to the
/// students being enrolled. The derived ordering is the authorization
/// comparison: a role meets a floor when it compares greater or equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Read-only access. May not manage enrollment.
    Viewer,
    /// Course instructor. May not manage enrollment.
    Instructor,
    /// Enrollment management: enroll, batch-enroll, promote.
    Registrar,
    /// Full authority, including force enrollment past capacity.
    Administrator,
}

impl Role {
    /// Minimum role for enrollment-management actions.
    pub const ENROLLMENT_FLOOR: Self = Self::Registrar;

    /// Minimum role for force enrollment past stated capacity.
    pub const FORCE_FLOOR: Self = Self::Administrator;

    /// Whether this role meets or exceeds the given floor.
    #[must_use]
    pub fn meets(self, floor: Self) -> bool {
        self >= floor
    }

    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "Viewer",
            Self::Instructor => "Instructor",
            Self::Registrar => "Registrar",
            Self::Administrator => "Administrator",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Viewer" => Ok(Self::Viewer),
            "Instructor" => Ok(Self::Instructor),
            "Registrar" => Ok(Self::Registrar),
            "Administrator" => Ok(Self::Administrator),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A roster: a named group with an optional capacity limit.
///
/// `max_capacity` of `None` means unlimited. The current enrollment count
/// is derived from membership rows by the store and never carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// The unique roster identifier.
    pub roster_id: i64,
    /// The roster's display name.
    pub name: String,
    /// Maximum number of enrolled seats. `None` means unlimited.
    pub max_capacity: Option<u32>,
    /// The roster's lifecycle state.
    pub lifecycle: RosterLifecycle,
}

impl Roster {
    /// Creates a new roster record.
    #[must_use]
    pub const fn new(
        roster_id: i64,
        name: String,
        max_capacity: Option<u32>,
        lifecycle: RosterLifecycle,
    ) -> Self {
        Self {
            roster_id,
            name,
            max_capacity,
            lifecycle,
        }
    }

    /// Whether this roster currently accepts enrollment actions.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle == RosterLifecycle::Active
    }
}

/// A student profile, referenced by enrollment records.
///
/// This subsystem treats student profiles as read-only: a profile must
/// exist before a membership row may reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// The unique student identifier.
    pub student_id: i64,
    /// The student's display name.
    pub name: String,
    /// Optional contact address used by notifications.
    pub email: Option<String>,
}

impl StudentProfile {
    /// Creates a new student profile record.
    #[must_use]
    pub const fn new(student_id: i64, name: String, email: Option<String>) -> Self {
        Self {
            student_id,
            name,
            email,
        }
    }
}

/// A roster membership row linking one student to one roster.
///
/// A given student has at most one membership row per roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    /// The unique enrollment identifier.
    pub enrollment_id: i64,
    /// The roster this membership belongs to.
    pub roster_id: i64,
    /// The enrolled student.
    pub student_id: i64,
    /// The membership status.
    pub status: EnrollmentStatus,
    /// How the enrollment was initiated.
    pub enrollment_type: EnrollmentType,
    /// Creation time. FIFO ordering key for the waitlist.
    pub enrolled_at: OffsetDateTime,
    /// Last modification time.
    pub updated_at: OffsetDateTime,
    /// Optional free-text notes for human context.
    pub notes: Option<String>,
}
