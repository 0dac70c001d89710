// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use cert_roster_domain::Role;
use time::OffsetDateTime;

/// The operator that performed an audited action.
///
/// An actor is any identifiable operator that initiates an enrollment
/// action: a registrar at a form, an administrator forcing a seat, or an
/// automated promotion pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditActor {
    /// The operator's identifier (login name or service id).
    pub performed_by: String,
    /// The role the operator held when acting.
    pub role: Role,
}

impl AuditActor {
    /// Creates a new audit actor.
    ///
    /// # Arguments
    ///
    /// * `performed_by` - The operator's identifier
    /// * `role` - The role the operator held when acting
    #[must_use]
    pub const fn new(performed_by: String, role: Role) -> Self {
        Self { performed_by, role }
    }
}

/// An append-only audit log entry.
///
/// Every completed enrollment action produces exactly one entry. Entries
/// are immutable once created and are never deleted by this subsystem;
/// they capture who acted, on which roster and student, when, and a
/// structured JSON details payload (final status, capacity snapshot,
/// flags used).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// The action name (e.g. `"EnrollStudent"`, `"PromoteFromWaitlist"`).
    pub action: String,
    /// The roster the action targeted.
    pub roster_id: i64,
    /// The student the action targeted, when one applies.
    pub student_id: Option<i64>,
    /// The operator that performed the action.
    pub actor: AuditActor,
    /// When the action completed.
    pub timestamp: OffsetDateTime,
    /// Structured details payload.
    pub details: serde_json::Value,
}

impl AuditEntry {
    /// Creates a new audit entry.
    ///
    /// Once created, an entry is immutable.
    ///
    /// # Arguments
    ///
    /// * `action` - The action name
    /// * `roster_id` - The roster the action targeted
    /// * `student_id` - The student the action targeted, if any
    /// * `actor` - The operator that performed the action
    /// * `timestamp` - When the action completed
    /// * `details` - Structured details payload
    #[must_use]
    pub const fn new(
        action: String,
        roster_id: i64,
        student_id: Option<i64>,
        actor: AuditActor,
        timestamp: OffsetDateTime,
        details: serde_json::Value,
    ) -> Self {
        Self {
            action,
            roster_id,
            student_id,
            actor,
            timestamp,
            details,
        }
    }
}
