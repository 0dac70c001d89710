// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ordered enrollment steps and their compensations.
//!
//! A single-student enrollment is a fixed sequence of named steps. Steps
//! that write register a typed compensation; on failure the completed
//! compensations replay in reverse order so no partial state survives.

use std::time::{SystemTime, UNIX_EPOCH};

use time::OffsetDateTime;
use tracing::{error, warn};

use cert_roster_persistence::Persistence;

use crate::error::CoreError;
use crate::notify::NotificationSink;

/// The ordered steps of a single-student enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepName {
    /// Read the roster and confirm capacity for one more student.
    ValidateCapacity,
    /// Reject a second membership row for the same (roster, student) pair.
    CheckDuplicate,
    /// Confirm the student profile exists.
    ValidateStudent,
    /// Insert the membership row.
    CreateEnrollment,
    /// Re-read capacity after the insert for caller visibility.
    RecomputeCapacity,
    /// Deliver the outcome notification.
    CreateNotification,
    /// Append the audit entry.
    CreateAuditEntry,
}

impl StepName {
    /// All steps in execution order.
    pub const ALL: [Self; 7] = [
        Self::ValidateCapacity,
        Self::CheckDuplicate,
        Self::ValidateStudent,
        Self::CreateEnrollment,
        Self::RecomputeCapacity,
        Self::CreateNotification,
        Self::CreateAuditEntry,
    ];

    /// Stable step name for logs and failure reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidateCapacity => "validate_capacity",
            Self::CheckDuplicate => "check_duplicate",
            Self::ValidateStudent => "validate_student",
            Self::CreateEnrollment => "create_enrollment",
            Self::RecomputeCapacity => "recompute_capacity",
            Self::CreateNotification => "create_notification",
            Self::CreateAuditEntry => "create_audit_entry",
        }
    }
}

impl std::fmt::Display for StepName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Total number of steps in a single-student enrollment.
pub const TOTAL_STEPS: usize = StepName::ALL.len();

/// A registered undo action for one completed write step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compensation {
    /// Delete the membership row inserted by `CreateEnrollment`.
    DeleteEnrollment(i64),
    /// Revoke the notification delivered by `CreateNotification`.
    RevokeNotification(i64),
}

/// Generates a unique transaction identifier.
#[must_use]
pub fn generate_transaction_id() -> String {
    let timestamp: u128 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0))
        .as_nanos();
    format!("txn_{timestamp}_{}", rand::random::<u64>())
}

/// The in-flight record of one enrollment transaction.
#[derive(Debug, Clone)]
pub struct SagaLog {
    /// Unique identifier for this transaction.
    pub transaction_id: String,
    /// When the transaction began.
    pub started_at: OffsetDateTime,
    /// Steps completed so far, in execution order.
    completed: Vec<StepName>,
    /// Registered undo actions, in registration order.
    compensations: Vec<Compensation>,
}

impl SagaLog {
    /// Starts a new transaction log.
    #[must_use]
    pub fn new(transaction_id: String) -> Self {
        Self {
            transaction_id,
            started_at: OffsetDateTime::now_utc(),
            completed: Vec::with_capacity(TOTAL_STEPS),
            compensations: Vec::new(),
        }
    }

    /// Records a completed step.
    pub fn record_step(&mut self, step: StepName) {
        self.completed.push(step);
    }

    /// Registers an undo action for the most recent write.
    pub fn register_compensation(&mut self, compensation: Compensation) {
        self.compensations.push(compensation);
    }

    /// Number of steps completed so far.
    #[must_use]
    pub fn steps_completed(&self) -> usize {
        self.completed.len()
    }

    /// Whether any write with a registered undo action has run.
    #[must_use]
    pub fn has_pending_writes(&self) -> bool {
        !self.compensations.is_empty()
    }

    /// Replays the registered compensations in reverse order.
    ///
    /// Returns the number of compensations applied. A failed compensation
    /// aborts the unwind and stays registered, along with everything below
    /// it, so a later retry (operator-triggered emergency rollback) can
    /// still reach every outstanding write.
    ///
    /// # Errors
    ///
    /// Returns `RollbackFailed` if any compensation fails.
    pub fn compensate(
        &mut self,
        store: &mut Persistence,
        sink: &mut dyn NotificationSink,
    ) -> Result<usize, CoreError> {
        let mut applied = 0;
        while let Some(compensation) = self.compensations.last().copied() {
            let result = match compensation {
                Compensation::DeleteEnrollment(enrollment_id) => store
                    .delete_enrollment(enrollment_id)
                    .map_err(CoreError::from),
                Compensation::RevokeNotification(notification_id) => {
                    sink.revoke(store, notification_id)
                }
            };

            if let Err(e) = result {
                error!(
                    transaction_id = %self.transaction_id,
                    ?compensation,
                    error = %e,
                    "compensation failed, aborting unwind"
                );
                return Err(CoreError::RollbackFailed {
                    transaction_id: self.transaction_id.clone(),
                    message: format!("{compensation:?}: {e}"),
                });
            }

            // Drop the compensation only once its write is undone.
            self.compensations.pop();
            warn!(
                transaction_id = %self.transaction_id,
                ?compensation,
                "compensation applied"
            );
            applied += 1;
        }
        Ok(applied)
    }
}
