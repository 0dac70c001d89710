// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The batch enrollment coordinator.
//!
//! Applies the single-student transaction to a list of students,
//! sequentially and against one store, so two attempts can never both
//! read "space available" and both land. Per-student failures are
//! isolated; the batch tolerates partial success.

use tracing::{info, warn};

use cert_roster_domain::{
    CapacitySnapshot, DomainError, EnrollmentStatus, EnrollmentType, Role, evaluate_capacity,
    validate_batch_students,
};

use crate::coordinator::{EnrollmentRequest, ServiceContext, enroll_student};
use crate::error::CoreError;
use crate::oracle::load_roster;
use crate::promoter::{PromotionRequest, promote_from_waitlist};
use crate::saga::StepName;

/// A batch enrollment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    /// The roster to enroll into.
    pub roster_id: i64,
    /// The students to enroll, processed in order.
    pub student_ids: Vec<i64>,
    /// Who is performing the enrollment.
    pub performed_by: String,
    /// The caller's role.
    pub role: Role,
    /// How these enrollments came about.
    pub enrollment_type: EnrollmentType,
    /// Optional human context applied to every row.
    pub notes: Option<String>,
    /// Keep going after a per-student failure.
    pub continue_on_error: bool,
    /// Run one best-effort waitlist promotion pass first when the initial
    /// capacity check shows insufficient room.
    pub promote_to_free_capacity: bool,
}

impl BatchRequest {
    /// A batch request with the defaults of the batch context:
    /// `continue_on_error` on, no promotion pre-pass.
    #[must_use]
    pub const fn new(
        roster_id: i64,
        student_ids: Vec<i64>,
        performed_by: String,
        role: Role,
    ) -> Self {
        Self {
            roster_id,
            student_ids,
            performed_by,
            role,
            enrollment_type: EnrollmentType::Standard,
            notes: None,
            continue_on_error: true,
            promote_to_free_capacity: false,
        }
    }
}

/// One student whose enrollment failed.
#[derive(Debug)]
pub struct BatchFailure {
    /// The student.
    pub student_id: i64,
    /// The step that failed, when the transaction began.
    pub failed_step: Option<StepName>,
    /// The underlying error.
    pub error: CoreError,
}

/// Aggregated result of a batch enrollment.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Number of students requested.
    pub total_requested: usize,
    /// Students who landed in `Enrolled` status.
    pub enrolled: Vec<i64>,
    /// Students who landed on the waitlist.
    pub waitlisted: Vec<i64>,
    /// Students whose enrollment failed.
    pub failed: Vec<BatchFailure>,
    /// Capacity as seen before the batch started.
    pub capacity_before: CapacitySnapshot,
    /// Whether the batch stopped at the first failure
    /// (`continue_on_error` off).
    pub stopped_early: bool,
}

impl BatchOutcome {
    /// Whether every requested student was placed (enrolled or waitlisted).
    #[must_use]
    pub fn all_placed(&self) -> bool {
        self.failed.is_empty() && !self.stopped_early
    }
}

/// Enrolls each student in order using the single-student transaction.
///
/// # Errors
///
/// Returns an error only for whole-batch problems: invalid student list,
/// a caller role below the enrollment floor, or a missing roster.
/// Per-student failures are reported in the outcome.
pub fn enroll_multiple_students(
    ctx: &mut ServiceContext<'_>,
    request: &BatchRequest,
) -> Result<BatchOutcome, CoreError> {
    if !request.role.meets(Role::ENROLLMENT_FLOOR) {
        return Err(CoreError::Domain(DomainError::InsufficientPermissions {
            action: "enroll_multiple_students",
            required: Role::ENROLLMENT_FLOOR,
            actual: request.role,
        }));
    }
    validate_batch_students(&request.student_ids)?;
    if request.roster_id <= 0 {
        return Err(CoreError::Domain(DomainError::InvalidIdentifier {
            field: "roster_id",
            value: request.roster_id,
        }));
    }
    if request.performed_by.trim().is_empty() {
        return Err(CoreError::Domain(DomainError::EmptyField("performed_by")));
    }

    let roster = load_roster(ctx.store, request.roster_id)?;
    let current_enrollment = ctx.store.count_enrolled(request.roster_id)?;
    let requested = u32::try_from(request.student_ids.len()).unwrap_or(u32::MAX);
    let capacity_before = evaluate_capacity(&roster, current_enrollment, requested);

    if request.promote_to_free_capacity && !capacity_before.can_enroll {
        // Best-effort pre-pass; a promotion failure never blocks the batch.
        let pre_pass = PromotionRequest {
            roster_id: request.roster_id,
            performed_by: request.performed_by.clone(),
            role: request.role,
            max_promotions: requested.max(1),
            specific_student_id: None,
        };
        if let Err(e) = promote_from_waitlist(ctx, &pre_pass) {
            warn!(
                roster_id = request.roster_id,
                error = %e,
                "promotion pre-pass failed, continuing with batch"
            );
        }
    }

    let mut outcome = BatchOutcome {
        total_requested: request.student_ids.len(),
        enrolled: Vec::new(),
        waitlisted: Vec::new(),
        failed: Vec::new(),
        capacity_before,
        stopped_early: false,
    };

    // Sequential on purpose: all writes for this roster funnel through one
    // path so the capacity invariant holds across the batch.
    for &student_id in &request.student_ids {
        let single = EnrollmentRequest {
            roster_id: request.roster_id,
            student_id,
            performed_by: request.performed_by.clone(),
            role: request.role,
            enrollment_type: request.enrollment_type,
            notes: request.notes.clone(),
            force: false,
        };

        match enroll_student(ctx, &single) {
            Ok(result) => {
                if result.status == EnrollmentStatus::Waitlisted {
                    outcome.waitlisted.push(student_id);
                } else {
                    outcome.enrolled.push(student_id);
                }
            }
            Err(failure) => {
                outcome.failed.push(BatchFailure {
                    student_id,
                    failed_step: failure.failed_step,
                    error: failure.error,
                });
                if !request.continue_on_error {
                    outcome.stopped_early = true;
                    break;
                }
            }
        }
    }

    info!(
        roster_id = request.roster_id,
        requested = outcome.total_requested,
        enrolled = outcome.enrolled.len(),
        waitlisted = outcome.waitlisted.len(),
        failed = outcome.failed.len(),
        "batch enrollment finished"
    );
    Ok(outcome)
}
