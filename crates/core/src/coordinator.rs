// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The enrollment transaction coordinator.
//!
//! Executes the seven ordered steps of a single-student enrollment and
//! unwinds completed writes in reverse order on any failure. The
//! coordinator never retries; retry policy belongs to the caller.

use time::OffsetDateTime;
use tracing::{error, info, warn};

use cert_roster_audit::{AuditActor, AuditEntry};
use cert_roster_domain::{
    CapacitySnapshot, DomainError, EnrollmentStatus, EnrollmentType, Role, evaluate_capacity,
    validate_enrollment_fields,
};
use cert_roster_persistence::{Persistence, PersistenceError};

use crate::config::CoordinatorConfig;
use crate::error::CoreError;
use crate::notify::{NotificationRequest, NotificationSink};
use crate::oracle::load_roster;
use crate::registry::TransactionRegistry;
use crate::saga::{Compensation, SagaLog, StepName, TOTAL_STEPS, generate_transaction_id};

/// Audit action recorded for every completed enrollment.
pub const AUDIT_ACTION_ENROLLED: &str = "student_enrolled";

/// Mutable collaborators threaded through every coordinator call.
pub struct ServiceContext<'a> {
    /// The backing store.
    pub store: &'a mut Persistence,
    /// The notification collaborator.
    pub notifications: &'a mut dyn NotificationSink,
    /// Registry of in-flight transactions.
    pub registry: &'a mut TransactionRegistry,
    /// Coordinator configuration.
    pub config: &'a CoordinatorConfig,
}

/// A single-student enrollment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRequest {
    /// The roster to enroll into.
    pub roster_id: i64,
    /// The student to enroll.
    pub student_id: i64,
    /// Who is performing the enrollment.
    pub performed_by: String,
    /// The caller's role, compared against the enrollment floor.
    pub role: Role,
    /// How this enrollment came about.
    pub enrollment_type: EnrollmentType,
    /// Optional human context.
    pub notes: Option<String>,
    /// Privileged override that enrolls past stated capacity.
    pub force: bool,
}

impl EnrollmentRequest {
    /// A standard enrollment request without force or notes.
    #[must_use]
    pub const fn standard(
        roster_id: i64,
        student_id: i64,
        performed_by: String,
        role: Role,
    ) -> Self {
        Self {
            roster_id,
            student_id,
            performed_by,
            role,
            enrollment_type: EnrollmentType::Standard,
            notes: None,
            force: false,
        }
    }
}

/// The result of a completed enrollment transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentOutcome {
    /// The transaction identifier.
    pub transaction_id: String,
    /// The new membership row.
    pub enrollment_id: i64,
    /// The status the student landed in.
    pub status: EnrollmentStatus,
    /// Capacity as seen before the insert.
    pub capacity_before: CapacitySnapshot,
    /// Capacity re-read after the insert.
    pub capacity_after: CapacitySnapshot,
    /// The delivered notification.
    pub notification_id: i64,
    /// The appended audit entry.
    pub audit_id: i64,
    /// Always [`TOTAL_STEPS`] on success.
    pub steps_completed: usize,
    /// Total steps in the sequence.
    pub total_steps: usize,
}

/// A structured enrollment failure.
///
/// Always returned in place of a bare error so callers can render a
/// specific, actionable message.
#[derive(Debug)]
pub struct EnrollmentFailure {
    /// The transaction identifier, when the sequence began.
    pub transaction_id: Option<String>,
    /// The step that failed. `None` means the request was rejected
    /// before step one began (validation or permission).
    pub failed_step: Option<StepName>,
    /// Steps completed before the failure.
    pub steps_completed: usize,
    /// Total steps in the sequence.
    pub total_steps: usize,
    /// Whether all completed writes were successfully unwound.
    pub rolled_back: bool,
    /// The underlying error.
    pub error: CoreError,
}

impl EnrollmentFailure {
    fn rejected(error: CoreError) -> Self {
        Self {
            transaction_id: None,
            failed_step: None,
            steps_completed: 0,
            total_steps: TOTAL_STEPS,
            rolled_back: true,
            error,
        }
    }
}

/// Checks role floors and field validity before the sequence begins.
///
/// A non-privileged force request fails here, before any read runs.
fn precheck(request: &EnrollmentRequest) -> Result<(), DomainError> {
    validate_enrollment_fields(request.roster_id, request.student_id, &request.performed_by)?;

    if !request.role.meets(Role::ENROLLMENT_FLOOR) {
        return Err(DomainError::InsufficientPermissions {
            action: "enroll_student",
            required: Role::ENROLLMENT_FLOOR,
            actual: request.role,
        });
    }
    if request.force && !request.role.meets(Role::FORCE_FLOOR) {
        return Err(DomainError::InsufficientPermissions {
            action: "force_enrollment",
            required: Role::FORCE_FLOOR,
            actual: request.role,
        });
    }
    Ok(())
}

/// Attempts to create exactly one enrollment record with its notification
/// and audit entry, or fails leaving no partial state.
///
/// # Errors
///
/// Returns a structured [`EnrollmentFailure`] naming the failed step, the
/// number of completed steps, and whether the unwind succeeded.
pub fn enroll_student(
    ctx: &mut ServiceContext<'_>,
    request: &EnrollmentRequest,
) -> Result<EnrollmentOutcome, EnrollmentFailure> {
    if let Err(e) = precheck(request) {
        warn!(
            roster_id = request.roster_id,
            student_id = request.student_id,
            error = %e,
            "enrollment rejected before transaction start"
        );
        return Err(EnrollmentFailure::rejected(CoreError::Domain(e)));
    }

    let transaction_id = generate_transaction_id();
    let mut log = SagaLog::new(transaction_id.clone());
    ctx.registry.begin(log.clone());

    info!(
        transaction_id = %transaction_id,
        roster_id = request.roster_id,
        student_id = request.student_id,
        force = request.force,
        "enrollment transaction started"
    );

    match execute_steps(ctx, request, &mut log) {
        Ok(outcome) => {
            ctx.registry.complete(&transaction_id);
            info!(
                transaction_id = %transaction_id,
                enrollment_id = outcome.enrollment_id,
                status = %outcome.status,
                "enrollment transaction completed"
            );
            Ok(outcome)
        }
        Err((failed_step, error)) => {
            let steps_completed = log.steps_completed();
            error!(
                transaction_id = %transaction_id,
                failed_step = %failed_step,
                steps_completed,
                error = %error,
                "enrollment transaction failed, unwinding"
            );

            let rolled_back = match log.compensate(ctx.store, ctx.notifications) {
                Ok(_) => {
                    ctx.registry.complete(&transaction_id);
                    true
                }
                Err(rollback_error) => {
                    // Leave the partially unwound log registered so an
                    // operator can retry via emergency rollback.
                    error!(
                        transaction_id = %transaction_id,
                        error = %rollback_error,
                        "rollback incomplete"
                    );
                    ctx.registry.begin(log);
                    false
                }
            };

            Err(EnrollmentFailure {
                transaction_id: Some(transaction_id),
                failed_step: Some(failed_step),
                steps_completed,
                total_steps: TOTAL_STEPS,
                rolled_back,
                error,
            })
        }
    }
}

type StepResult<T> = Result<T, (StepName, CoreError)>;

fn fail(step: StepName) -> impl FnOnce(CoreError) -> (StepName, CoreError) {
    move |e| (step, e)
}

/// Runs the seven steps in order, recording progress in the log.
fn execute_steps(
    ctx: &mut ServiceContext<'_>,
    request: &EnrollmentRequest,
    log: &mut SagaLog,
) -> StepResult<EnrollmentOutcome> {
    // Step 1: validate capacity for one more student.
    let step = StepName::ValidateCapacity;
    let roster = load_roster(ctx.store, request.roster_id).map_err(fail(step))?;
    if !roster.is_active() {
        return Err((
            step,
            CoreError::Domain(DomainError::RosterInactive {
                roster_id: roster.roster_id,
                lifecycle: roster.lifecycle,
            }),
        ));
    }
    let current_enrollment = ctx
        .store
        .count_enrolled(request.roster_id)
        .map_err(|e| (step, CoreError::Persistence(e)))?;
    let capacity_before = evaluate_capacity(&roster, current_enrollment, 1);
    if !capacity_before.can_enroll && !request.force {
        return Err((
            step,
            CoreError::Domain(DomainError::CapacityExceeded {
                roster_id: request.roster_id,
                max_capacity: capacity_before.max_capacity.unwrap_or(0),
                current_enrollment,
                requested: 1,
            }),
        ));
    }
    log.record_step(step);

    // Step 2: reject a duplicate membership row.
    let step = StepName::CheckDuplicate;
    let existing = ctx
        .store
        .find_enrollment(request.roster_id, request.student_id)
        .map_err(|e| (step, CoreError::Persistence(e)))?;
    if let Some(record) = existing {
        return Err((
            step,
            CoreError::Domain(DomainError::AlreadyEnrolled {
                roster_id: request.roster_id,
                student_id: request.student_id,
                status: record.status,
            }),
        ));
    }
    log.record_step(step);

    // Step 3: confirm the student profile exists.
    let step = StepName::ValidateStudent;
    ctx.store
        .get_student(request.student_id)
        .map_err(|e| (step, CoreError::Persistence(e)))?
        .ok_or_else(|| {
            (
                step,
                CoreError::Domain(DomainError::StudentNotFound(request.student_id)),
            )
        })?;
    log.record_step(step);

    // Step 4: insert the membership row.
    let step = StepName::CreateEnrollment;
    let (enrollment_id, status) = insert_membership(ctx.store, request).map_err(fail(step))?;
    log.record_step(step);
    log.register_compensation(Compensation::DeleteEnrollment(enrollment_id));
    checkpoint(ctx.registry, log);

    // Step 5: re-read capacity for caller visibility.
    let step = StepName::RecomputeCapacity;
    let roster = load_roster(ctx.store, request.roster_id).map_err(fail(step))?;
    let current_enrollment = ctx
        .store
        .count_enrolled(request.roster_id)
        .map_err(|e| (step, CoreError::Persistence(e)))?;
    let capacity_after = evaluate_capacity(&roster, current_enrollment, 0);
    log.record_step(step);

    // Step 6: deliver the outcome notification.
    let step = StepName::CreateNotification;
    let notification = NotificationRequest::enrollment_outcome(
        request.student_id,
        request.roster_id,
        &roster.name,
        status,
    );
    let notification_id = ctx
        .notifications
        .deliver(ctx.store, &notification)
        .map_err(fail(step))?;
    log.record_step(step);
    log.register_compensation(Compensation::RevokeNotification(notification_id));
    checkpoint(ctx.registry, log);

    // Step 7: append the audit entry. Runs last so a failure here unwinds
    // the enrollment and notification writes.
    let step = StepName::CreateAuditEntry;
    let entry = AuditEntry::new(
        String::from(AUDIT_ACTION_ENROLLED),
        request.roster_id,
        Some(request.student_id),
        AuditActor::new(request.performed_by.clone(), request.role),
        OffsetDateTime::now_utc(),
        serde_json::json!({
            "status": status.as_str(),
            "enrollment_type": request.enrollment_type.as_str(),
            "force": request.force,
            "notes": request.notes,
            "capacity_after": {
                "current_enrollment": capacity_after.current_enrollment,
                "max_capacity": capacity_after.max_capacity,
                "available_spots": capacity_after.available_spots,
            },
        }),
    );
    let audit_id = ctx
        .store
        .append_audit_entry(&entry)
        .map_err(|e| (step, CoreError::Persistence(e)))?;
    log.record_step(step);

    Ok(EnrollmentOutcome {
        transaction_id: log.transaction_id.clone(),
        enrollment_id,
        status,
        capacity_before,
        capacity_after,
        notification_id,
        audit_id,
        steps_completed: log.steps_completed(),
        total_steps: TOTAL_STEPS,
    })
}

/// Inserts the membership row, falling back to the waitlist when the
/// store's write-time constraint rejects an insert the pre-check approved.
///
/// The pre-check-to-write race window is accepted by design; the store's
/// rejection is treated as final truth.
fn insert_membership(
    store: &mut Persistence,
    request: &EnrollmentRequest,
) -> Result<(i64, EnrollmentStatus), CoreError> {
    let now = OffsetDateTime::now_utc();
    let attempt = store.insert_enrollment(
        request.roster_id,
        request.student_id,
        EnrollmentStatus::Enrolled,
        request.enrollment_type,
        now,
        request.notes.as_deref(),
        !request.force,
    );

    match attempt {
        Ok(enrollment_id) => Ok((enrollment_id, EnrollmentStatus::Enrolled)),
        Err(PersistenceError::CapacityConstraintViolation { roster_id, .. }) if !request.force => {
            warn!(
                roster_id,
                student_id = request.student_id,
                "store rejected enrolled insert after pre-check passed, waitlisting"
            );
            let enrollment_id = store.insert_enrollment(
                request.roster_id,
                request.student_id,
                EnrollmentStatus::Waitlisted,
                request.enrollment_type,
                now,
                request.notes.as_deref(),
                true,
            )?;
            Ok((enrollment_id, EnrollmentStatus::Waitlisted))
        }
        Err(e) => Err(CoreError::Persistence(e)),
    }
}

/// Re-registers the current log so an operator-triggered rollback sees
/// every compensation registered so far.
fn checkpoint(registry: &mut TransactionRegistry, log: &SagaLog) {
    registry.begin(log.clone());
}
