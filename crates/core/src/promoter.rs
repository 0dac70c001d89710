// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The waitlist promoter.
//!
//! Selects the longest-waiting eligible students (FIFO by `enrolled_at`)
//! and flips them to `Enrolled`, bounded by available capacity and a
//! caller-supplied limit. Unlike the single-student coordinator this path
//! is best-effort per candidate: one failed flip does not abort the rest.

use time::OffsetDateTime;
use tracing::{info, warn};

use cert_roster_audit::{AuditActor, AuditEntry};
use cert_roster_domain::{
    DomainError, EnrollmentRecord, Role, evaluate_capacity, validate_promotion_fields,
};

use crate::coordinator::ServiceContext;
use crate::error::CoreError;
use crate::notify::NotificationRequest;
use crate::oracle::load_roster;

/// Audit action recorded for every successful promotion.
pub const AUDIT_ACTION_PROMOTED: &str = "waitlist_promoted";

/// A waitlist promotion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionRequest {
    /// The roster whose waitlist to promote from.
    pub roster_id: i64,
    /// Who is performing the promotion.
    pub performed_by: String,
    /// The caller's role, compared against the enrollment floor.
    pub role: Role,
    /// Upper bound on the number of students to promote.
    pub max_promotions: u32,
    /// Restrict promotion to this one student, if set.
    pub specific_student_id: Option<i64>,
}

/// One successfully promoted student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotedStudent {
    /// The promoted student.
    pub student_id: i64,
    /// The student's display name, when the profile could be read.
    pub student_name: Option<String>,
    /// The membership row that was flipped.
    pub enrollment_id: i64,
    /// The student's 1-based queue position before promotion.
    pub original_waitlist_position: u32,
}

/// One candidate whose flip failed.
#[derive(Debug)]
pub struct PromotionFailure {
    /// The candidate student.
    pub student_id: i64,
    /// The membership row that could not be flipped.
    pub enrollment_id: i64,
    /// What went wrong.
    pub error: CoreError,
}

/// The result of a promotion pass.
#[derive(Debug)]
pub struct PromotionOutcome {
    /// Number of students promoted.
    pub promoted_count: u32,
    /// The promoted students, in promotion order.
    pub promoted_students: Vec<PromotedStudent>,
    /// Candidates whose flip failed (best-effort, not fatal).
    pub failures: Vec<PromotionFailure>,
    /// Waitlist size re-queried after the pass.
    pub remaining_waitlist: u32,
    /// Human-readable summary of what the pass did.
    pub message: String,
}

/// Promotes up to `max_promotions` waitlisted students, bounded by
/// available capacity.
///
/// Zero available spots is not an error: the pass succeeds with
/// `promoted_count = 0` and a descriptive message.
///
/// # Errors
///
/// Returns an error if the caller's role is below the enrollment floor
/// (checked before any read), the request fields are invalid, the roster
/// is missing or inactive, or the initial reads fail. Per-candidate flip
/// failures are reported in the outcome, not as an error.
pub fn promote_from_waitlist(
    ctx: &mut ServiceContext<'_>,
    request: &PromotionRequest,
) -> Result<PromotionOutcome, CoreError> {
    if !request.role.meets(Role::ENROLLMENT_FLOOR) {
        return Err(CoreError::Domain(DomainError::InsufficientPermissions {
            action: "promote_from_waitlist",
            required: Role::ENROLLMENT_FLOOR,
            actual: request.role,
        }));
    }
    validate_promotion_fields(
        request.roster_id,
        request.max_promotions,
        request.specific_student_id,
    )?;
    if request.performed_by.trim().is_empty() {
        return Err(CoreError::Domain(DomainError::EmptyField("performed_by")));
    }

    let roster = load_roster(ctx.store, request.roster_id)?;
    if !roster.is_active() {
        return Err(CoreError::Domain(DomainError::RosterInactive {
            roster_id: roster.roster_id,
            lifecycle: roster.lifecycle,
        }));
    }

    let current_enrollment = ctx.store.count_enrolled(request.roster_id)?;
    let snapshot = evaluate_capacity(&roster, current_enrollment, 0);

    let limit = match snapshot.available_spots {
        Some(0) => {
            let remaining_waitlist = ctx.store.count_waitlisted(request.roster_id)?;
            return Ok(PromotionOutcome {
                promoted_count: 0,
                promoted_students: Vec::new(),
                failures: Vec::new(),
                remaining_waitlist,
                message: format!(
                    "Roster '{}' has no open spots; nothing to promote",
                    roster.name
                ),
            });
        }
        Some(available) => request.max_promotions.min(available),
        // Unlimited capacity: only the caller's limit applies.
        None => request.max_promotions,
    };

    let waitlist = ctx.store.get_waitlist(request.roster_id)?;
    let candidates: Vec<(u32, EnrollmentRecord)> = waitlist
        .into_iter()
        .enumerate()
        .map(|(index, record)| (u32::try_from(index + 1).unwrap_or(u32::MAX), record))
        .filter(|(_, record)| {
            request
                .specific_student_id
                .is_none_or(|student_id| record.student_id == student_id)
        })
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .collect();

    let mut outcome = PromotionOutcome {
        promoted_count: 0,
        promoted_students: Vec::new(),
        failures: Vec::new(),
        remaining_waitlist: 0,
        message: String::new(),
    };

    for (position, record) in candidates {
        match promote_one(ctx, request, &roster.name, position, &record) {
            Ok(promoted) => {
                outcome.promoted_count += 1;
                outcome.promoted_students.push(promoted);
            }
            Err(error) => {
                warn!(
                    roster_id = request.roster_id,
                    student_id = record.student_id,
                    enrollment_id = record.enrollment_id,
                    error = %error,
                    "waitlist promotion failed for candidate"
                );
                outcome.failures.push(PromotionFailure {
                    student_id: record.student_id,
                    enrollment_id: record.enrollment_id,
                    error,
                });
            }
        }
    }

    outcome.remaining_waitlist = ctx.store.count_waitlisted(request.roster_id)?;
    outcome.message = if outcome.promoted_count == 0 {
        format!("No students promoted on roster '{}'", roster.name)
    } else {
        format!(
            "Promoted {} student(s) on roster '{}'",
            outcome.promoted_count, roster.name
        )
    };

    info!(
        roster_id = request.roster_id,
        promoted = outcome.promoted_count,
        failed = outcome.failures.len(),
        remaining = outcome.remaining_waitlist,
        "waitlist promotion pass finished"
    );
    Ok(outcome)
}

/// Flips one candidate to `Enrolled` and emits the promotion side effects.
///
/// The status flip is the authoritative action. Notification and audit
/// failures after a successful flip are logged and swallowed so the
/// promotion still counts.
fn promote_one(
    ctx: &mut ServiceContext<'_>,
    request: &PromotionRequest,
    roster_name: &str,
    position: u32,
    record: &EnrollmentRecord,
) -> Result<PromotedStudent, CoreError> {
    let now = OffsetDateTime::now_utc();
    ctx.store.promote_enrollment(record.enrollment_id, now, true)?;

    let student_name = match ctx.store.get_student(record.student_id) {
        Ok(profile) => profile.map(|p| p.name),
        Err(e) => {
            warn!(student_id = record.student_id, error = %e, "student read failed after promotion");
            None
        }
    };

    let notification =
        NotificationRequest::promotion_notice(record.student_id, request.roster_id, roster_name);
    if let Err(e) = ctx.notifications.deliver(ctx.store, &notification) {
        warn!(
            student_id = record.student_id,
            error = %e,
            "promotion notification failed"
        );
    }

    let entry = AuditEntry::new(
        String::from(AUDIT_ACTION_PROMOTED),
        request.roster_id,
        Some(record.student_id),
        AuditActor::new(request.performed_by.clone(), request.role),
        now,
        serde_json::json!({
            "enrollment_id": record.enrollment_id,
            "original_waitlist_position": position,
        }),
    );
    if let Err(e) = ctx.store.append_audit_entry(&entry) {
        warn!(
            student_id = record.student_id,
            error = %e,
            "promotion audit entry failed"
        );
    }

    Ok(PromotedStudent {
        student_id: record.student_id,
        student_name,
        enrollment_id: record.enrollment_id,
        original_waitlist_position: position,
    })
}
