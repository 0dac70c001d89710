// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response shapes for the service boundary.
//!
//! Every operation returns a structured response with a `success` flag;
//! failures are carried as an [`ErrorPayload`], never as a bare error.

use serde::{Deserialize, Serialize};

use cert_roster_domain::{
    CapacitySnapshot, EnrollmentStatus, EnrollmentType, Role, WaitlistSummary,
};

use crate::error::ErrorPayload;

/// Request to enroll a single student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollStudentRequest {
    /// The roster to enroll into.
    pub roster_id: i64,
    /// The student to enroll.
    pub student_id: i64,
    /// Who is performing the enrollment.
    pub enrolled_by: String,
    /// The caller's role.
    pub user_role: Role,
    /// How this enrollment came about.
    #[serde(default)]
    pub enrollment_type: EnrollmentType,
    /// Optional human context.
    #[serde(default)]
    pub notes: Option<String>,
    /// Privileged override past stated capacity.
    #[serde(default)]
    pub force_enrollment: bool,
}

/// The membership row created by a successful enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentSummary {
    /// The new membership row.
    pub enrollment_id: i64,
    /// The status the student landed in.
    pub status: EnrollmentStatus,
}

/// Response to a single-student enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollStudentResponse {
    /// Whether the student was placed.
    pub success: bool,
    /// The transaction identifier, when the sequence began.
    pub transaction_id: Option<String>,
    /// The created membership row, on success.
    pub enrollment: Option<EnrollmentSummary>,
    /// Capacity re-read after the insert, on success.
    pub capacity: Option<CapacitySnapshot>,
    /// The delivered notification, on the primary path.
    pub notification_id: Option<i64>,
    /// The appended audit entry, on the primary path.
    pub audit_id: Option<i64>,
    /// Steps completed before success or failure.
    pub steps_completed: usize,
    /// Total steps in the sequence.
    pub total_steps: usize,
    /// Whether the degraded legacy path produced this result.
    pub used_fallback: bool,
    /// Why the fallback was taken, when it was.
    pub fallback_reason: Option<String>,
    /// The failure, when `success` is false.
    pub error: Option<ErrorPayload>,
}

/// Request to enroll a list of students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEnrollRequest {
    /// The roster to enroll into.
    pub roster_id: i64,
    /// The students to enroll, processed in order.
    pub student_ids: Vec<i64>,
    /// Who is performing the enrollment.
    pub enrolled_by: String,
    /// The caller's role.
    pub user_role: Role,
    /// How these enrollments came about.
    #[serde(default)]
    pub enrollment_type: EnrollmentType,
    /// Optional human context applied to every row.
    #[serde(default)]
    pub notes: Option<String>,
    /// Keep going after a per-student failure.
    #[serde(default = "default_true")]
    pub continue_on_error: bool,
    /// Run a best-effort promotion pass first when room is short.
    #[serde(default)]
    pub promote_to_free_capacity: bool,
}

const fn default_true() -> bool {
    true
}

/// One student whose enrollment failed in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedStudent {
    /// The student.
    pub student_id: i64,
    /// The failure.
    pub error: ErrorPayload,
}

/// Per-status breakdown of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BatchSummary {
    /// Students who landed in `Enrolled` status.
    pub enrolled: Vec<i64>,
    /// Students who landed on the waitlist.
    pub waitlisted: Vec<i64>,
    /// Students whose enrollment failed.
    pub failed: Vec<FailedStudent>,
}

/// Response to a batch enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEnrollResponse {
    /// Whether every requested student was placed.
    pub success: bool,
    /// Number of students requested.
    pub total_requested: usize,
    /// Number placed (enrolled or waitlisted).
    pub successful_enrollments: usize,
    /// Number that failed.
    pub failed_enrollments: usize,
    /// Per-status breakdown.
    pub summary: BatchSummary,
    /// Capacity as seen before the batch started.
    pub capacity_before: Option<CapacitySnapshot>,
    /// Whether the batch stopped at the first failure.
    pub stopped_early: bool,
    /// A whole-batch failure (validation, permission, missing roster).
    pub error: Option<ErrorPayload>,
}

/// Request for a capacity report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckCapacityRequest {
    /// The roster to report on.
    pub roster_id: i64,
    /// Additional students the caller wants to place.
    #[serde(default)]
    pub additional_students: u32,
    /// Whether to include the ordered waitlist.
    #[serde(default)]
    pub include_waitlist: bool,
}

/// Response to a capacity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckCapacityResponse {
    /// Whether the report was produced.
    pub success: bool,
    /// The capacity snapshot, on success.
    pub capacity: Option<CapacitySnapshot>,
    /// The ordered waitlist, when requested.
    pub waitlist: Option<WaitlistSummary>,
    /// Advisory follow-up actions.
    pub recommendations: Vec<String>,
    /// Advisory warnings.
    pub warnings: Vec<String>,
    /// The failure, when `success` is false.
    pub error: Option<ErrorPayload>,
}

/// Request to promote waitlisted students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoteFromWaitlistRequest {
    /// The roster whose waitlist to promote from.
    pub roster_id: i64,
    /// Who is performing the promotion.
    pub promoted_by: String,
    /// The caller's role.
    pub user_role: Role,
    /// Upper bound on promotions.
    #[serde(default = "default_max_promotions")]
    pub max_promotions: u32,
    /// Restrict promotion to this one student.
    #[serde(default)]
    pub specific_student_id: Option<i64>,
}

const fn default_max_promotions() -> u32 {
    1
}

/// One promoted student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotedStudentSummary {
    /// The promoted student.
    pub student_id: i64,
    /// The student's display name, when readable.
    pub student_name: Option<String>,
    /// The membership row that was flipped.
    pub enrollment_id: i64,
    /// 1-based queue position before promotion.
    pub original_waitlist_position: u32,
}

/// Response to a waitlist promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoteFromWaitlistResponse {
    /// Whether the pass ran (zero promotions is still a success).
    pub success: bool,
    /// Number of students promoted.
    pub promoted_count: u32,
    /// The promoted students, in promotion order.
    pub promoted_students: Vec<PromotedStudentSummary>,
    /// Waitlist size re-queried after the pass.
    pub remaining_waitlist: u32,
    /// Human-readable summary.
    pub message: String,
    /// The failure, when `success` is false.
    pub error: Option<ErrorPayload>,
}

/// Aggregate service health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    /// Database reachable, no stuck transactions.
    Healthy,
    /// Reachable but with stuck transactions needing operator attention.
    Degraded,
    /// Database unreachable.
    Unhealthy,
}

/// Capability flags of the service as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthFeatures {
    /// Whether the degraded legacy fallback path is enabled.
    pub legacy_fallback: bool,
    /// Whether the store enforces capacity at write time. Always true on
    /// the primary path; reported so operators can see it alongside the
    /// fallback flag that bypasses it.
    pub capacity_enforcement: bool,
}

/// Runtime measurements taken during the health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthPerformance {
    /// Whether the store answered a trivial query.
    pub database_reachable: bool,
    /// Round-trip time of that query, when it succeeded.
    pub database_ping_ms: Option<u64>,
    /// Transactions currently in flight.
    pub in_flight_transactions: usize,
    /// Transactions in flight longer than the advisory timeout.
    pub stuck_transactions: Vec<String>,
}

/// Response to a health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealthResponse {
    /// The aggregate status.
    pub status: HealthStatus,
    /// Capability flags of the service as configured.
    pub features: HealthFeatures,
    /// Runtime measurements.
    pub performance: HealthPerformance,
    /// Remediation hints for a non-healthy status.
    pub remediation: Vec<String>,
}

/// Response to an operator-triggered emergency rollback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyRollbackResponse {
    /// Whether the unwind completed.
    pub success: bool,
    /// Number of compensations applied.
    pub compensations_applied: usize,
    /// The failure, when `success` is false.
    pub error: Option<ErrorPayload>,
}
