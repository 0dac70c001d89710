// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The enrollment service boundary.
//!
//! Owns the store, the notification sink, and the transaction registry,
//! and wraps the core coordinator with error classification, the opt-in
//! legacy fallback, and the aggregate health check.

use std::time::Instant;

use time::OffsetDateTime;
use tracing::{error, info, warn};

use cert_roster::{
    BatchRequest, CoordinatorConfig, CoreError, EnrollmentRequest, NotificationSink,
    PromotionRequest, ServiceContext, StoreNotificationSink, TOTAL_STEPS, TransactionRegistry,
    check_capacity, enroll_multiple_students, enroll_student, promote_from_waitlist,
};
use cert_roster_domain::{DomainError, EnrollmentStatus};
use cert_roster_persistence::Persistence;

use crate::error::{ErrorCode, ErrorPayload};
use crate::request_response::{
    BatchEnrollRequest, BatchEnrollResponse, BatchSummary, CheckCapacityRequest,
    CheckCapacityResponse, EmergencyRollbackResponse, EnrollStudentRequest, EnrollStudentResponse,
    EnrollmentSummary, FailedStudent, HealthFeatures, HealthPerformance, HealthStatus,
    PromoteFromWaitlistRequest, PromoteFromWaitlistResponse, PromotedStudentSummary,
    ServiceHealthResponse,
};

/// Service-level configuration.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Enables the degraded legacy single-insert path for non-capacity
    /// failures.
    ///
    /// The fallback bypasses capacity protection, notifications, and the
    /// audit trail. It exists for availability during infrastructure
    /// trouble and is off unless a deployment explicitly opts in.
    pub legacy_fallback: bool,
    /// Coordinator configuration.
    pub coordinator: CoordinatorConfig,
}

/// The enrollment service.
///
/// One service instance owns one store connection; batch operations
/// against a roster funnel through it sequentially.
pub struct EnrollmentService {
    store: Persistence,
    sink: Box<dyn NotificationSink>,
    registry: TransactionRegistry,
    config: ServiceConfig,
}

impl EnrollmentService {
    /// Creates a service over the given store with default configuration.
    #[must_use]
    pub fn new(store: Persistence) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    /// Creates a service with explicit configuration.
    #[must_use]
    pub fn with_config(store: Persistence, config: ServiceConfig) -> Self {
        Self {
            store,
            sink: Box::new(StoreNotificationSink),
            registry: TransactionRegistry::new(),
            config,
        }
    }

    /// Replaces the notification sink.
    pub fn set_notification_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sink = sink;
    }

    /// Borrows the store, for fixture setup and inspection.
    pub fn store_mut(&mut self) -> &mut Persistence {
        &mut self.store
    }

    /// Transactions currently registered as in flight.
    #[must_use]
    pub fn in_flight_transactions(&self) -> usize {
        self.registry.in_flight()
    }

    fn ctx(&mut self) -> ServiceContext<'_> {
        ServiceContext {
            store: &mut self.store,
            notifications: &mut *self.sink,
            registry: &mut self.registry,
            config: &self.config.coordinator,
        }
    }

    /// Enrolls a single student.
    ///
    /// Failures come back as a structured response, never as an error.
    /// With `legacy_fallback` enabled, a non-capacity failure falls back
    /// to a minimal insert that bypasses capacity protection.
    pub fn enroll_student(&mut self, request: &EnrollStudentRequest) -> EnrollStudentResponse {
        let core_request = EnrollmentRequest {
            roster_id: request.roster_id,
            student_id: request.student_id,
            performed_by: request.enrolled_by.clone(),
            role: request.user_role,
            enrollment_type: request.enrollment_type,
            notes: request.notes.clone(),
            force: request.force_enrollment,
        };

        match enroll_student(&mut self.ctx(), &core_request) {
            Ok(outcome) => EnrollStudentResponse {
                success: true,
                transaction_id: Some(outcome.transaction_id),
                enrollment: Some(EnrollmentSummary {
                    enrollment_id: outcome.enrollment_id,
                    status: outcome.status,
                }),
                capacity: Some(outcome.capacity_after),
                notification_id: Some(outcome.notification_id),
                audit_id: Some(outcome.audit_id),
                steps_completed: outcome.steps_completed,
                total_steps: outcome.total_steps,
                used_fallback: false,
                fallback_reason: None,
                error: None,
            },
            Err(failure) => {
                let payload = ErrorPayload::from_core(&failure.error);
                if self.config.legacy_fallback
                    && payload.code != ErrorCode::CapacityExceeded
                    && let Some(response) = self.try_legacy_fallback(request, &payload)
                {
                    return response;
                }
                EnrollStudentResponse {
                    success: false,
                    transaction_id: failure.transaction_id,
                    enrollment: None,
                    capacity: None,
                    notification_id: None,
                    audit_id: None,
                    steps_completed: failure.steps_completed,
                    total_steps: failure.total_steps,
                    used_fallback: false,
                    fallback_reason: None,
                    error: Some(payload),
                }
            }
        }
    }

    /// The degraded legacy path: one bare insert in `Enrolled` status with
    /// no capacity check, notification, or audit entry.
    fn try_legacy_fallback(
        &mut self,
        request: &EnrollStudentRequest,
        primary_failure: &ErrorPayload,
    ) -> Option<EnrollStudentResponse> {
        warn!(
            roster_id = request.roster_id,
            student_id = request.student_id,
            primary_code = %primary_failure.code,
            "primary enrollment failed, attempting legacy fallback"
        );

        let result = self.store.insert_enrollment(
            request.roster_id,
            request.student_id,
            EnrollmentStatus::Enrolled,
            request.enrollment_type,
            OffsetDateTime::now_utc(),
            request.notes.as_deref(),
            false,
        );

        match result {
            Ok(enrollment_id) => Some(EnrollStudentResponse {
                success: true,
                transaction_id: None,
                enrollment: Some(EnrollmentSummary {
                    enrollment_id,
                    status: EnrollmentStatus::Enrolled,
                }),
                capacity: None,
                notification_id: None,
                audit_id: None,
                steps_completed: 1,
                total_steps: TOTAL_STEPS,
                used_fallback: true,
                fallback_reason: Some(primary_failure.message.clone()),
                error: None,
            }),
            Err(e) => {
                error!(
                    roster_id = request.roster_id,
                    student_id = request.student_id,
                    error = %e,
                    "legacy fallback also failed"
                );
                None
            }
        }
    }

    /// Enrolls a list of students sequentially.
    pub fn enroll_multiple_students(&mut self, request: &BatchEnrollRequest) -> BatchEnrollResponse {
        let core_request = BatchRequest {
            roster_id: request.roster_id,
            student_ids: request.student_ids.clone(),
            performed_by: request.enrolled_by.clone(),
            role: request.user_role,
            enrollment_type: request.enrollment_type,
            notes: request.notes.clone(),
            continue_on_error: request.continue_on_error,
            promote_to_free_capacity: request.promote_to_free_capacity,
        };

        match enroll_multiple_students(&mut self.ctx(), &core_request) {
            Ok(outcome) => {
                let successful = outcome.enrolled.len() + outcome.waitlisted.len();
                let failed: Vec<FailedStudent> = outcome
                    .failed
                    .iter()
                    .map(|f| FailedStudent {
                        student_id: f.student_id,
                        error: ErrorPayload::from_core(&f.error),
                    })
                    .collect();
                BatchEnrollResponse {
                    success: outcome.all_placed(),
                    total_requested: outcome.total_requested,
                    successful_enrollments: successful,
                    failed_enrollments: failed.len(),
                    summary: BatchSummary {
                        enrolled: outcome.enrolled,
                        waitlisted: outcome.waitlisted,
                        failed,
                    },
                    capacity_before: Some(outcome.capacity_before),
                    stopped_early: outcome.stopped_early,
                    error: None,
                }
            }
            Err(e) => BatchEnrollResponse {
                success: false,
                total_requested: request.student_ids.len(),
                successful_enrollments: 0,
                failed_enrollments: request.student_ids.len(),
                summary: BatchSummary::default(),
                capacity_before: None,
                stopped_early: false,
                error: Some(ErrorPayload::from_core(&e)),
            },
        }
    }

    /// Produces the capacity report for a roster.
    ///
    /// A missing roster yields an unsuccessful structured response rather
    /// than an error, so callers present every outcome uniformly.
    pub fn check_capacity(&mut self, request: &CheckCapacityRequest) -> CheckCapacityResponse {
        match check_capacity(
            &mut self.store,
            request.roster_id,
            request.additional_students,
            request.include_waitlist,
        ) {
            Ok(report) => CheckCapacityResponse {
                success: true,
                capacity: Some(report.snapshot),
                waitlist: report.waitlist,
                recommendations: report.advisories.recommendations,
                warnings: report.advisories.warnings,
                error: None,
            },
            Err(e) => {
                if !matches!(e, CoreError::Domain(DomainError::RosterNotFound(_))) {
                    error!(roster_id = request.roster_id, error = %e, "capacity check failed");
                }
                CheckCapacityResponse {
                    success: false,
                    capacity: None,
                    waitlist: None,
                    recommendations: Vec::new(),
                    warnings: Vec::new(),
                    error: Some(ErrorPayload::from_core(&e)),
                }
            }
        }
    }

    /// Promotes waitlisted students into open spots.
    pub fn promote_from_waitlist(
        &mut self,
        request: &PromoteFromWaitlistRequest,
    ) -> PromoteFromWaitlistResponse {
        let core_request = PromotionRequest {
            roster_id: request.roster_id,
            performed_by: request.promoted_by.clone(),
            role: request.user_role,
            max_promotions: request.max_promotions,
            specific_student_id: request.specific_student_id,
        };

        match promote_from_waitlist(&mut self.ctx(), &core_request) {
            Ok(outcome) => PromoteFromWaitlistResponse {
                success: true,
                promoted_count: outcome.promoted_count,
                promoted_students: outcome
                    .promoted_students
                    .into_iter()
                    .map(|p| PromotedStudentSummary {
                        student_id: p.student_id,
                        student_name: p.student_name,
                        enrollment_id: p.enrollment_id,
                        original_waitlist_position: p.original_waitlist_position,
                    })
                    .collect(),
                remaining_waitlist: outcome.remaining_waitlist,
                message: outcome.message,
                error: None,
            },
            Err(e) => PromoteFromWaitlistResponse {
                success: false,
                promoted_count: 0,
                promoted_students: Vec::new(),
                remaining_waitlist: 0,
                message: String::new(),
                error: Some(ErrorPayload::from_core(&e)),
            },
        }
    }

    /// Operator-triggered cleanup of an orphaned transaction.
    pub fn emergency_rollback(&mut self, transaction_id: &str) -> EmergencyRollbackResponse {
        let result =
            self.registry
                .emergency_rollback(&mut self.store, &mut *self.sink, transaction_id);
        match result {
            Ok(applied) => {
                info!(transaction_id, applied, "emergency rollback completed");
                EmergencyRollbackResponse {
                    success: true,
                    compensations_applied: applied,
                    error: None,
                }
            }
            Err(e) => EmergencyRollbackResponse {
                success: false,
                compensations_applied: 0,
                error: Some(ErrorPayload::from_core(&e)),
            },
        }
    }

    /// Reports aggregate service health.
    ///
    /// The database must answer a trivial query; transactions in flight
    /// past the advisory timeout degrade the status.
    pub fn get_service_health(&mut self) -> ServiceHealthResponse {
        let ping_started = Instant::now();
        let (database_reachable, database_ping_ms) = match self.store.ping() {
            Ok(()) => {
                let elapsed = ping_started.elapsed().as_millis();
                (true, Some(u64::try_from(elapsed).unwrap_or(u64::MAX)))
            }
            Err(e) => {
                error!(error = %e, "health check: database unreachable");
                (false, None)
            }
        };

        let stuck = self.registry.stuck_transactions(
            OffsetDateTime::now_utc(),
            self.config.coordinator.transaction_timeout,
        );

        let (status, remediation) = if !database_reachable {
            (
                HealthStatus::Unhealthy,
                vec![String::from(
                    "Database is unreachable; check the connection and storage backend",
                )],
            )
        } else if stuck.is_empty() {
            (HealthStatus::Healthy, Vec::new())
        } else {
            (
                HealthStatus::Degraded,
                vec![format!(
                    "{} transaction(s) exceeded the advisory timeout; inspect and run an emergency rollback",
                    stuck.len()
                )],
            )
        };

        ServiceHealthResponse {
            status,
            features: HealthFeatures {
                legacy_fallback: self.config.legacy_fallback,
                capacity_enforcement: true,
            },
            performance: HealthPerformance {
                database_reachable,
                database_ping_ms,
                in_flight_transactions: self.registry.in_flight(),
                stuck_transactions: stuck,
            },
            remediation,
        }
    }
}
