// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for service boundary tests.

use time::OffsetDateTime;
use time::macros::datetime;

use cert_roster::{CoreError, NotificationRequest, NotificationSink};
use cert_roster_domain::{EnrollmentStatus, EnrollmentType, Role, RosterLifecycle};
use cert_roster_persistence::Persistence;

use crate::request_response::EnrollStudentRequest;
use crate::service::{EnrollmentService, ServiceConfig};

/// A fixed instant for deterministic ordering assertions.
pub fn base_instant() -> OffsetDateTime {
    datetime!(2026-05-01 10:00:00 UTC)
}

/// Builds a service over a fresh store with one roster and students.
pub fn service_with_roster(
    max_capacity: Option<u32>,
    student_count: usize,
    config: ServiceConfig,
) -> (EnrollmentService, i64, Vec<i64>) {
    let mut store = Persistence::new_in_memory().expect("Failed to create store");
    let roster_id = store
        .create_roster("Incident Response Drill", max_capacity, RosterLifecycle::Active)
        .expect("Failed to create roster");

    let mut student_ids = Vec::with_capacity(student_count);
    for n in 0..student_count {
        let student_id = store
            .create_student(&format!("Student {n}"), None)
            .expect("Failed to create student");
        student_ids.push(student_id);
    }

    (
        EnrollmentService::with_config(store, config),
        roster_id,
        student_ids,
    )
}

/// Seeds rows in `Enrolled` status, bypassing the coordinator.
pub fn seed_enrolled(service: &mut EnrollmentService, roster_id: i64, student_ids: &[i64]) {
    for &student_id in student_ids {
        service
            .store_mut()
            .insert_enrollment(
                roster_id,
                student_id,
                EnrollmentStatus::Enrolled,
                EnrollmentType::Standard,
                base_instant(),
                None,
                false,
            )
            .expect("Failed to seed enrollment");
    }
}

/// Seeds a waitlisted row at the given instant.
pub fn seed_waitlisted(
    service: &mut EnrollmentService,
    roster_id: i64,
    student_id: i64,
    at: OffsetDateTime,
) -> i64 {
    service
        .store_mut()
        .insert_enrollment(
            roster_id,
            student_id,
            EnrollmentStatus::Waitlisted,
            EnrollmentType::Standard,
            at,
            None,
            true,
        )
        .expect("Failed to seed waitlisted row")
}

/// A registrar's plain enrollment request.
pub fn registrar_enroll(roster_id: i64, student_id: i64) -> EnrollStudentRequest {
    EnrollStudentRequest {
        roster_id,
        student_id,
        enrolled_by: String::from("registrar-1"),
        user_role: Role::Registrar,
        enrollment_type: EnrollmentType::Standard,
        notes: None,
        force_enrollment: false,
    }
}

/// A sink whose delivery always fails, for fallback tests.
pub struct FailingSink;

impl NotificationSink for FailingSink {
    fn deliver(
        &mut self,
        _store: &mut Persistence,
        _request: &NotificationRequest,
    ) -> Result<i64, CoreError> {
        Err(CoreError::NotificationDeliveryFailed(String::from(
            "sink offline",
        )))
    }

    fn revoke(&mut self, _store: &mut Persistence, _notification_id: i64) -> Result<(), CoreError> {
        Ok(())
    }
}
