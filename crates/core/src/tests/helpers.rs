// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for core tests.

use time::OffsetDateTime;
use time::macros::datetime;

use cert_roster_domain::{EnrollmentStatus, EnrollmentType, RosterLifecycle};
use cert_roster_persistence::Persistence;

use crate::config::CoordinatorConfig;
use crate::coordinator::ServiceContext;
use crate::error::CoreError;
use crate::notify::{NotificationRequest, NotificationSink, StoreNotificationSink};
use crate::registry::TransactionRegistry;

/// A fixed instant for deterministic ordering assertions.
pub fn base_instant() -> OffsetDateTime {
    datetime!(2026-04-01 08:00:00 UTC)
}

/// Owns every collaborator a [`ServiceContext`] borrows.
pub struct Fixture {
    pub store: Persistence,
    pub sink: Box<dyn NotificationSink>,
    pub registry: TransactionRegistry,
    pub config: CoordinatorConfig,
}

impl Fixture {
    /// Builds a fixture with one roster and `student_count` students.
    pub fn with_roster(max_capacity: Option<u32>, student_count: usize) -> (Self, i64, Vec<i64>) {
        let mut store = Persistence::new_in_memory().expect("Failed to create store");
        let roster_id = store
            .create_roster("Field Safety Certification", max_capacity, RosterLifecycle::Active)
            .expect("Failed to create roster");

        let mut student_ids = Vec::with_capacity(student_count);
        for n in 0..student_count {
            let student_id = store
                .create_student(&format!("Student {n}"), None)
                .expect("Failed to create student");
            student_ids.push(student_id);
        }

        let fixture = Self {
            store,
            sink: Box::new(StoreNotificationSink),
            registry: TransactionRegistry::new(),
            config: CoordinatorConfig::default(),
        };
        (fixture, roster_id, student_ids)
    }

    /// Borrows the fixture as a service context.
    pub fn ctx(&mut self) -> ServiceContext<'_> {
        ServiceContext {
            store: &mut self.store,
            notifications: &mut *self.sink,
            registry: &mut self.registry,
            config: &self.config,
        }
    }

    /// Seeds `count` rows in `Enrolled` status, bypassing the coordinator.
    pub fn seed_enrolled(&mut self, roster_id: i64, student_ids: &[i64]) {
        for &student_id in student_ids {
            self.store
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

    /// Seeds a waitlisted row at the given instant, returning its id.
    pub fn seed_waitlisted(
        &mut self,
        roster_id: i64,
        student_id: i64,
        at: OffsetDateTime,
    ) -> i64 {
        self.store
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
}

/// A sink whose delivery always fails, for rollback tests.
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

/// A sink that delivers but cannot revoke, for failed-unwind tests.
pub struct RevokeFailingSink;

impl NotificationSink for RevokeFailingSink {
    fn deliver(
        &mut self,
        store: &mut Persistence,
        request: &NotificationRequest,
    ) -> Result<i64, CoreError> {
        StoreNotificationSink.deliver(store, request)
    }

    fn revoke(&mut self, _store: &mut Persistence, _notification_id: i64) -> Result<(), CoreError> {
        Err(CoreError::NotificationDeliveryFailed(String::from(
            "revoke rejected",
        )))
    }
}
