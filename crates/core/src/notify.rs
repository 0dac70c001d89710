// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The notification collaborator seam.
//!
//! Notifications are owned by an external collaborator; the core only
//! requires that delivering one yields an identifier it can revoke if the
//! surrounding transaction unwinds. The default sink records notifications
//! in the store's `notifications` table.

use cert_roster_domain::EnrollmentStatus;
use cert_roster_persistence::Persistence;

use crate::error::CoreError;

/// A student-facing notification to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// The recipient.
    pub student_id: i64,
    /// Short headline.
    pub title: String,
    /// Full message body.
    pub message: String,
    /// Presentation kind (`success`, `info`, `warning`).
    pub kind: String,
    /// Notification category.
    pub category: String,
    /// Delivery priority.
    pub priority: String,
    /// Structured payload for the recipient's client.
    pub metadata: Option<serde_json::Value>,
}

impl NotificationRequest {
    /// Builds the enrollment-outcome notification for a student.
    ///
    /// The text depends on whether the student landed in `Enrolled` or
    /// `Waitlisted` status.
    #[must_use]
    pub fn enrollment_outcome(
        student_id: i64,
        roster_id: i64,
        roster_name: &str,
        status: EnrollmentStatus,
    ) -> Self {
        let (title, message, kind) = if status == EnrollmentStatus::Waitlisted {
            (
                String::from("Added to Waitlist"),
                format!(
                    "'{roster_name}' is currently full. You have been added to the waitlist and will be enrolled automatically when a spot opens."
                ),
                String::from("info"),
            )
        } else {
            (
                String::from("Enrollment Confirmed"),
                format!("You have been enrolled in '{roster_name}'."),
                String::from("success"),
            )
        };

        Self {
            student_id,
            title,
            message,
            kind,
            category: String::from("enrollment"),
            priority: String::from("normal"),
            metadata: Some(serde_json::json!({
                "roster_id": roster_id,
                "status": status.as_str(),
            })),
        }
    }

    /// Builds the waitlist-promotion notification for a student.
    #[must_use]
    pub fn promotion_notice(student_id: i64, roster_id: i64, roster_name: &str) -> Self {
        Self {
            student_id,
            title: String::from("Enrolled from Waitlist"),
            message: format!(
                "A spot opened in '{roster_name}' and you have been enrolled from the waitlist."
            ),
            kind: String::from("success"),
            category: String::from("enrollment"),
            priority: String::from("high"),
            metadata: Some(serde_json::json!({ "roster_id": roster_id })),
        }
    }
}

/// Delivery seam for the externally-owned notification collaborator.
pub trait NotificationSink {
    /// Delivers a notification, returning an identifier that can later be
    /// passed to [`NotificationSink::revoke`].
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails.
    fn deliver(
        &mut self,
        store: &mut Persistence,
        request: &NotificationRequest,
    ) -> Result<i64, CoreError>;

    /// Revokes a previously delivered notification (transaction unwind).
    ///
    /// # Errors
    ///
    /// Returns an error if the revocation fails.
    fn revoke(&mut self, store: &mut Persistence, notification_id: i64) -> Result<(), CoreError>;
}

/// Default sink backed by the store's `notifications` table.
#[derive(Debug, Default, Clone, Copy)]
pub struct StoreNotificationSink;

impl NotificationSink for StoreNotificationSink {
    fn deliver(
        &mut self,
        store: &mut Persistence,
        request: &NotificationRequest,
    ) -> Result<i64, CoreError> {
        let notification_id = store.insert_notification(
            request.student_id,
            &request.title,
            &request.message,
            &request.kind,
            &request.category,
            &request.priority,
            request.metadata.as_ref(),
        )?;
        Ok(notification_id)
    }

    fn revoke(&mut self, store: &mut Persistence, notification_id: i64) -> Result<(), CoreError> {
        store.delete_notification(notification_id)?;
        Ok(())
    }
}
