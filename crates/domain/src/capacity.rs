// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity snapshot calculation.
//!
//! This module provides the pure, read-only arithmetic behind the capacity
//! oracle: given a roster's stated maximum and its current enrolled count,
//! compute availability and whether a requested number of additional
//! students fits. Advisory strings for callers are derived separately and
//! never drive control flow.

use crate::types::Roster;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Utilization percentage at or above which a warning is emitted.
const UTILIZATION_WARNING_THRESHOLD: u32 = 90;

/// A computed, non-persisted view of a roster's enrollment capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacitySnapshot {
    /// The roster this snapshot describes.
    pub roster_id: i64,
    /// The roster's display name.
    pub roster_name: String,
    /// The roster's stated maximum capacity. `None` means unlimited.
    pub max_capacity: Option<u32>,
    /// The number of currently enrolled students.
    pub current_enrollment: u32,
    /// Open seats, clamped to zero. `None` means unbounded.
    pub available_spots: Option<u32>,
    /// Whether `requested_students` more students fit.
    pub can_enroll: bool,
    /// The additional-student count this snapshot was computed for.
    pub requested_students: u32,
}

impl CapacitySnapshot {
    /// Enrollment as a percentage of capacity, `None` when unlimited.
    ///
    /// May exceed 100 when force enrollment has pushed the roster past its
    /// stated maximum.
    #[must_use]
    pub fn utilization_percent(&self) -> Option<u32> {
        match self.max_capacity {
            Some(0) | None => None,
            Some(max) => Some(self.current_enrollment.saturating_mul(100) / max),
        }
    }
}

/// One waitlisted student's place in the FIFO queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistPosition {
    /// The waitlisted student.
    pub student_id: i64,
    /// The membership row in `Waitlisted` status.
    pub enrollment_id: i64,
    /// 1-based position in the queue (1 = longest waiting).
    pub position: u32,
    /// When the student joined the waitlist.
    pub enrolled_at: OffsetDateTime,
}

/// The ordered waitlist for a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WaitlistSummary {
    /// Total number of waitlisted students.
    pub total: u32,
    /// Queue entries, oldest first.
    pub positions: Vec<WaitlistPosition>,
}

/// Advisory output derived from a snapshot and the waitlist size.
///
/// These strings are presentation hints for callers. They are never used
/// for control flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CapacityAdvisories {
    /// Suggested follow-up actions.
    pub recommendations: Vec<String>,
    /// Conditions worth surfacing to an operator.
    pub warnings: Vec<String>,
}

/// Computes a capacity snapshot for a roster.
///
/// `available_spots` is clamped to a minimum of zero: a roster pushed past
/// its stated maximum by force enrollment never reports negative
/// availability. A roster with no capacity limit always reports
/// `can_enroll = true`.
///
/// # Arguments
///
/// * `roster` - The roster record
/// * `current_enrollment` - Count of rows in `Enrolled` status
/// * `requested_students` - Additional students the caller wants to place
#[must_use]
pub fn evaluate_capacity(
    roster: &Roster,
    current_enrollment: u32,
    requested_students: u32,
) -> CapacitySnapshot {
    let (available_spots, can_enroll) = match roster.max_capacity {
        None => (None, true),
        Some(max) => {
            let available = max.saturating_sub(current_enrollment);
            let fits = current_enrollment.saturating_add(requested_students) <= max;
            (Some(available), fits)
        }
    };

    CapacitySnapshot {
        roster_id: roster.roster_id,
        roster_name: roster.name.clone(),
        max_capacity: roster.max_capacity,
        current_enrollment,
        available_spots,
        can_enroll,
        requested_students,
    }
}

/// Derives advisory recommendations and warnings from a snapshot.
///
/// # Arguments
///
/// * `snapshot` - The capacity snapshot
/// * `waitlist_total` - Number of students currently waitlisted
#[must_use]
pub fn derive_advisories(snapshot: &CapacitySnapshot, waitlist_total: u32) -> CapacityAdvisories {
    let mut advisories = CapacityAdvisories::default();

    if let Some(available) = snapshot.available_spots {
        if available > 0 && waitlist_total > 0 {
            let promotable = available.min(waitlist_total);
            advisories.recommendations.push(format!(
                "Promote {promotable} student(s) from the waitlist to fill open spots"
            ));
        }
        if available == 0 && waitlist_total > 0 {
            advisories.warnings.push(format!(
                "{waitlist_total} student(s) waiting with no open spots"
            ));
        }
    }

    if !snapshot.can_enroll {
        advisories.recommendations.push(String::from(
            "Roster is full for this request: add to the waitlist or increase capacity",
        ));
    }

    if let Some(utilization) = snapshot.utilization_percent()
        && utilization >= UTILIZATION_WARNING_THRESHOLD
    {
        advisories.warnings.push(format!(
            "Roster '{}' is at {utilization}% of capacity",
            snapshot.roster_name
        ));
    }

    advisories
}
