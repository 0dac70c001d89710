// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The capacity oracle.
//!
//! A pure read over the store: current enrollment, stated maximum, derived
//! availability, the FIFO waitlist, and advisory strings. The oracle's
//! answer is optimistic by design; the store's write-time constraint is the
//! final arbiter, and callers must treat a write-time capacity rejection as
//! authoritative even when the oracle reported space available.

use cert_roster_domain::{
    CapacityAdvisories, CapacitySnapshot, DomainError, Roster, WaitlistPosition, WaitlistSummary,
    derive_advisories, evaluate_capacity,
};
use cert_roster_persistence::Persistence;

use crate::error::CoreError;

/// The oracle's full answer for one roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityReport {
    /// The computed capacity snapshot.
    pub snapshot: CapacitySnapshot,
    /// The ordered waitlist, when requested.
    pub waitlist: Option<WaitlistSummary>,
    /// Advisory recommendations and warnings.
    pub advisories: CapacityAdvisories,
}

/// Reads a roster or fails with `RosterNotFound`.
///
/// # Errors
///
/// Returns an error if the roster does not exist or the read fails.
pub fn load_roster(store: &mut Persistence, roster_id: i64) -> Result<Roster, CoreError> {
    store
        .get_roster(roster_id)?
        .ok_or_else(|| CoreError::Domain(DomainError::RosterNotFound(roster_id)))
}

/// Computes the capacity report for a roster.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `roster_id` - The roster to report on
/// * `requested_students` - Additional students the caller wants to place
/// * `include_waitlist` - Whether to read and rank the waitlist
///
/// # Errors
///
/// Returns `RosterNotFound` if the roster does not exist, or a persistence
/// error if a read fails.
pub fn check_capacity(
    store: &mut Persistence,
    roster_id: i64,
    requested_students: u32,
    include_waitlist: bool,
) -> Result<CapacityReport, CoreError> {
    let roster = load_roster(store, roster_id)?;
    let current_enrollment = store.count_enrolled(roster_id)?;
    let snapshot = evaluate_capacity(&roster, current_enrollment, requested_students);

    let waitlist_total = store.count_waitlisted(roster_id)?;
    let waitlist = if include_waitlist {
        Some(read_waitlist(store, roster_id, waitlist_total)?)
    } else {
        None
    };

    let advisories = derive_advisories(&snapshot, waitlist_total);

    Ok(CapacityReport {
        snapshot,
        waitlist,
        advisories,
    })
}

/// Reads the waitlist and assigns 1-based FIFO positions.
fn read_waitlist(
    store: &mut Persistence,
    roster_id: i64,
    total: u32,
) -> Result<WaitlistSummary, CoreError> {
    let rows = store.get_waitlist(roster_id)?;
    let positions = rows
        .iter()
        .enumerate()
        .map(|(index, record)| WaitlistPosition {
            student_id: record.student_id,
            enrollment_id: record.enrollment_id,
            position: u32::try_from(index + 1).unwrap_or(u32::MAX),
            enrolled_at: record.enrolled_at,
        })
        .collect();

    Ok(WaitlistSummary { total, positions })
}
