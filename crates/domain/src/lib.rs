// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod capacity;
mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use capacity::{
    CapacityAdvisories, CapacitySnapshot, WaitlistPosition, WaitlistSummary, derive_advisories,
    evaluate_capacity,
};
pub use error::DomainError;
pub use types::{
    EnrollmentRecord, EnrollmentStatus, EnrollmentType, Role, Roster, RosterLifecycle,
    StudentProfile,
};
pub use validation::{
    validate_batch_students, validate_enrollment_fields, validate_promotion_fields,
};
