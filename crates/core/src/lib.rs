// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Enrollment transaction core for the CertRoster system.
//!
//! Five cooperating pieces:
//!
//! - the **capacity oracle** ([`oracle`]), a pure read answering "can N
//!   more students enroll" with a snapshot, the FIFO waitlist, and
//!   advisory strings;
//! - the **enrollment transaction coordinator** ([`coordinator`]), seven
//!   ordered steps with compensating rollback so a failed enrollment
//!   leaves no partial state;
//! - the **waitlist promoter** ([`promoter`]), best-effort FIFO promotion
//!   bounded by available capacity;
//! - the **batch coordinator** ([`batch`]), sequential multi-student
//!   enrollment tolerating partial failure;
//! - the **transaction registry** ([`registry`]), injected bookkeeping of
//!   in-flight transactions enabling operator-triggered emergency
//!   rollback.

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
#![allow(clippy::multiple_crate_versions)]

mod batch;
mod config;
mod coordinator;
mod error;
mod notify;
mod oracle;
mod promoter;
mod registry;
mod saga;

#[cfg(test)]
mod tests;

pub use batch::{BatchFailure, BatchOutcome, BatchRequest, enroll_multiple_students};
pub use config::{CoordinatorConfig, DEFAULT_TRANSACTION_TIMEOUT};
pub use coordinator::{
    AUDIT_ACTION_ENROLLED, EnrollmentFailure, EnrollmentOutcome, EnrollmentRequest,
    ServiceContext, enroll_student,
};
pub use error::CoreError;
pub use notify::{NotificationRequest, NotificationSink, StoreNotificationSink};
pub use oracle::{CapacityReport, check_capacity, load_roster};
pub use promoter::{
    AUDIT_ACTION_PROMOTED, PromotedStudent, PromotionFailure, PromotionOutcome, PromotionRequest,
    promote_from_waitlist,
};
pub use registry::TransactionRegistry;
pub use saga::{Compensation, SagaLog, StepName, TOTAL_STEPS, generate_transaction_id};
