// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service boundary for the CertRoster enrollment core.
//!
//! This crate is the integration layer callers talk to: typed request and
//! response shapes for every operation, error classification into caller
//! guidance, the opt-in legacy fallback path, and the aggregate health
//! check. It defines no wire protocol; it is an in-process service
//! boundary.

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

mod error;
mod request_response;
mod service;

#[cfg(test)]
mod tests;

pub use error::{ErrorClassification, ErrorCode, ErrorPayload, classify, code_for};
pub use request_response::{
    BatchEnrollRequest, BatchEnrollResponse, BatchSummary, CheckCapacityRequest,
    CheckCapacityResponse, EmergencyRollbackResponse, EnrollStudentRequest, EnrollStudentResponse,
    EnrollmentSummary, FailedStudent, HealthFeatures, HealthPerformance, HealthStatus,
    PromoteFromWaitlistRequest, PromoteFromWaitlistResponse, PromotedStudentSummary,
    ServiceHealthResponse,
};
pub use service::{EnrollmentService, ServiceConfig};
