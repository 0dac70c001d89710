// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Input validation for enrollment operations.
//!
//! Malformed input fails here with `ValidationError`-class errors before
//! any database read runs.

use crate::error::DomainError;
use std::collections::HashSet;

/// Validates the identifying fields of a single-student enrollment request.
///
/// # Errors
///
/// Returns an error if either identifier is non-positive or the acting
/// operator is unnamed.
pub fn validate_enrollment_fields(
    roster_id: i64,
    student_id: i64,
    performed_by: &str,
) -> Result<(), DomainError> {
    if roster_id <= 0 {
        return Err(DomainError::InvalidIdentifier {
            field: "roster_id",
            value: roster_id,
        });
    }
    if student_id <= 0 {
        return Err(DomainError::InvalidIdentifier {
            field: "student_id",
            value: student_id,
        });
    }
    if performed_by.trim().is_empty() {
        return Err(DomainError::EmptyField("performed_by"));
    }
    Ok(())
}

/// Validates the student list of a batch enrollment request.
///
/// # Errors
///
/// Returns an error if the list is empty, contains a non-positive
/// identifier, or names the same student twice.
pub fn validate_batch_students(student_ids: &[i64]) -> Result<(), DomainError> {
    if student_ids.is_empty() {
        return Err(DomainError::EmptyStudentList);
    }

    let mut seen: HashSet<i64> = HashSet::with_capacity(student_ids.len());
    for &student_id in student_ids {
        if student_id <= 0 {
            return Err(DomainError::InvalidIdentifier {
                field: "student_id",
                value: student_id,
            });
        }
        if !seen.insert(student_id) {
            return Err(DomainError::DuplicateStudentInBatch(student_id));
        }
    }
    Ok(())
}

/// Validates a waitlist promotion request.
///
/// # Errors
///
/// Returns an error if the roster id is non-positive, the promotion limit
/// is zero, or a specific student id is given but non-positive.
pub fn validate_promotion_fields(
    roster_id: i64,
    max_promotions: u32,
    specific_student_id: Option<i64>,
) -> Result<(), DomainError> {
    if roster_id <= 0 {
        return Err(DomainError::InvalidIdentifier {
            field: "roster_id",
            value: roster_id,
        });
    }
    if max_promotions == 0 {
        return Err(DomainError::InvalidPromotionLimit(max_promotions));
    }
    if let Some(student_id) = specific_student_id
        && student_id <= 0
    {
        return Err(DomainError::InvalidIdentifier {
            field: "specific_student_id",
            value: student_id,
        });
    }
    Ok(())
}
