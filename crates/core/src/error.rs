// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cert_roster_domain::DomainError;
use cert_roster_persistence::PersistenceError;

/// Errors produced by the enrollment core.
#[derive(Debug)]
pub enum CoreError {
    /// A domain rule rejected the request.
    Domain(DomainError),
    /// The store rejected or failed an operation.
    Persistence(PersistenceError),
    /// The notification collaborator failed to deliver.
    NotificationDeliveryFailed(String),
    /// One or more compensations failed while unwinding a transaction.
    RollbackFailed {
        /// The transaction whose unwind failed.
        transaction_id: String,
        /// What went wrong.
        message: String,
    },
    /// No in-flight transaction is registered under the given id.
    TransactionNotFound(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::Persistence(e) => write!(f, "{e}"),
            Self::NotificationDeliveryFailed(msg) => {
                write!(f, "Notification delivery failed: {msg}")
            }
            Self::RollbackFailed {
                transaction_id,
                message,
            } => {
                write!(f, "Rollback of transaction {transaction_id} failed: {message}")
            }
            Self::TransactionNotFound(id) => {
                write!(f, "No in-flight transaction with id {id}")
            }
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Persistence(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<PersistenceError> for CoreError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}
