// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Registry of in-flight enrollment transactions.
//!
//! The registry is injected by the caller and explicitly scoped; there is
//! no process-global transaction table. Its purpose is operator-triggered
//! cleanup: if a process dies mid-transaction, the surviving log allows an
//! emergency rollback keyed by transaction id. The configured timeout is
//! advisory and only affects what [`TransactionRegistry::stuck_transactions`]
//! reports; no step is interrupted when it elapses.

use std::collections::HashMap;

use time::{Duration, OffsetDateTime};
use tracing::info;

use cert_roster_persistence::Persistence;

use crate::error::CoreError;
use crate::notify::NotificationSink;
use crate::saga::SagaLog;

/// In-flight transaction logs keyed by transaction id.
#[derive(Debug, Default)]
pub struct TransactionRegistry {
    active: HashMap<String, SagaLog>,
}

impl TransactionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a transaction as in flight.
    pub fn begin(&mut self, log: SagaLog) {
        self.active.insert(log.transaction_id.clone(), log);
    }

    /// Removes and returns a transaction log.
    pub fn take(&mut self, transaction_id: &str) -> Option<SagaLog> {
        self.active.remove(transaction_id)
    }

    /// Marks a transaction as finished, dropping its log.
    pub fn complete(&mut self, transaction_id: &str) {
        self.active.remove(transaction_id);
    }

    /// Number of transactions currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.active.len()
    }

    /// Whether a transaction is currently registered.
    #[must_use]
    pub fn contains(&self, transaction_id: &str) -> bool {
        self.active.contains_key(transaction_id)
    }

    /// Ids of transactions in flight longer than the advisory timeout.
    #[must_use]
    pub fn stuck_transactions(&self, now: OffsetDateTime, timeout: Duration) -> Vec<String> {
        self.active
            .values()
            .filter(|log| now - log.started_at > timeout)
            .map(|log| log.transaction_id.clone())
            .collect()
    }

    /// Operator-triggered cleanup of an orphaned transaction.
    ///
    /// Replays the transaction's registered compensations in reverse order
    /// and drops the log. Returns the number of compensations applied.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if no such transaction is registered,
    /// or `RollbackFailed` if a compensation fails (the log is dropped
    /// either way; a partially unwound transaction needs operator review).
    pub fn emergency_rollback(
        &mut self,
        store: &mut Persistence,
        sink: &mut dyn NotificationSink,
        transaction_id: &str,
    ) -> Result<usize, CoreError> {
        let mut log = self
            .take(transaction_id)
            .ok_or_else(|| CoreError::TransactionNotFound(transaction_id.to_string()))?;

        info!(
            transaction_id,
            steps_completed = log.steps_completed(),
            "emergency rollback requested"
        );
        log.compensate(store, sink)
    }
}
