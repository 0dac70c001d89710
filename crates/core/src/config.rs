// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Duration;

/// Default advisory timeout for an in-flight enrollment transaction.
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::seconds(30);

/// Configuration for the enrollment transaction coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// How long a transaction may stay in flight before the registry
    /// reports it as stuck.
    ///
    /// Advisory only: no step is interrupted when the timeout elapses.
    /// Operators act on stuck transactions via the registry's emergency
    /// rollback.
    pub transaction_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            transaction_timeout: DEFAULT_TRANSACTION_TIMEOUT,
        }
    }
}
