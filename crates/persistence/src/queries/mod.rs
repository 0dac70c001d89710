// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only query operations, one module per entity.
//!
//! All functions here use the Diesel DSL exclusively and perform no
//! writes.

pub mod audit;
pub mod enrollments;
pub mod notifications;
pub mod rosters;
pub mod students;
